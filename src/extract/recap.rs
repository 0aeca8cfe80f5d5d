//! Recap figures from `/rekap/sekolahDetail`
//!
//! The detail endpoint answers with a one-element array holding the school's
//! staffing, enrollment and facility counts. Room counts come in `before_*`
//! and `after_*` variants; the `after_*` value wins when present.

use serde_json::{Map, Value};

/// A count that can be read from, or derived from, the recap figures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Figure {
    TeacherMale,
    TeacherFemale,
    TeacherTotal,
    StaffMale,
    StaffFemale,
    StaffTotal,
    /// Teachers plus staff ("PTK")
    PtkMale,
    PtkFemale,
    PtkTotal,
    StudentMale,
    StudentFemale,
    StudentTotal,
    Classrooms,
    Libraries,
    Labs,
    PracticeRooms,
    /// Study groups ("rombel")
    StudyGroups,
}

/// Room counts with the `after_*`/`before_*` choice already made
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomCounts {
    pub classrooms: u64,
    pub libraries: u64,
    pub labs: u64,
    pub practice_rooms: u64,
}

/// Counts for one school
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecapFigures {
    pub teacher_male: u64,
    pub teacher_female: u64,
    pub staff_male: u64,
    pub staff_female: u64,
    pub student_male: u64,
    pub student_female: u64,
    pub rooms: RoomCounts,
    pub study_groups: u64,
}

/// Why a detail payload could not be turned into figures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecapError {
    #[error("recap payload is an empty list")]
    Empty,

    #[error("recap payload is not a list: {0}")]
    NotAList(String),

    #[error("recap entry is not an object: {0}")]
    NotAnObject(String),
}

impl RecapFigures {
    /// Reads the first element of a `/rekap/sekolahDetail` response
    pub fn from_detail(payload: &Value) -> Result<Self, RecapError> {
        let entries = payload
            .as_array()
            .ok_or_else(|| RecapError::NotAList(abbreviate(payload)))?;
        let first = entries.first().ok_or(RecapError::Empty)?;
        let object = first
            .as_object()
            .ok_or_else(|| RecapError::NotAnObject(abbreviate(first)))?;

        Ok(Self::from_object(object))
    }

    /// Reads figures from one recap object; missing or unreadable counts are 0
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let count = |key: &str| object.get(key).and_then(read_count).unwrap_or(0);
        let room = |suffix: &str| {
            object
                .get(&format!("after_{}", suffix))
                .and_then(read_count)
                .or_else(|| object.get(&format!("before_{}", suffix)).and_then(read_count))
                .unwrap_or(0)
        };

        Self {
            teacher_male: count("ptk_laki"),
            teacher_female: count("ptk_perempuan"),
            staff_male: count("pegawai_laki"),
            staff_female: count("pegawai_perempuan"),
            student_male: count("pd_laki"),
            student_female: count("pd_perempuan"),
            rooms: RoomCounts {
                classrooms: room("ruang_kelas"),
                libraries: room("ruang_perpus"),
                labs: room("ruang_lab"),
                practice_rooms: room("ruang_praktik"),
            },
            study_groups: count("rombel"),
        }
    }

    /// Value of a raw or derived figure
    pub fn value(&self, figure: Figure) -> u64 {
        match figure {
            Figure::TeacherMale => self.teacher_male,
            Figure::TeacherFemale => self.teacher_female,
            Figure::TeacherTotal => self.teacher_male.saturating_add(self.teacher_female),
            Figure::StaffMale => self.staff_male,
            Figure::StaffFemale => self.staff_female,
            Figure::StaffTotal => self.staff_male.saturating_add(self.staff_female),
            Figure::PtkMale => self.teacher_male.saturating_add(self.staff_male),
            Figure::PtkFemale => self.teacher_female.saturating_add(self.staff_female),
            Figure::PtkTotal => self
                .value(Figure::TeacherTotal)
                .saturating_add(self.value(Figure::StaffTotal)),
            Figure::StudentMale => self.student_male,
            Figure::StudentFemale => self.student_female,
            Figure::StudentTotal => self.student_male.saturating_add(self.student_female),
            Figure::Classrooms => self.rooms.classrooms,
            Figure::Libraries => self.rooms.libraries,
            Figure::Labs => self.rooms.labs,
            Figure::PracticeRooms => self.rooms.practice_rooms,
            Figure::StudyGroups => self.study_groups,
        }
    }
}

/// Counts arrive as numbers, numeric strings, or null
fn read_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f.round() as u64),
        _ => None,
    }
}

fn abbreviate(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() > 80 {
        format!("{}...", text.chars().take(80).collect::<String>())
    } else {
        text
    }
}
