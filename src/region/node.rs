/// Region and school listing types
///
/// These are built from one registry response and consumed by the next
/// traversal step; none of them is persisted.
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One node of the administrative hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionNode {
    /// 0 = country, 1 = province, 2 = city/regency, 3 = district
    pub level: u8,

    /// Opaque region code, only meaningful together with `level`
    pub code: String,

    pub name: String,
}

impl RegionNode {
    /// Reads a node from a `/rekap/dataSekolah` entry
    ///
    /// Returns `None` when `nama`, `kode_wilayah` or `id_level_wilayah` is
    /// missing or unreadable.
    pub fn from_json(value: &Value) -> Option<Self> {
        let name = value.get("nama")?.as_str()?.trim().to_string();
        let code = value.get("kode_wilayah")?.as_str()?.trim().to_string();
        let level = read_level(value.get("id_level_wilayah")?)?;

        if code.is_empty() {
            return None;
        }

        Some(Self { level, code, name })
    }
}

/// `id_level_wilayah` arrives as either a number or a numeric string
fn read_level(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Form of education (`bentuk_pendidikan`) the harvester knows how to accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EducationForm {
    /// SD
    Elementary,
    /// SMP
    Junior,
    /// SMA
    Senior,
    /// SMK
    Vocational,
}

impl FromStr for EducationForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SD" => Ok(Self::Elementary),
            "SMP" => Ok(Self::Junior),
            "SMA" => Ok(Self::Senior),
            "SMK" => Ok(Self::Vocational),
            other => Err(format!("unsupported education form '{}'", other)),
        }
    }
}

impl fmt::Display for EducationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::Elementary => "SD",
            Self::Junior => "SMP",
            Self::Senior => "SMA",
            Self::Vocational => "SMK",
        };
        f.write_str(code)
    }
}

/// Ownership status (`status_sekolah`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Negeri
    Public,
    /// Swasta
    Private,
}

impl FromStr for Ownership {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("Negeri") {
            Ok(Self::Public)
        } else if s.eq_ignore_ascii_case("Swasta") {
            Ok(Self::Private)
        } else {
            Err(format!("unsupported ownership status '{}'", s))
        }
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "Negeri",
            Self::Private => "Swasta",
        })
    }
}

/// One school as listed under a district
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolSummary {
    /// `sekolah_id_enkrip`: URL segment of the profile page and dedup key
    pub id: String,

    pub name: String,

    /// Raw `bentuk_pendidikan`
    pub education_form: String,

    /// Raw `status_sekolah`
    pub ownership: String,
}

impl SchoolSummary {
    /// Reads a school from a `/rekap/progresSP` entry
    pub fn from_json(value: &Value) -> Option<Self> {
        let id = value.get("sekolah_id_enkrip")?.as_str()?.trim().to_string();
        if id.is_empty() {
            return None;
        }

        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        Some(Self {
            id,
            name: text("nama"),
            education_form: text("bentuk_pendidikan"),
            ownership: text("status_sekolah"),
        })
    }
}

/// A school together with the names of the regions it was found under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSchool {
    pub school: SchoolSummary,
    pub province: String,
    pub city: String,
    pub district: String,
}
