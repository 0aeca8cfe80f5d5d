//! Output columns and where each one comes from
//!
//! This table is the only place that knows the registry's Indonesian field
//! labels. When the upstream page renames a label, add the new spelling to
//! the column's label list; the first label present wins.

use crate::extract::profile::{ProfileSections, Section};
use crate::extract::recap::{Figure, RecapFigures};
use crate::region::LocatedSchool;

/// Header of the dedup key column
pub const ID_COLUMN: &str = "sekolah_id_enkrip";

/// Source of a column's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    SchoolId,
    SchoolName,
    Province,
    City,
    District,
    Identity(&'static [&'static str]),
    Supplementary(&'static [&'static str]),
    Detailed(&'static [&'static str]),
    Sidebar(&'static [&'static str]),
    Contact(&'static [&'static str]),
    Figure(Figure),
}

/// One output column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub source: Source,
}

const fn column(header: &'static str, source: Source) -> Column {
    Column { header, source }
}

/// Every output column, in file order
pub const COLUMNS: &[Column] = &[
    column(ID_COLUMN, Source::SchoolId),
    column("Nama_Sekolah", Source::SchoolName),
    column("Provinsi", Source::Province),
    column("Kota_Kabupaten", Source::City),
    column("Kecamatan", Source::District),
    // Identitas Sekolah
    column("NPSN", Source::Identity(&["NPSN"])),
    column("Status", Source::Identity(&["Status"])),
    column("Bentuk_Pendidikan", Source::Identity(&["Bentuk Pendidikan"])),
    column("Status_Kepemilikan", Source::Identity(&["Status Kepemilikan"])),
    column("SK_Pendirian_Sekolah", Source::Identity(&["SK Pendirian Sekolah"])),
    column("Tanggal_SK_Pendirian", Source::Identity(&["Tanggal SK Pendirian"])),
    column("SK_Izin_Operasional", Source::Identity(&["SK Izin Operasional"])),
    column(
        "Tanggal_SK_Izin_Operasional",
        Source::Identity(&["Tanggal SK Izin Operasional"]),
    ),
    // Data Pelengkap
    column(
        "Kebutuhan_Khusus_Dilayani",
        Source::Supplementary(&["Kebutuhan Khusus Dilayani"]),
    ),
    column("Nama_Bank", Source::Supplementary(&["Nama Bank"])),
    column("Cabang_KCP_Unit", Source::Supplementary(&["Cabang KCP/Unit"])),
    column("Rekening_Atas_Nama", Source::Supplementary(&["Rekening Atas Nama"])),
    // Data Rinci
    column("Status_BOS", Source::Detailed(&["Status BOS"])),
    column(
        "Waktu_Penyelenggaraan",
        Source::Detailed(&["Waktu Penyelenggaraan", "Waku Penyelenggaraan"]),
    ),
    column("Sertifikasi_ISO", Source::Detailed(&["Sertifikasi ISO"])),
    column("Sumber_Listrik", Source::Detailed(&["Sumber Listrik"])),
    column("Daya_Listrik", Source::Detailed(&["Daya Listrik"])),
    column("Kecepatan_Internet", Source::Detailed(&["Kecepatan Internet"])),
    // Sidebar
    column("Kepsek", Source::Sidebar(&["Kepsek"])),
    column("Operator", Source::Sidebar(&["Operator"])),
    column("Akreditasi", Source::Sidebar(&["Akreditasi"])),
    column("Kurikulum", Source::Sidebar(&["Kurikulum"])),
    column("Waktu", Source::Sidebar(&["Waktu"])),
    // Kontak
    column("Alamat", Source::Contact(&["Alamat"])),
    column("RT_RW", Source::Contact(&["RT / RW", "RT/RW"])),
    column("Dusun", Source::Contact(&["Dusun"])),
    column("Desa_Kelurahan", Source::Contact(&["Desa / Kelurahan", "Desa/Kelurahan"])),
    column("Kode_Pos", Source::Contact(&["Kode Pos"])),
    column("Lintang", Source::Contact(&["Lintang"])),
    column("Bujur", Source::Contact(&["Bujur"])),
    // Recap
    column("Guru_L", Source::Figure(Figure::TeacherMale)),
    column("Guru_P", Source::Figure(Figure::TeacherFemale)),
    column("Guru_Total", Source::Figure(Figure::TeacherTotal)),
    column("Tendik_L", Source::Figure(Figure::StaffMale)),
    column("Tendik_P", Source::Figure(Figure::StaffFemale)),
    column("Tendik_Total", Source::Figure(Figure::StaffTotal)),
    column("PTK_L", Source::Figure(Figure::PtkMale)),
    column("PTK_P", Source::Figure(Figure::PtkFemale)),
    column("PTK_Total", Source::Figure(Figure::PtkTotal)),
    column("Peserta_Didik_L", Source::Figure(Figure::StudentMale)),
    column("Peserta_Didik_P", Source::Figure(Figure::StudentFemale)),
    column("Peserta_Didik_Total", Source::Figure(Figure::StudentTotal)),
    column("Ruang_Kelas", Source::Figure(Figure::Classrooms)),
    column("Ruang_Perpus", Source::Figure(Figure::Libraries)),
    column("Ruang_Lab", Source::Figure(Figure::Labs)),
    column("Ruang_Pratik", Source::Figure(Figure::PracticeRooms)),
    column("Rombel", Source::Figure(Figure::StudyGroups)),
];

/// Header row in file order
pub fn headers() -> Vec<&'static str> {
    COLUMNS.iter().map(|c| c.header).collect()
}

/// Position of a header in the row, if it exists
pub fn column_index(header: &str) -> Option<usize> {
    COLUMNS.iter().position(|c| c.header == header)
}

/// One persisted row: every column present, in `COLUMNS` order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    values: Vec<String>,
}

impl FlatRecord {
    /// Merges the listing, the profile page and the recap figures
    pub fn build(school: &LocatedSchool, profile: &ProfileSections, figures: &RecapFigures) -> Self {
        let values = COLUMNS
            .iter()
            .map(|column| match column.source {
                Source::SchoolId => school.school.id.clone(),
                Source::SchoolName => school.school.name.clone(),
                Source::Province => school.province.clone(),
                Source::City => school.city.clone(),
                Source::District => school.district.clone(),
                Source::Identity(labels) => lookup(&profile.identity, labels),
                Source::Supplementary(labels) => lookup(&profile.supplementary, labels),
                Source::Detailed(labels) => lookup(&profile.detailed, labels),
                Source::Sidebar(labels) => lookup(&profile.sidebar, labels),
                Source::Contact(labels) => lookup(&profile.contact, labels),
                Source::Figure(figure) => figures.value(figure).to_string(),
            })
            .collect();

        Self { values }
    }

    /// The encrypted school id
    pub fn id(&self) -> &str {
        &self.values[0]
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value of the column with this header
    pub fn get(&self, header: &str) -> Option<&str> {
        column_index(header).map(|i| self.values[i].as_str())
    }
}

fn lookup(section: &Section, labels: &[&str]) -> String {
    labels
        .iter()
        .find_map(|label| section.get(*label))
        .cloned()
        .unwrap_or_default()
}
