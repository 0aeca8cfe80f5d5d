//! Structured registry queries
//!
//! One fetch entry point serves three upstream operations. Which one is used
//! depends only on the region level and whether a school id is present:
//!
//! | school id | level | endpoint                    |
//! |-----------|-------|-----------------------------|
//! | present   | any   | `/rekap/sekolahDetail`      |
//! | absent    | 3     | `/rekap/progresSP`          |
//! | absent    | other | `/rekap/dataSekolah`        |

use crate::region::RegionNode;
use url::Url;

/// Region code the registry uses for the whole country
pub const ROOT_REGION_CODE: &str = "000000";

/// Level whose children are schools rather than regions
pub const DISTRICT_LEVEL: u8 = 3;

/// A query against the structured (`/rekap`) endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryQuery {
    /// Recap figures for a single school
    SchoolDetail { school_id: String },

    /// Schools listed under a district
    DistrictSchools { region_code: String },

    /// Child regions of a region at `level`
    RegionList { level: u8, region_code: String },
}

impl RegistryQuery {
    /// Selects the endpoint shape from a level, a region code and an optional school id
    pub fn new(level: u8, region_code: &str, school_id: Option<&str>) -> Self {
        match school_id {
            Some(id) => Self::SchoolDetail {
                school_id: id.to_string(),
            },
            None if level == DISTRICT_LEVEL => Self::DistrictSchools {
                region_code: region_code.to_string(),
            },
            None => Self::RegionList {
                level,
                region_code: region_code.to_string(),
            },
        }
    }

    /// The province listing
    pub fn root() -> Self {
        Self::new(0, ROOT_REGION_CODE, None)
    }

    /// Lists whatever sits directly below `node`
    pub fn children_of(node: &RegionNode) -> Self {
        Self::new(node.level, &node.code, None)
    }

    pub fn school_detail(school_id: &str) -> Self {
        Self::new(0, ROOT_REGION_CODE, Some(school_id))
    }

    /// Renders the query against a registry host for one semester
    pub fn to_url(&self, base_url: &str, semester_id: &str) -> Result<Url, url::ParseError> {
        let base = base_url.trim_end_matches('/');

        match self {
            Self::SchoolDetail { school_id } => Url::parse_with_params(
                &format!("{}/rekap/sekolahDetail", base),
                &[("semester_id", semester_id), ("sekolah_id", school_id.as_str())],
            ),
            Self::DistrictSchools { region_code } => Url::parse_with_params(
                &format!("{}/rekap/progresSP", base),
                &[
                    ("id_level_wilayah", DISTRICT_LEVEL.to_string().as_str()),
                    ("kode_wilayah", region_code.as_str()),
                    ("semester_id", semester_id),
                    ("bentuk_pendidikan_id", ""),
                ],
            ),
            Self::RegionList { level, region_code } => Url::parse_with_params(
                &format!("{}/rekap/dataSekolah", base),
                &[
                    ("id_level_wilayah", level.to_string().as_str()),
                    ("kode_wilayah", region_code.as_str()),
                    ("semester_id", semester_id),
                ],
            ),
        }
    }
}
