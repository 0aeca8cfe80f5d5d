//! Region module for walking the administrative hierarchy
//!
//! # Components
//!
//! - `RegionNode` / `SchoolSummary`: entries read from registry lists
//! - `CityFilter` / `SchoolFilter`: what the walk keeps
//! - `RegionWalker`: lazy depth-first traversal producing `LocatedSchool`s

mod filter;
mod node;
mod walker;

pub use filter::{CityFilter, SchoolFilter};
pub use node::{EducationForm, LocatedSchool, Ownership, RegionNode, SchoolSummary};
pub use walker::{RegionWalker, WalkStats};
