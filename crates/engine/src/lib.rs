//! `personid-engine` — entity resolution over tabular person records.
//!
//! Pure engine crate: receives pre-loaded headers and rows, returns rows
//! annotated with a group number. No CLI, file reading, or logging.

pub mod config;
pub mod error;
pub mod grouper;
pub mod model;
pub mod normalize;
pub mod strategy;
pub mod union_find;

pub use config::{ColumnPatterns, GroupConfig, MatchingType};
pub use error::GroupError;
pub use grouper::{group_rows, process, Grouper};
pub use model::{Grouping, Summary, Table};
pub use strategy::{KeyKind, MatchKey, MatchStrategy};
pub use union_find::DisjointSet;
