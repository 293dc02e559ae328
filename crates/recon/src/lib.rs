//! `namelink-recon`: links Before and After records by fuzzy name similarity.
//!
//! Pure engine crate: receives a loaded table, returns identifier assignments.
//! No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod linker;
pub mod model;
pub mod selector;
pub mod similarity;
pub mod summary;

pub use config::LinkConfig;
pub use engine::run;
pub use error::ReconError;
pub use linker::{link, LinkOptions};
pub use model::{Group, LinkOutcome, LinkReport, LinkSummary, Record, Table, Timepoint};
pub use selector::{detect_name_column, select_name_column};
pub use similarity::{Similarity, TokenSortRatio};
