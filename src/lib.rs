//! vsearch - accuracy and search-slope analysis for visual-search experiments
//!
//! This library loads per-participant trial logs, summarizes accuracy over
//! all trials, and fits reaction time against set size for every
//! (participant, search type, target presence) condition using correct
//! trials only. The resulting tables are written as CSV or JSON for an
//! external report renderer.

pub mod accuracy;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod csv_output;
pub mod json_output;
pub mod loader;
pub mod rt_summary;
pub mod slope;
pub mod trial;
