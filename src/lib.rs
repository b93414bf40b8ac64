//! Cardioviz: Cardiovascular Examination Analysis Library
//!
//! Derives features from patient examination records and builds two views
//! for visual analysis: categorical counts split by cardiovascular outcome,
//! and an outlier-filtered correlation matrix with its redundancy mask.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
