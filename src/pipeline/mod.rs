//! Pipeline module - feature derivation, aggregation, filtering and correlation

pub mod analysis;
pub mod categorical;
mod columns;
pub mod config;
pub mod correlation;
pub mod error;
pub mod features;
pub mod loader;
pub mod mask;
pub mod outliers;
pub mod quantile;

pub use analysis::*;
pub use categorical::*;
pub use config::*;
pub use correlation::*;
pub use error::*;
pub use features::*;
pub use loader::*;
pub use mask::*;
pub use outliers::*;
pub use quantile::*;
