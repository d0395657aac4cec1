//! Command implementations for asset-cli

pub mod plan;
pub mod status;
pub mod sync;

pub use plan::run_plan;
pub use status::run_status;
pub use sync::{run_clean, run_sync};
