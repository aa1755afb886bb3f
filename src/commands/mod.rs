//! CLI command handlers.

mod analyze;
mod config;
mod enrich;
mod harvest;
mod top_downloads;

pub use analyze::run_analyze_command;
pub use config::run_config_show_command;
pub use enrich::{run_clean_command, run_enrich_command};
pub use harvest::run_harvest_command;
pub use top_downloads::run_top_downloads_command;
