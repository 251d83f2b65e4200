//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - The export progress bar
//! - Statistics reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_config_summary, print_error, print_info, print_success, print_warning,
};
pub use progress::{create_export_bar, ProgressBarReporter};
pub use stats::{print_character_ids, print_export_stats};
