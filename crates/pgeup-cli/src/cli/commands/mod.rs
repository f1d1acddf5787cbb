//! CLI command handlers.

mod completions;
mod update;

pub use completions::{print_completions, print_man};
pub use update::run_update;
