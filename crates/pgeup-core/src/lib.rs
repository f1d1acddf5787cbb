pub mod config;
pub mod logging;

pub mod fetch;
pub mod http;
pub mod inspect;
pub mod install;
pub mod process;
pub mod prompt;
pub mod release;
pub mod updater;
