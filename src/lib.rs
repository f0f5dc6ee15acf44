pub mod config;
pub mod devtools;
pub mod format;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod report;
pub mod system;
