use std::process::Command;

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn browser_process_names() -> &'static [&'static str] {
        &["chrome.exe"]
    }

    fn notification_command(_title: &str, _body: &str) -> Option<Command> {
        None
    }
}
