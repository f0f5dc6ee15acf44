use std::process::Command;

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn browser_process_names() -> &'static [&'static str] {
        // Helpers share the main binary name; the role lives in --type=.
        &["chrome", "google-chrome", "chromium", "chromium-browser"]
    }

    fn notification_command(title: &str, body: &str) -> Option<Command> {
        let mut cmd = Command::new("notify-send");
        cmd.arg(title).arg(body);
        Some(cmd)
    }
}
