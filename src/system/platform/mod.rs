use std::process::Command;

pub trait PlatformExtensions {
    /// Executable names of the browser and its helper processes.
    fn browser_process_names() -> &'static [&'static str];
    /// Command that raises a native desktop notification, if the platform has one.
    fn notification_command(title: &str, body: &str) -> Option<Command>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn browser_process_names() -> &'static [&'static str] {
    platform_impl::Platform::browser_process_names()
}

pub fn notification_command(title: &str, body: &str) -> Option<Command> {
    platform_impl::Platform::notification_command(title, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_names_are_non_empty() {
        let names = browser_process_names();
        assert!(!names.is_empty());
        assert!(names.iter().all(|n| !n.is_empty()));
    }

    #[test]
    fn notification_command_does_not_panic() {
        let _ = notification_command("title", "body \"quoted\"");
    }
}
