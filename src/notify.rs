use std::process::Stdio;

use tracing::{info, warn};

use crate::system::platform;

/// Fire-and-forget user notification.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Raises a native desktop notification, falling back to the log when the
/// platform has no notifier or it cannot be spawned.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        let Some(mut cmd) = platform::notification_command(title, body) else {
            LogNotifier.notify(title, body);
            return;
        };

        let spawned = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            // Reap in the background so the loop never waits on the notifier.
            Ok(mut child) => {
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(e) => {
                warn!(error = %e, "desktop notifier unavailable");
                LogNotifier.notify(title, body);
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        info!(%title, %body, "alert");
    }
}
