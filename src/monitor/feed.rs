use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::debug;

use super::snapshot::MonitorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    Delivered,
    Dropped,
    Closed,
}

/// Producer half of the snapshot hand-off. Never blocks: when the consumer
/// falls behind, the newest snapshot is dropped.
pub struct SnapshotFeed {
    tx: Sender<MonitorSnapshot>,
    dropped: u64,
}

pub fn channel(capacity: usize) -> (SnapshotFeed, Receiver<MonitorSnapshot>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (SnapshotFeed { tx, dropped: 0 }, rx)
}

impl SnapshotFeed {
    pub fn publish(&mut self, snapshot: MonitorSnapshot) -> Publish {
        match self.tx.try_send(snapshot) {
            Ok(()) => Publish::Delivered,
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                debug!(dropped = self.dropped, "consumer lagging, snapshot dropped");
                Publish::Dropped
            }
            Err(TrySendError::Closed(_)) => Publish::Closed,
        }
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_buffer_drops_newest() {
        let (mut feed, mut rx) = channel(1);
        let first = MonitorSnapshot {
            process_count: 1,
            ..MonitorSnapshot::idle()
        };
        assert_eq!(feed.publish(first.clone()), Publish::Delivered);
        assert_eq!(feed.publish(MonitorSnapshot::idle()), Publish::Dropped);
        assert_eq!(feed.dropped(), 1);
        assert_eq!(rx.try_recv().unwrap(), first);
    }

    #[test]
    fn closed_receiver_is_reported() {
        let (mut feed, rx) = channel(4);
        drop(rx);
        assert_eq!(feed.publish(MonitorSnapshot::idle()), Publish::Closed);
    }
}
