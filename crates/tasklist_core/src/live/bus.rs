use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Stored record collection a write can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Lists,
    Tasks,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lists => "lists",
            Self::Tasks => "todos",
        }
    }
}

/// Notification for one committed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub revision: u64,
    pub collections: Vec<Collection>,
}

impl ChangeSet {
    pub fn touches(&self, collection: Collection) -> bool {
        self.collections.contains(&collection)
    }

    pub fn touches_any(&self, watched: &[Collection]) -> bool {
        watched.iter().any(|collection| self.touches(*collection))
    }
}

/// Fan-out of change sets to every live subscriber.
#[derive(Debug, Default)]
pub struct ChangeBus {
    revision: AtomicU64,
    subscribers: Mutex<Vec<Sender<ChangeSet>>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Dropping the receiver unsubscribes it.
    pub fn subscribe(&self) -> Receiver<ChangeSet> {
        let (tx, rx) = unbounded();
        self.lock_subscribers().push(tx);
        rx
    }

    /// Publishes a change set and returns its revision.
    pub fn publish(&self, collections: &[Collection]) -> u64 {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        let change = ChangeSet {
            revision,
            collections: collections.to_vec(),
        };

        let mut subscribers = self.lock_subscribers();
        subscribers.retain(|tx| tx.send(change.clone()).is_ok());
        debug!(
            "event=change_publish module=live status=ok revision={revision} collections={} subscribers={}",
            collections
                .iter()
                .map(|collection| collection.as_str())
                .collect::<Vec<_>>()
                .join(","),
            subscribers.len()
        );
        revision
    }

    /// Revision of the last published change set; `0` before any write.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<Sender<ChangeSet>>> {
        // A poisoned list still holds valid senders.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
