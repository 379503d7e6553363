//! Live query: a query re-run whenever its inputs change.
//!
//! # Invariants
//! - `current()` is `None` until the first result for the current
//!   dependency key has been computed ("loading", not "empty").
//! - After `set_dependencies` with a new key, nothing computed or queued
//!   for the previous key is ever delivered.

use crate::live::bus::{ChangeSet, Collection};
use crate::repo::StoreResult;
use crate::store::Storage;
use crossbeam_channel::Receiver;
use log::debug;

type QueryFn<S, D, T> = Box<dyn Fn(&S, &D) -> StoreResult<T>>;

pub struct LiveQuery<S, D, T> {
    changes: Receiver<ChangeSet>,
    watches: Vec<Collection>,
    deps: D,
    query: QueryFn<S, D, T>,
    current: Option<T>,
    stale: bool,
    generation: u64,
    seen_revision: u64,
}

impl<S, D, T> LiveQuery<S, D, T>
where
    S: Storage,
    D: PartialEq,
{
    /// Subscribes `query` to changes of `watches` on `store`.
    ///
    /// No query runs until the first `refresh`.
    pub fn new(
        store: &S,
        watches: &[Collection],
        deps: D,
        query: impl Fn(&S, &D) -> StoreResult<T> + 'static,
    ) -> Self {
        Self {
            changes: store.changes().subscribe(),
            watches: watches.to_vec(),
            deps,
            query: Box::new(query),
            current: None,
            stale: true,
            generation: 0,
            seen_revision: 0,
        }
    }

    /// Latest delivered result, or `None` while loading.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Number of dependency-key changes seen so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Highest change revision this query has consumed.
    pub fn seen_revision(&self) -> u64 {
        self.seen_revision
    }

    /// Switches the dependency key.
    ///
    /// Returns `false` and keeps the current result when `deps` is equal to
    /// the active key.
    pub fn set_dependencies(&mut self, deps: D) -> bool {
        if self.deps == deps {
            return false;
        }
        self.deps = deps;
        self.generation += 1;
        self.current = None;
        self.stale = true;
        self.drain();
        debug!(
            "event=live_query_rekey module=live status=ok generation={}",
            self.generation
        );
        true
    }

    /// Consumes pending change sets and re-runs the query when needed.
    ///
    /// Returns `Ok(true)` when a fresh result was delivered. On error the
    /// previous result is kept and the query stays stale, so the next
    /// refresh retries.
    pub fn refresh(&mut self, store: &S) -> StoreResult<bool> {
        if self.drain() {
            self.stale = true;
        }
        if !self.stale {
            return Ok(false);
        }

        let result = (self.query)(store, &self.deps)?;
        self.current = Some(result);
        self.stale = false;
        Ok(true)
    }

    /// Returns whether any drained change set touched a watched collection.
    fn drain(&mut self) -> bool {
        let mut relevant = false;
        for change in self.changes.try_iter() {
            self.seen_revision = self.seen_revision.max(change.revision);
            relevant |= change.touches_any(&self.watches);
        }
        relevant
    }
}
