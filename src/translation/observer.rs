/*!
 * Trace hooks for leaf translations.
 *
 * Observers see one record per translated leaf. They are strictly
 * side-channel: nothing they do can change the outcome of a run.
 */

use indicatif::ProgressBar;
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::errors::ProviderError;

/// One translated leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    /// Location of the leaf, e.g. `nested.farewell` or `items[2]`
    pub path: String,
    pub source_text: String,
    pub target_language: String,
    pub translated_text: String,
}

/// Receives a record for every leaf the translator resolves
pub trait TraceObserver: Send + Sync {
    fn on_leaf(&self, record: &TraceRecord);

    /// Called once for a leaf whose translation failed
    fn on_failure(&self, _path: &str, _error: &ProviderError) {}
}

/// Writes every record to the debug log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl TraceObserver for LogObserver {
    fn on_leaf(&self, record: &TraceRecord) {
        debug!(
            "{}: {:?} => ({}) {:?}",
            record.path, record.source_text, record.target_language, record.translated_text
        );
    }
}

/// Keeps every record in memory
#[derive(Debug, Default, Clone)]
pub struct CollectingObserver {
    records: Arc<Mutex<Vec<TraceRecord>>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far, in arrival order
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().clone()
    }
}

impl TraceObserver for CollectingObserver {
    fn on_leaf(&self, record: &TraceRecord) {
        self.records.lock().push(record.clone());
    }
}

/// Advances a progress bar by one per leaf
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl TraceObserver for ProgressObserver {
    fn on_leaf(&self, _record: &TraceRecord) {
        self.bar.inc(1);
    }

    fn on_failure(&self, _path: &str, _error: &ProviderError) {
        self.bar.inc(1);
    }
}

/// Fans a record out to several observers
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn TraceObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn TraceObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl TraceObserver for CompositeObserver {
    fn on_leaf(&self, record: &TraceRecord) {
        for observer in &self.observers {
            observer.on_leaf(record);
        }
    }

    fn on_failure(&self, path: &str, error: &ProviderError) {
        for observer in &self.observers {
            observer.on_failure(path, error);
        }
    }
}
