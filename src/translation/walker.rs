/*!
 * Recursive, structure-preserving traversal of a JSON document.
 *
 * String leaves go to the [`LeafTranslator`]; objects and arrays are rebuilt
 * with the same keys, order and length; numbers, booleans and null pass
 * through untouched. Traversal is pre-order, depth-first, left-to-right.
 *
 * With `concurrency > 1` the string leaves are collected in that same order,
 * translated through an ordered buffered stream and written back by
 * position, so the resulting tree is identical to the sequential one.
 */

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use log::warn;
use serde_json::Value;

use crate::errors::{PipelineError, ProviderError};
use crate::translation::leaf::LeafTranslator;

/// What to do when a leaf cannot be translated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the whole walk on the first failure
    #[default]
    Abort,
    /// Keep the source text for failed leaves and report them
    BestEffort,
}

/// A leaf whose translation failed
#[derive(Debug)]
pub struct LeafFailure {
    pub path: String,
    pub text: String,
    pub error: ProviderError,
}

impl From<LeafFailure> for PipelineError {
    fn from(failure: LeafFailure) -> Self {
        PipelineError::TranslationFailure {
            path: failure.path,
            text: failure.text,
            source: failure.error,
        }
    }
}

/// Counters collected during a walk
#[derive(Debug, Default)]
pub struct WalkStats {
    /// String leaves sent to the port and translated
    pub translated: usize,
    /// Empty strings left as they were
    pub skipped_empty: usize,
    /// Numbers, booleans and nulls
    pub passed_through: usize,
    /// Failures kept in best-effort mode
    pub failures: Vec<LeafFailure>,
}

/// Walks a JSON tree and translates its string leaves
pub struct TreeWalker {
    leaf: LeafTranslator,
    concurrency: usize,
    policy: FailurePolicy,
}

impl TreeWalker {
    /// Sequential walker that aborts on the first failure
    pub fn new(leaf: LeafTranslator) -> Self {
        Self {
            leaf,
            concurrency: 1,
            policy: FailurePolicy::Abort,
        }
    }

    /// Allow up to `concurrency` translations in flight
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Translate `value` and return the new tree
    pub async fn translate(&self, value: Value, target_language: &str) -> Result<Value, LeafFailure> {
        let mut value = value;
        self.translate_in_place(&mut value, target_language).await?;
        Ok(value)
    }

    /// Replace every string leaf of `value` with its translation
    ///
    /// On an aborting failure `value` may be partially translated and must be
    /// discarded by the caller.
    pub async fn translate_in_place(&self, value: &mut Value, target_language: &str) -> Result<WalkStats, LeafFailure> {
        let mut stats = WalkStats::default();
        if self.concurrency > 1 {
            self.walk_buffered(value, target_language, &mut stats).await?;
        } else {
            self.walk_node(value, String::new(), target_language, &mut stats).await?;
        }
        Ok(stats)
    }

    fn walk_node<'a>(
        &'a self,
        value: &'a mut Value,
        path: String,
        target_language: &'a str,
        stats: &'a mut WalkStats,
    ) -> BoxFuture<'a, Result<(), LeafFailure>> {
        Box::pin(async move {
            match value {
                Value::String(text) => {
                    if text.is_empty() {
                        stats.skipped_empty += 1;
                        return Ok(());
                    }
                    let path = leaf_path(path);
                    let result = self.leaf.translate_leaf_at(&path, text, target_language).await;
                    if let Some(translated) = self.settle(path, text, result, stats)? {
                        *text = translated;
                    }
                }
                Value::Object(map) => {
                    for (key, child) in map.iter_mut() {
                        self.walk_node(child, child_key(&path, key), target_language, stats).await?;
                    }
                }
                Value::Array(items) => {
                    for (index, child) in items.iter_mut().enumerate() {
                        self.walk_node(child, child_index(&path, index), target_language, stats).await?;
                    }
                }
                Value::Number(_) | Value::Bool(_) | Value::Null => stats.passed_through += 1,
            }
            Ok(())
        })
    }

    async fn walk_buffered(
        &self,
        value: &mut Value,
        target_language: &str,
        stats: &mut WalkStats,
    ) -> Result<(), LeafFailure> {
        let mut leaves = Vec::new();
        collect_leaves(value, String::new(), &mut leaves, stats);

        let mut results = stream::iter(leaves.iter())
            .map(|(path, text)| self.leaf.translate_leaf_at(path, text, target_language))
            .buffered(self.concurrency);

        let mut resolved = Vec::with_capacity(leaves.len());
        let mut index = 0;
        while let Some(result) = results.next().await {
            let (path, text) = &leaves[index];
            resolved.push(self.settle(path.clone(), text, result, stats)?);
            index += 1;
        }
        drop(results);

        let mut resolved = resolved.into_iter();
        apply_leaves(value, &mut resolved);
        Ok(())
    }

    /// Turn a leaf result into the replacement text, honoring the policy
    ///
    /// `Ok(None)` keeps the source text in place.
    fn settle(
        &self,
        path: String,
        text: &str,
        result: Result<String, ProviderError>,
        stats: &mut WalkStats,
    ) -> Result<Option<String>, LeafFailure> {
        match result {
            Ok(translated) => {
                stats.translated += 1;
                Ok(Some(translated))
            }
            Err(error) => {
                let failure = LeafFailure {
                    path,
                    text: text.to_string(),
                    error,
                };
                match self.policy {
                    FailurePolicy::Abort => Err(failure),
                    FailurePolicy::BestEffort => {
                        warn!("Keeping source text at '{}': {}", failure.path, failure.error);
                        stats.failures.push(failure);
                        Ok(None)
                    }
                }
            }
        }
    }
}

/// Number of string leaves a walk of `value` will send to the port
pub fn count_translatable(value: &Value) -> usize {
    match value {
        Value::String(text) => usize::from(!text.is_empty()),
        Value::Object(map) => map.values().map(count_translatable).sum(),
        Value::Array(items) => items.iter().map(count_translatable).sum(),
        Value::Number(_) | Value::Bool(_) | Value::Null => 0,
    }
}

/// Pre-order list of the non-empty string leaves with their paths
fn collect_leaves(value: &Value, path: String, leaves: &mut Vec<(String, String)>, stats: &mut WalkStats) {
    match value {
        Value::String(text) if text.is_empty() => stats.skipped_empty += 1,
        Value::String(text) => leaves.push((leaf_path(path), text.clone())),
        Value::Object(map) => {
            for (key, child) in map {
                collect_leaves(child, child_key(&path, key), leaves, stats);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                collect_leaves(child, child_index(&path, index), leaves, stats);
            }
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => stats.passed_through += 1,
    }
}

/// Write resolved leaves back in the order `collect_leaves` produced them
fn apply_leaves(value: &mut Value, resolved: &mut impl Iterator<Item = Option<String>>) {
    match value {
        Value::String(text) if text.is_empty() => {}
        Value::String(text) => {
            if let Some(Some(translated)) = resolved.next() {
                *text = translated;
            }
        }
        Value::Object(map) => {
            for (_, child) in map.iter_mut() {
                apply_leaves(child, resolved);
            }
        }
        Value::Array(items) => {
            for child in items.iter_mut() {
                apply_leaves(child, resolved);
            }
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

fn leaf_path(path: String) -> String {
    if path.is_empty() { "$".to_string() } else { path }
}

/// `parent.key`, or `parent["key"]` when the key itself holds path syntax
fn child_key(parent: &str, key: &str) -> String {
    if key.is_empty() || key == "$" || key.contains(['.', '[', ']', '"']) {
        format!("{}[{:?}]", parent, key)
    } else if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn child_index(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}
