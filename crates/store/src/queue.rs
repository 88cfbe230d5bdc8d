// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent priority queue, one file per agent.
//!
//! The stored sequence is a stable sort by `(priority rank, insertion)`:
//! `submit` inserts at the last position of the item's priority band, so
//! iterating front to back drains in non-decreasing rank with FIFO inside
//! each band. Items leave only via `complete`.

use crate::{fsutil, lock, StateLayout, StoreError};
use pan_core::{ItemId, QueueCheck, QueueItem};

#[derive(Debug, Clone)]
pub struct QueueStore {
    layout: StateLayout,
}

impl QueueStore {
    pub fn new(layout: StateLayout) -> Self {
        Self { layout }
    }

    fn load(&self, agent_id: &str) -> Result<Vec<QueueItem>, StoreError> {
        Ok(fsutil::load_json(&self.layout.queue(agent_id))?.unwrap_or_default())
    }

    fn save(&self, agent_id: &str, items: &[QueueItem]) -> Result<(), StoreError> {
        fsutil::write_json_atomic(&self.layout.queue(agent_id), &items)
    }

    /// Append an item at the end of its priority band.
    pub fn submit(&self, agent_id: &str, item: QueueItem) -> Result<(), StoreError> {
        let path = self.layout.queue(agent_id);
        lock::with_file_lock(&path, || {
            let mut items = self.load(agent_id)?;
            let pos = items
                .iter()
                .position(|existing| existing.priority.rank() > item.priority.rank())
                .unwrap_or(items.len());
            items.insert(pos, item);
            self.save(agent_id, &items)
        })
    }

    /// Head of the queue without removing it.
    pub fn peek_next(&self, agent_id: &str) -> Result<Option<QueueItem>, StoreError> {
        Ok(self.load(agent_id)?.into_iter().next())
    }

    /// Remove the item with the given id. Returns whether a removal occurred.
    pub fn complete(&self, agent_id: &str, item_id: &ItemId) -> Result<bool, StoreError> {
        let path = self.layout.queue(agent_id);
        lock::with_file_lock(&path, || {
            let mut items = self.load(agent_id)?;
            let before = items.len();
            items.retain(|item| item.id != *item_id);
            if items.len() == before {
                return Ok(false);
            }
            self.save(agent_id, &items)?;
            Ok(true)
        })
    }

    pub fn check(&self, agent_id: &str) -> Result<QueueCheck, StoreError> {
        let items = self.load(agent_id)?;
        Ok(QueueCheck {
            has_work: !items.is_empty(),
            urgent_count: items
                .iter()
                .filter(|item| item.priority == pan_core::Priority::Urgent)
                .count(),
            items,
        })
    }

    /// Replace the stored ordering with the supplied permutation.
    ///
    /// Returns `Ok(false)` and applies no change when the id multiset does
    /// not exactly match the current queue.
    pub fn reorder(&self, agent_id: &str, ids: &[ItemId]) -> Result<bool, StoreError> {
        let path = self.layout.queue(agent_id);
        lock::with_file_lock(&path, || {
            let items = self.load(agent_id)?;

            let mut current: Vec<&ItemId> = items.iter().map(|item| &item.id).collect();
            let mut requested: Vec<&ItemId> = ids.iter().collect();
            current.sort();
            requested.sort();
            if current != requested {
                return Ok(false);
            }

            let mut pool = items;
            let mut reordered = Vec::with_capacity(pool.len());
            for id in ids {
                // Multisets match, so every id resolves; duplicates take the
                // first remaining occurrence.
                if let Some(pos) = pool.iter().position(|item| item.id == *id) {
                    reordered.push(pool.remove(pos));
                }
            }

            self.save(agent_id, &reordered)?;
            Ok(true)
        })
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
