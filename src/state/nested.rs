//! Per-view nested slices keyed by parent id.
//!
//! Questions live under a question group (`/courses/{group}/questions`).
//! Each group gets its own [`ResourceSlice`], created on first use and owned
//! by the screen that opened it, so dropping the screen drops every nested
//! slice and deleting a group drops that group's entry.

use std::collections::BTreeMap;

use wire::{Record, RecordId};

use super::slice::ResourceSlice;
use crate::net::ApiClient;

pub struct ScopedSlices<R: Record> {
    client: ApiClient,
    parent_path: String,
    child: String,
    scopes: BTreeMap<RecordId, ResourceSlice<R>>,
}

impl<R: Record> ScopedSlices<R> {
    /// Slices at `{parent_path}/{id}/{child}`.
    #[must_use]
    pub fn new(client: ApiClient, parent_path: impl Into<String>, child: impl Into<String>) -> Self {
        Self { client, parent_path: parent_path.into(), child: child.into(), scopes: BTreeMap::new() }
    }

    /// Slice for `parent`, created on first use.
    pub fn scope(&mut self, parent: RecordId) -> ResourceSlice<R> {
        self.scopes
            .entry(parent)
            .or_insert_with(|| {
                let path = format!("{}/{parent}/{}", self.parent_path, self.child);
                ResourceSlice::new(self.client.clone(), path)
            })
            .clone()
    }

    #[must_use]
    pub fn get(&self, parent: RecordId) -> Option<&ResourceSlice<R>> {
        self.scopes.get(&parent)
    }

    /// Drop the slice of a deleted parent. Returns whether one existed.
    pub fn drop_scope(&mut self, parent: RecordId) -> bool {
        self.scopes.remove(&parent).is_some()
    }

    pub fn clear_all_errors(&self) {
        for slice in self.scopes.values() {
            slice.clear_all_errors();
        }
    }
}

#[cfg(test)]
#[path = "nested_test.rs"]
mod tests;
