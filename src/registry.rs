//! Table registry
//!
//! Holds completed tables addressable by id. Inserting a table whose id is
//! already present replaces the old entry and moves it to the end of the
//! listing order. The registry is shared between upload tasks, so all access
//! goes through a `parking_lot::RwLock`.

use crate::types::{Table, TableId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct Entries {
    tables: HashMap<TableId, Arc<Table>>,
    /// Insertion order of the ids in `tables`
    order: Vec<TableId>,
}

/// Concurrent store of decoded tables
#[derive(Default)]
pub struct TableRegistry {
    entries: RwLock<Entries>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a table, returning the entry it replaced
    pub fn insert(&self, table: Table) -> Option<Arc<Table>> {
        let id = table.id();
        let mut entries = self.entries.write();
        let replaced = entries.tables.insert(id, Arc::new(table));
        if replaced.is_some() {
            entries.order.retain(|existing| *existing != id);
        }
        entries.order.push(id);
        replaced
    }

    pub fn get(&self, id: TableId) -> Option<Arc<Table>> {
        self.entries.read().tables.get(&id).cloned()
    }

    pub fn remove(&self, id: TableId) -> Option<Arc<Table>> {
        let mut entries = self.entries.write();
        let removed = entries.tables.remove(&id);
        if removed.is_some() {
            entries.order.retain(|existing| *existing != id);
        }
        removed
    }

    pub fn contains(&self, id: TableId) -> bool {
        self.entries.read().tables.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in insertion order
    pub fn ids(&self) -> Vec<TableId> {
        self.entries.read().order.clone()
    }

    /// Tables in insertion order
    pub fn tables(&self) -> Vec<Arc<Table>> {
        let entries = self.entries.read();
        entries
            .order
            .iter()
            .filter_map(|id| entries.tables.get(id).cloned())
            .collect()
    }

    /// Oldest registered table
    pub fn first(&self) -> Option<Arc<Table>> {
        let entries = self.entries.read();
        entries
            .order
            .first()
            .and_then(|id| entries.tables.get(id).cloned())
    }
}
