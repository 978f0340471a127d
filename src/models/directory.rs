use crate::models::domain::{AttributeRecord, UserId};
use std::collections::HashMap;

/// Immutable mapping from user id to attribute record
///
/// Iteration follows insertion order, which the ranker relies on for
/// tie-breaking. Build once, then share behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ProfileDirectory {
    records: Vec<AttributeRecord>,
    index: HashMap<UserId, usize>,
}

impl ProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning `true` if it replaced an existing id
    ///
    /// A replaced record keeps the position of the one it replaced.
    pub fn insert(&mut self, record: AttributeRecord) -> bool {
        match self.index.get(&record.user_id) {
            Some(&pos) => {
                self.records[pos] = record;
                true
            }
            None => {
                self.index.insert(record.user_id, self.records.len());
                self.records.push(record);
                false
            }
        }
    }

    pub fn get(&self, user_id: UserId) -> Option<&AttributeRecord> {
        self.index.get(&user_id).map(|&pos| &self.records[pos])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &AttributeRecord> {
        self.records.iter()
    }
}

impl FromIterator<AttributeRecord> for ProfileDirectory {
    fn from_iter<I: IntoIterator<Item = AttributeRecord>>(iter: I) -> Self {
        let mut directory = ProfileDirectory::new();
        for record in iter {
            directory.insert(record);
        }
        directory
    }
}
