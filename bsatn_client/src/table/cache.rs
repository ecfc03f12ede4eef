use super::{RowKey, TableBinding};
use crate::error::ClientError;
use crate::messages::{BsatnRowList, CompressableQueryUpdate, TableUpdate};
use bsatn_types::codec::BsatnReader;
use bsatn_types::{DecodeError, Ser, UnsupportedFeature};
use std::any::Any;
use std::collections::HashMap;

/// What one committed table update did, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableDelta {
    pub table: String,
    /// Keys that were not in the cache before.
    pub inserted: Vec<RowKey>,
    pub deleted: Vec<RowKey>,
    /// Keys whose cached row was overwritten by an insert. Each key appears once.
    pub updated: Vec<RowKey>,
    /// Deletes of keys the cache did not hold. These left the cache untouched.
    pub not_found: Vec<RowKey>,
}

impl TableDelta {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
            && self.deleted.is_empty()
            && self.updated.is_empty()
            && self.not_found.is_empty()
    }
}

/// A table cache with its row type erased, as held by [`super::TableRegistry`].
pub trait TableHandle: Send + Sync {
    fn name(&self) -> &str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &RowKey) -> bool;

    /// Reads one row and inserts it, replacing any row with the same key.
    fn insert_from(&mut self, r: &mut BsatnReader) -> Result<RowKey, ClientError>;

    /// Reads one row and deletes the row with its key.
    ///
    /// The row is read even if no such key is cached, in which case the cache is
    /// left unchanged and [`ClientError::RowNotFound`] is returned.
    fn delete_from(&mut self, r: &mut BsatnReader) -> Result<RowKey, ClientError>;

    /// Decodes every row of `update` without touching the cached rows.
    ///
    /// On error nothing from `update` is staged.
    fn stage(&mut self, update: &TableUpdate) -> Result<(), ClientError>;

    /// Applies everything staged so far.
    fn commit(&mut self) -> TableDelta;

    fn discard(&mut self);

    fn as_any(&self) -> &dyn Any;
}

struct StagedQuery<R> {
    inserts: Vec<(RowKey, R)>,
    deletes: Vec<RowKey>,
}

pub struct TableCache<B: TableBinding> {
    binding: B,
    rows: HashMap<RowKey, B::Row>,
    staged: Vec<StagedQuery<B::Row>>,
}

impl<B: TableBinding> TableCache<B> {
    pub fn new(binding: B) -> Self {
        Self {
            binding,
            rows: HashMap::new(),
            staged: vec![],
        }
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn get(&self, key: &RowKey) -> Option<&B::Row> {
        self.rows.get(key)
    }

    /// Looks a row up by its primary-key value.
    pub fn find<K: Ser + ?Sized>(&self, key: &K) -> Option<&B::Row> {
        let key = RowKey::of(key).ok()?;
        self.rows.get(&key)
    }

    /// In no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&RowKey, &B::Row)> {
        self.rows.iter()
    }

    pub fn rows(&self) -> impl Iterator<Item = &B::Row> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn read_row(&self, r: &mut BsatnReader) -> Result<(RowKey, B::Row), ClientError> {
        let offset = r.offset();
        let row = self
            .binding
            .deserialize_row(r)
            .map_err(|e| e.context(format!("row at offset {}", offset)))?;
        if r.offset() == offset {
            return Err(DecodeError::EmptyRow {
                table: self.binding.table_name().to_string(),
                offset,
            }
            .into());
        }
        let key = self.binding.primary_key(&row)?;
        Ok((key, row))
    }

    fn read_rows(&self, list: &BsatnRowList) -> Result<Vec<(RowKey, B::Row)>, ClientError> {
        let mut r = BsatnReader::new(&list.rows_data);
        let mut rows = Vec::with_capacity(list.row_count_hint().unwrap_or(0));
        while !r.is_exhausted() {
            rows.push(self.read_row(&mut r)?);
        }
        Ok(rows)
    }

    fn stage_query(
        &self,
        update: &CompressableQueryUpdate,
    ) -> Result<StagedQuery<B::Row>, ClientError> {
        let update = match update {
            CompressableQueryUpdate::Uncompressed(update) => update,
            CompressableQueryUpdate::Brotli(_) => {
                return Err(ClientError::Unsupported(
                    UnsupportedFeature::BrotliCompression,
                ))
            }
            CompressableQueryUpdate::Gzip(_) => {
                return Err(ClientError::Unsupported(UnsupportedFeature::GzipCompression))
            }
        };
        let inserts = self.read_rows(&update.inserts)?;
        let deletes = self
            .read_rows(&update.deletes)?
            .into_iter()
            .map(|(key, _row)| key)
            .collect();
        Ok(StagedQuery { inserts, deletes })
    }

    fn not_found(&self, key: &RowKey) -> ClientError {
        ClientError::RowNotFound {
            table: self.binding.table_name().to_string(),
            key: key.to_string(),
        }
    }
}

impl<B: TableBinding> TableHandle for TableCache<B> {
    fn name(&self) -> &str {
        self.binding.table_name()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn contains_key(&self, key: &RowKey) -> bool {
        self.rows.contains_key(key)
    }

    fn insert_from(&mut self, r: &mut BsatnReader) -> Result<RowKey, ClientError> {
        let (key, row) = self.read_row(r)?;
        self.rows.insert(key.clone(), row);
        Ok(key)
    }

    fn delete_from(&mut self, r: &mut BsatnReader) -> Result<RowKey, ClientError> {
        let (key, _row) = self.read_row(r)?;
        match self.rows.remove(&key) {
            Some(_) => Ok(key),
            None => Err(self.not_found(&key)),
        }
    }

    fn stage(&mut self, update: &TableUpdate) -> Result<(), ClientError> {
        let staged = update
            .updates
            .iter()
            .map(|query| self.stage_query(query))
            .collect::<Result<Vec<_>, _>>()?;
        self.staged.extend(staged);
        Ok(())
    }

    fn commit(&mut self) -> TableDelta {
        let mut delta = TableDelta::new(self.binding.table_name());

        // Per query: every insert, then every delete.
        for StagedQuery { inserts, deletes } in std::mem::take(&mut self.staged) {
            for (key, row) in inserts {
                match self.rows.insert(key.clone(), row) {
                    None => delta.inserted.push(key),
                    Some(_) => {
                        if !delta.updated.contains(&key) && !delta.inserted.contains(&key) {
                            delta.updated.push(key);
                        }
                    }
                }
            }

            for key in deletes {
                if self.rows.remove(&key).is_some() {
                    delta.deleted.push(key);
                } else {
                    delta.not_found.push(key);
                }
            }
        }

        delta
    }

    fn discard(&mut self) {
        self.staged.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
