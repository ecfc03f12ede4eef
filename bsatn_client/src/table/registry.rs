use super::{TableBinding, TableCache, TableDelta, TableHandle};
use crate::error::ClientError;
use crate::messages::{DatabaseUpdate, TableUpdate};
use std::collections::HashMap;
use tracing::{debug, warn};

/// The result of applying one [`DatabaseUpdate`].
///
/// Errors that affect only one table are collected here; the other tables
/// are still applied.
#[derive(Debug, Default)]
pub struct ApplyOutcome {
    pub deltas: Vec<TableDelta>,
    pub errors: Vec<ClientError>,
}

impl ApplyOutcome {
    pub fn delta(&self, table: &str) -> Option<&TableDelta> {
        self.deltas.iter().find(|d| d.table == table)
    }
}

/// Every cached table, by name.
#[derive(Default)]
pub struct TableRegistry {
    tables: HashMap<String, Box<dyn TableHandle>>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table previously registered under the same name, if any.
    pub fn register<B: TableBinding>(&mut self, binding: B) -> Option<Box<dyn TableHandle>> {
        let name = binding.table_name().to_string();
        self.tables.insert(name, Box::new(TableCache::new(binding)))
    }

    pub fn with_table<B: TableBinding>(mut self, binding: B) -> Self {
        self.register(binding);
        self
    }

    pub fn get<B: TableBinding>(&self, name: &str) -> Option<&TableCache<B>> {
        self.tables.get(name)?.as_any().downcast_ref()
    }

    pub fn handle(&self, name: &str) -> Option<&dyn TableHandle> {
        self.tables.get(name).map(|t| t.as_ref())
    }

    pub fn handle_mut(&mut self, name: &str) -> Option<&mut (dyn TableHandle + 'static)> {
        self.tables.get_mut(name).map(|t| t.as_mut())
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Applies one table's update on its own.
    pub fn apply_table_update(&mut self, update: &TableUpdate) -> Result<TableDelta, ClientError> {
        let name = update.table_name.as_str();
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| ClientError::UnknownTable(name.to_string()))?;
        if let Err(e) = table.stage(update) {
            table.discard();
            return Err(e.in_table(name));
        }
        Ok(table.commit())
    }

    /// Decodes the rows of every table first, then commits them all.
    ///
    /// A row that fails to decode or to be keyed fails the whole update with no
    /// table mutated. Unknown tables, compressed query updates, and deletes of
    /// absent rows are reported in [`ApplyOutcome::errors`] instead.
    pub fn apply_database_update(
        &mut self,
        update: &DatabaseUpdate,
    ) -> Result<ApplyOutcome, ClientError> {
        let mut outcome = ApplyOutcome::default();
        let mut staged: Vec<&str> = vec![];

        /* Stage */

        for table_update in &update.tables {
            let name = table_update.table_name.as_str();
            let Some(table) = self.tables.get_mut(name) else {
                warn!(table = name, "update for a table that is not registered");
                outcome.errors.push(ClientError::UnknownTable(name.to_string()));
                continue;
            };

            match table.stage(table_update) {
                Ok(()) => {
                    if !staged.contains(&name) {
                        staged.push(name);
                    }
                }
                Err(e @ (ClientError::Decode(_) | ClientError::Encode(_))) => {
                    warn!(table = name, error = %e, "discarding database update");
                    self.discard_all();
                    return Err(e.in_table(name));
                }
                Err(e) => {
                    warn!(table = name, error = %e, "skipping table update");
                    outcome.errors.push(e.in_table(name));
                }
            }
        }

        /* Commit */

        for name in staged {
            if let Some(table) = self.tables.get_mut(name) {
                let delta = table.commit();
                debug!(
                    table = name,
                    inserted = delta.inserted.len(),
                    deleted = delta.deleted.len(),
                    updated = delta.updated.len(),
                    "committed table update"
                );
                for key in &delta.not_found {
                    outcome.errors.push(ClientError::RowNotFound {
                        table: name.to_string(),
                        key: key.to_string(),
                    });
                }
                outcome.deltas.push(delta);
            }
        }

        Ok(outcome)
    }

    fn discard_all(&mut self) {
        for table in self.tables.values_mut() {
            table.discard();
        }
    }
}
