use super::{RowKey, TableBinding};
use crate::error::ClientError;
use bsatn_types::codec::{BsatnReader, BsatnWriter};
use bsatn_types::sats::{AlgebraicType, AlgebraicValue, TypeWalker, Typespace};
use bsatn_types::{DecodeError, EncodeError};
use std::sync::Arc;

/// A binding whose row layout is only known at runtime.
///
/// Rows are [`AlgebraicValue`]s. The key is the BSATN encoding of the primary-key
/// field if one is set, and of the whole row otherwise.
#[derive(Debug, Clone)]
pub struct DynamicBinding {
    table_name: String,
    row_type: AlgebraicType,
    typespace: Arc<Typespace>,
    primary_key: Option<(String, AlgebraicType)>,
}

impl DynamicBinding {
    pub fn new(
        table_name: impl Into<String>,
        row_type: AlgebraicType,
        typespace: Arc<Typespace>,
    ) -> Result<Self, ClientError> {
        typespace.validate()?;
        Ok(Self {
            table_name: table_name.into(),
            row_type,
            typespace,
            primary_key: None,
        })
    }

    /// For row types that contain no references.
    pub fn without_refs(table_name: impl Into<String>, row_type: AlgebraicType) -> Self {
        Self {
            table_name: table_name.into(),
            row_type,
            typespace: Arc::new(Typespace::new()),
            primary_key: None,
        }
    }

    /// Keys rows by one field of the (struct) row type.
    pub fn with_primary_key(mut self, field: &str) -> Result<Self, ClientError> {
        let field_ty = match self.typespace.resolve(&self.row_type) {
            Some(AlgebraicType::Struct(st)) => st
                .fields
                .iter()
                .find(|f| f.name == field)
                .map(|f| f.ty.clone()),
            _ => None,
        };
        let field_ty = field_ty.ok_or_else(|| ClientError::NoSuchKeyField {
            table: self.table_name.clone(),
            field: field.to_string(),
        })?;
        self.primary_key = Some((field.to_string(), field_ty));
        Ok(self)
    }

    pub fn row_type(&self) -> &AlgebraicType {
        &self.row_type
    }

    pub fn primary_key_field(&self) -> Option<&str> {
        self.primary_key.as_ref().map(|(name, _)| name.as_str())
    }

    fn walker(&self) -> TypeWalker<'_> {
        TypeWalker::new(&self.typespace)
    }
}

impl TableBinding for DynamicBinding {
    type Row = AlgebraicValue;

    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn deserialize_row(&self, r: &mut BsatnReader) -> Result<AlgebraicValue, DecodeError> {
        self.walker().deserialize(&self.row_type, r)
    }

    fn primary_key(&self, row: &AlgebraicValue) -> Result<RowKey, EncodeError> {
        let mut w = BsatnWriter::new();
        match &self.primary_key {
            None => self.walker().serialize(&self.row_type, row, &mut w)?,
            Some((field, field_ty)) => {
                let value = row.field(field).ok_or_else(|| EncodeError::MissingField {
                    type_name: self.row_type.type_name(),
                    field: field.clone(),
                })?;
                self.walker().serialize(field_ty, value, &mut w)?;
            }
        }
        Ok(RowKey::from(w.into_vec()))
    }
}
