use super::Compression;
use bsatn_types::codec::{BsatnReader, BsatnWriter};
use bsatn_types::{get_tag, put_tag, DecodeError, Deser, EncodeError, Ser, WireTag};
use bytes::Bytes;
use num_derive::{FromPrimitive, ToPrimitive};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatabaseUpdate {
    pub tables: Vec<TableUpdate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableUpdate {
    pub table_id: u32,
    pub table_name: String,
    pub num_rows: u64,
    pub updates: Vec<CompressableQueryUpdate>,
}

/// A query update as it sits on the wire. Compressed variants keep their
/// payload so that the frame can still be read past them.
#[derive(Debug, Clone, PartialEq)]
pub enum CompressableQueryUpdate {
    Uncompressed(QueryUpdate),
    Brotli(Bytes),
    Gzip(Bytes),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryUpdate {
    pub deletes: BsatnRowList,
    pub inserts: BsatnRowList,
}

/// Concatenated BSATN rows of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct BsatnRowList {
    pub size_hint: RowSizeHint,
    pub rows_data: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowSizeHint {
    /// Every row is this many bytes.
    FixedSize(u16),
    /// Start offset of each row within `rows_data`.
    RowOffsets(Vec<u64>),
}

#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, FromPrimitive, ToPrimitive)]
pub enum RowSizeHintTag {
    FixedSize = 0,
    RowOffsets = 1,
}
impl WireTag for RowSizeHintTag {
    const TYPE_NAME: &'static str = "RowSizeHint";
    const VARIANT_COUNT: usize = 2;
}

impl BsatnRowList {
    pub fn new(size_hint: RowSizeHint, rows_data: impl Into<Bytes>) -> Self {
        Self {
            size_hint,
            rows_data: rows_data.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows_data.is_empty()
    }

    /// The number of rows the hint claims, if it can tell.
    pub fn row_count_hint(&self) -> Option<usize> {
        match &self.size_hint {
            RowSizeHint::FixedSize(0) => None,
            RowSizeHint::FixedSize(size) => Some(self.rows_data.len() / *size as usize),
            RowSizeHint::RowOffsets(offsets) => Some(offsets.len()),
        }
    }

    /// Splits `rows_data` into rows using the size hint alone.
    ///
    /// `None` if the hint is inconsistent with the data. Row application never
    /// relies on this; it reads rows one at a time with the table's own schema.
    pub fn row_slices(&self) -> Option<Vec<&[u8]>> {
        let data = &self.rows_data[..];
        match &self.size_hint {
            RowSizeHint::FixedSize(0) => data.is_empty().then(Vec::new),
            RowSizeHint::FixedSize(size) => {
                let size = *size as usize;
                (data.len() % size == 0).then(|| data.chunks(size).collect())
            }
            RowSizeHint::RowOffsets(offsets) => {
                let mut rows = Vec::with_capacity(offsets.len());
                for (i, start) in offsets.iter().enumerate() {
                    let start = usize::try_from(*start).ok()?;
                    let end = match offsets.get(i + 1) {
                        Some(next) => usize::try_from(*next).ok()?,
                        None => data.len(),
                    };
                    rows.push(data.get(start..end)?);
                }
                let covers_all = match offsets.first() {
                    Some(first) => *first == 0,
                    None => data.is_empty(),
                };
                covers_all.then_some(rows)
            }
        }
    }
}

impl Default for BsatnRowList {
    fn default() -> Self {
        Self::new(RowSizeHint::RowOffsets(vec![]), Bytes::new())
    }
}

#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, FromPrimitive, ToPrimitive)]
pub enum UpdateStatusTag {
    Committed = 0,
    Failed = 1,
    OutOfEnergy = 2,
}
impl WireTag for UpdateStatusTag {
    const TYPE_NAME: &'static str = "UpdateStatus";
    const VARIANT_COUNT: usize = 3;
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateStatus {
    Committed(DatabaseUpdate),
    Failed(String),
    OutOfEnergy,
}

/* DatabaseUpdate */

impl Ser for DatabaseUpdate {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        self.tables.ser(w)
    }
}
impl Deser for DatabaseUpdate {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        Ok(Self {
            tables: Vec::<TableUpdate>::deser(r)?,
        })
    }
}

/* TableUpdate */

impl Ser for TableUpdate {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        w.put_u32(self.table_id);
        w.put_string(&self.table_name)?;
        w.put_u64(self.num_rows);
        self.updates
            .ser(w)
            .map_err(|e| e.context(format!("table `{}`", self.table_name)))
    }
}
impl Deser for TableUpdate {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let table_id = r.get_u32()?;
        let table_name = r.get_string()?;
        let num_rows = r.get_u64()?;
        let updates = Vec::<CompressableQueryUpdate>::deser(r)
            .map_err(|e| e.context(format!("table `{}`", table_name)))?;
        Ok(Self {
            table_id,
            table_name,
            num_rows,
            updates,
        })
    }
}

/* CompressableQueryUpdate */

impl Ser for CompressableQueryUpdate {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        match self {
            Self::Uncompressed(qu) => {
                put_tag(w, Compression::None)?;
                qu.ser(w)
            }
            Self::Brotli(blob) => {
                put_tag(w, Compression::Brotli)?;
                w.put_bytes(blob)
            }
            Self::Gzip(blob) => {
                put_tag(w, Compression::Gzip)?;
                w.put_bytes(blob)
            }
        }
    }
}
impl Deser for CompressableQueryUpdate {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        match get_tag(r)? {
            Compression::None => Ok(Self::Uncompressed(QueryUpdate::deser(r)?)),
            Compression::Brotli => Ok(Self::Brotli(Bytes::copy_from_slice(r.get_byte_slice()?))),
            Compression::Gzip => Ok(Self::Gzip(Bytes::copy_from_slice(r.get_byte_slice()?))),
        }
    }
}

/* QueryUpdate */

impl Ser for QueryUpdate {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        self.deletes.ser(w)?;
        self.inserts.ser(w)
    }
}
impl Deser for QueryUpdate {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let deletes = BsatnRowList::deser(r).map_err(|e| e.context("deletes"))?;
        let inserts = BsatnRowList::deser(r).map_err(|e| e.context("inserts"))?;
        Ok(Self { deletes, inserts })
    }
}

/* BsatnRowList */

impl Ser for BsatnRowList {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        self.size_hint.ser(w)?;
        w.put_bytes(&self.rows_data)
    }
}
impl Deser for BsatnRowList {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let size_hint = RowSizeHint::deser(r)?;
        let rows_data = Bytes::copy_from_slice(r.get_byte_slice()?);
        Ok(Self {
            size_hint,
            rows_data,
        })
    }
}

/* RowSizeHint */

impl Ser for RowSizeHint {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        match self {
            Self::FixedSize(size) => {
                put_tag(w, RowSizeHintTag::FixedSize)?;
                w.put_u16(*size);
                Ok(())
            }
            Self::RowOffsets(offsets) => {
                put_tag(w, RowSizeHintTag::RowOffsets)?;
                offsets.ser(w)
            }
        }
    }
}
impl Deser for RowSizeHint {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        match get_tag(r)? {
            RowSizeHintTag::FixedSize => Ok(Self::FixedSize(r.get_u16()?)),
            RowSizeHintTag::RowOffsets => Ok(Self::RowOffsets(Vec::<u64>::deser(r)?)),
        }
    }
}

/* UpdateStatus */

impl Ser for UpdateStatus {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        match self {
            Self::Committed(update) => {
                put_tag(w, UpdateStatusTag::Committed)?;
                update.ser(w)
            }
            Self::Failed(message) => {
                put_tag(w, UpdateStatusTag::Failed)?;
                w.put_string(message)
            }
            Self::OutOfEnergy => put_tag(w, UpdateStatusTag::OutOfEnergy),
        }
    }
}
impl Deser for UpdateStatus {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        match get_tag(r)? {
            UpdateStatusTag::Committed => Ok(Self::Committed(DatabaseUpdate::deser(r)?)),
            UpdateStatusTag::Failed => Ok(Self::Failed(r.get_string()?)),
            UpdateStatusTag::OutOfEnergy => Ok(Self::OutOfEnergy),
        }
    }
}
