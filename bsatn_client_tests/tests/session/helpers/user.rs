use bsatn_client::messages::{BsatnRowList, RowSizeHint};
use bsatn_client::{RowKey, TableBinding};
use bsatn_types::codec::{BsatnReader, BsatnWriter};
use bsatn_types::domain::Identity;
use bsatn_types::{DecodeError, Deser, EncodeError, Ser};

/// The `user` table of the quickstart chat module.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub identity: Identity,
    pub name: Option<String>,
    pub online: bool,
}

impl Ser for User {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        self.identity.ser(w)?;
        self.name.ser(w)?;
        w.put_bool(self.online);
        Ok(())
    }
}
impl Deser for User {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let identity = Identity::deser(r)?;
        let name = Option::<String>::deser(r)?;
        let online = r.get_bool()?;
        Ok(Self {
            identity,
            name,
            online,
        })
    }
}

pub struct UserBinding;

impl TableBinding for UserBinding {
    type Row = User;

    fn table_name(&self) -> &str {
        "user"
    }

    fn deserialize_row(&self, r: &mut BsatnReader) -> Result<User, DecodeError> {
        User::deser(r)
    }

    fn primary_key(&self, row: &User) -> Result<RowKey, EncodeError> {
        RowKey::of(&row.identity)
    }
}

pub fn identity(n: u8) -> Identity {
    let mut bytes = [0u8; 32];
    bytes[31] = 0xc2;
    bytes[0] = n;
    Identity::from_le_bytes(bytes)
}

pub fn row_list(users: &[User]) -> BsatnRowList {
    let mut w = BsatnWriter::new();
    let mut offsets = vec![];
    for user in users {
        offsets.push(w.len() as u64);
        user.ser(&mut w).unwrap();
    }
    BsatnRowList::new(RowSizeHint::RowOffsets(offsets), w.into_vec())
}
