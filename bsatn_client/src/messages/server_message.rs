use super::{DatabaseUpdate, UpdateStatus};
use bsatn_types::codec::{BsatnReader, BsatnWriter};
use bsatn_types::domain::{ConnectionId, Identity, TimeDuration, Timestamp};
use bsatn_types::{
    get_tag, put_tag, DecodeError, Deser, EncodeError, Ser, UnsupportedFeature, WireTag,
};
use derive_more::{Deref, From, Into};
use num_derive::{FromPrimitive, ToPrimitive};

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    InitialSubscription(InitialSubscription),
    TransactionUpdate(TransactionUpdate),
    IdentityToken(IdentityToken),
}

#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, FromPrimitive, ToPrimitive)]
pub enum ServerMessageTag {
    InitialSubscription = 0,
    TransactionUpdate = 1,
    TransactionUpdateLight = 2,
    IdentityToken = 3,
}
impl WireTag for ServerMessageTag {
    const TYPE_NAME: &'static str = "ServerMessage";
    const VARIANT_COUNT: usize = 4;
}

/// Sent once, right after the connection is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityToken {
    pub identity: Identity,
    pub token: String,
    pub connection_id: ConnectionId,
}

/// The initial contents of every subscribed table.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialSubscription {
    pub database_update: DatabaseUpdate,
    pub request_id: u32,
    pub total_host_execution_duration: TimeDuration,
}

/// The outcome of one reducer call, with its row changes if it committed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    pub status: UpdateStatus,
    pub timestamp: Timestamp,
    pub caller_identity: Identity,
    pub caller_connection_id: ConnectionId,
    pub reducer_call: ReducerCallInfo,
    pub energy_quanta_used: EnergyQuanta,
    pub total_host_execution_duration: TimeDuration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReducerCallInfo {
    pub reducer_name: String,
    pub reducer_id: u32,
    pub args: Vec<u8>,
    pub request_id: u32,
}

#[derive(Deref, From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct EnergyQuanta(u128);

/* ServerMessage */

impl Ser for ServerMessage {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        match self {
            Self::InitialSubscription(m) => {
                put_tag(w, ServerMessageTag::InitialSubscription)?;
                m.ser(w)
            }
            Self::TransactionUpdate(m) => {
                put_tag(w, ServerMessageTag::TransactionUpdate)?;
                m.ser(w)
            }
            Self::IdentityToken(m) => {
                put_tag(w, ServerMessageTag::IdentityToken)?;
                m.ser(w)
            }
        }
    }
}
impl Deser for ServerMessage {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let msg = match get_tag(r)? {
            ServerMessageTag::InitialSubscription => {
                Self::InitialSubscription(InitialSubscription::deser(r)?)
            }
            ServerMessageTag::TransactionUpdate => {
                Self::TransactionUpdate(TransactionUpdate::deser(r)?)
            }
            ServerMessageTag::TransactionUpdateLight => {
                return Err(DecodeError::Unsupported(
                    UnsupportedFeature::TransactionUpdateLight,
                ))
            }
            ServerMessageTag::IdentityToken => Self::IdentityToken(IdentityToken::deser(r)?),
        };
        Ok(msg)
    }
}

/* IdentityToken */

impl Ser for IdentityToken {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        self.identity.ser(w)?;
        w.put_string(&self.token)?;
        self.connection_id.ser(w)
    }
}
impl Deser for IdentityToken {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let identity = Identity::deser(r)?;
        let token = r.get_string()?;
        let connection_id = ConnectionId::deser(r)?;
        Ok(Self {
            identity,
            token,
            connection_id,
        })
    }
}

/* InitialSubscription */

impl Ser for InitialSubscription {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        self.database_update.ser(w)?;
        w.put_u32(self.request_id);
        self.total_host_execution_duration.ser(w)
    }
}
impl Deser for InitialSubscription {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let database_update =
            DatabaseUpdate::deser(r).map_err(|e| e.context("InitialSubscription"))?;
        let request_id = r.get_u32()?;
        let total_host_execution_duration = TimeDuration::deser(r)?;
        Ok(Self {
            database_update,
            request_id,
            total_host_execution_duration,
        })
    }
}

/* TransactionUpdate */

impl Ser for TransactionUpdate {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        self.status.ser(w)?;
        self.timestamp.ser(w)?;
        self.caller_identity.ser(w)?;
        self.caller_connection_id.ser(w)?;
        self.reducer_call.ser(w)?;
        self.energy_quanta_used.ser(w)?;
        self.total_host_execution_duration.ser(w)
    }
}
impl Deser for TransactionUpdate {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let status = UpdateStatus::deser(r).map_err(|e| e.context("TransactionUpdate status"))?;
        let timestamp = Timestamp::deser(r)?;
        let caller_identity = Identity::deser(r)?;
        let caller_connection_id = ConnectionId::deser(r)?;
        let reducer_call = ReducerCallInfo::deser(r)?;
        let energy_quanta_used = EnergyQuanta::deser(r)?;
        let total_host_execution_duration = TimeDuration::deser(r)?;
        Ok(Self {
            status,
            timestamp,
            caller_identity,
            caller_connection_id,
            reducer_call,
            energy_quanta_used,
            total_host_execution_duration,
        })
    }
}

/* ReducerCallInfo */

impl Ser for ReducerCallInfo {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        w.put_string(&self.reducer_name)?;
        w.put_u32(self.reducer_id);
        w.put_bytes(&self.args)?;
        w.put_u32(self.request_id);
        Ok(())
    }
}
impl Deser for ReducerCallInfo {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        let reducer_name = r.get_string()?;
        let reducer_id = r.get_u32()?;
        let args = r.get_bytes()?;
        let request_id = r.get_u32()?;
        Ok(Self {
            reducer_name,
            reducer_id,
            args,
            request_id,
        })
    }
}

/* EnergyQuanta */

impl Ser for EnergyQuanta {
    fn ser(&self, w: &mut BsatnWriter) -> Result<(), EncodeError> {
        w.put_u128(self.0);
        Ok(())
    }
}
impl Deser for EnergyQuanta {
    fn deser(r: &mut BsatnReader) -> Result<Self, DecodeError> {
        Ok(Self(r.get_u128()?))
    }
}
