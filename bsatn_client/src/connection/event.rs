use crate::error::ClientError;
use crate::messages::ReducerCallInfo;
use crate::table::ApplyOutcome;
use bsatn_types::domain::{ConnectionId, Identity, TimeDuration, Timestamp};

/// Delivered to the application, in frame order.
#[derive(Debug)]
pub enum ConnectionEvent {
    Connected {
        identity: Identity,
        token: String,
        connection_id: ConnectionId,
    },

    SubscriptionApplied {
        request_id: u32,
        outcome: ApplyOutcome,
        host_execution_duration: TimeDuration,
    },

    TransactionCommitted {
        reducer_call: ReducerCallInfo,
        caller_identity: Identity,
        caller_connection_id: ConnectionId,
        timestamp: Timestamp,
        outcome: ApplyOutcome,
    },

    TransactionFailed {
        reducer_call: ReducerCallInfo,
        caller_identity: Identity,
        message: String,
    },

    OutOfEnergy {
        reducer_call: ReducerCallInfo,
        caller_identity: Identity,
    },

    /// The frame could not be decoded or applied. No table was changed by it.
    FrameRejected { error: ClientError },
}
