use bsatn_types::sats::AlgebraicType as T;

/// Algebraic type descriptions of every protocol message.
///
/// Build one with [`ProtocolSchema::new`] and share it (e.g. behind an `Arc`);
/// the graphs are immutable. Reading a frame generically with these types
/// yields the same data as the typed decoders in this module.
#[derive(Debug, Clone)]
pub struct ProtocolSchema {
    pub client_message: T,
    pub call_reducer: T,
    pub subscribe: T,

    pub server_message: T,
    pub identity_token: T,
    pub initial_subscription: T,
    pub transaction_update: T,
    pub transaction_update_light: T,
    pub reducer_call_info: T,
    pub update_status: T,

    pub database_update: T,
    pub table_update: T,
    pub compressable_query_update: T,
    pub query_update: T,
    pub bsatn_row_list: T,
    pub row_size_hint: T,
}

impl Default for ProtocolSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolSchema {
    pub fn new() -> Self {
        let row_size_hint = T::sum(
            "RowSizeHint",
            [("FixedSize", T::U16), ("RowOffsets", T::array(T::U64))],
        );
        let bsatn_row_list = T::struct_type(
            "BsatnRowList",
            [("size_hint", row_size_hint.clone()), ("rows_data", T::Bytes)],
        );
        let query_update = T::struct_type(
            "QueryUpdate",
            [
                ("deletes", bsatn_row_list.clone()),
                ("inserts", bsatn_row_list.clone()),
            ],
        );
        let compressable_query_update = T::sum(
            "CompressableQueryUpdate",
            [
                ("Uncompressed", query_update.clone()),
                ("Brotli", T::Bytes),
                ("Gzip", T::Bytes),
            ],
        );
        let table_update = T::struct_type(
            "TableUpdate",
            [
                ("table_id", T::U32),
                ("table_name", T::String),
                ("num_rows", T::U64),
                ("updates", T::array(compressable_query_update.clone())),
            ],
        );
        let database_update = T::struct_type(
            "DatabaseUpdate",
            [("tables", T::array(table_update.clone()))],
        );

        let update_status = T::sum(
            "UpdateStatus",
            [
                ("Committed", database_update.clone()),
                ("Failed", T::String),
                ("OutOfEnergy", T::Unit),
            ],
        );
        let reducer_call_info = T::struct_type(
            "ReducerCallInfo",
            [
                ("reducer_name", T::String),
                ("reducer_id", T::U32),
                ("args", T::Bytes),
                ("request_id", T::U32),
            ],
        );
        let energy_quanta = T::struct_type("EnergyQuanta", [("quanta", T::U128)]);

        let identity_token = T::struct_type(
            "IdentityToken",
            [
                ("identity", T::Identity),
                ("token", T::String),
                ("connection_id", T::ConnectionId),
            ],
        );
        let initial_subscription = T::struct_type(
            "InitialSubscription",
            [
                ("database_update", database_update.clone()),
                ("request_id", T::U32),
                ("total_host_execution_duration", T::TimeDuration),
            ],
        );
        let transaction_update = T::struct_type(
            "TransactionUpdate",
            [
                ("status", update_status.clone()),
                ("timestamp", T::Timestamp),
                ("caller_identity", T::Identity),
                ("caller_connection_id", T::ConnectionId),
                ("reducer_call", reducer_call_info.clone()),
                ("energy_quanta_used", energy_quanta),
                ("total_host_execution_duration", T::TimeDuration),
            ],
        );
        let transaction_update_light = T::struct_type(
            "TransactionUpdateLight",
            [("request_id", T::U32), ("update", database_update.clone())],
        );
        let server_message = T::sum(
            "ServerMessage",
            [
                ("InitialSubscription", initial_subscription.clone()),
                ("TransactionUpdate", transaction_update.clone()),
                ("TransactionUpdateLight", transaction_update_light.clone()),
                ("IdentityToken", identity_token.clone()),
            ],
        );

        let call_reducer = T::struct_type(
            "CallReducer",
            [
                ("reducer", T::String),
                ("args", T::Bytes),
                ("request_id", T::U32),
                ("flags", T::U8),
            ],
        );
        let subscribe = T::struct_type(
            "Subscribe",
            [("query_strings", T::array(T::String)), ("request_id", T::U32)],
        );
        let client_message = T::sum(
            "ClientMessage",
            [
                ("CallReducer", call_reducer.clone()),
                ("Subscribe", subscribe.clone()),
            ],
        );

        Self {
            client_message,
            call_reducer,
            subscribe,
            server_message,
            identity_token,
            initial_subscription,
            transaction_update,
            transaction_update_light,
            reducer_call_info,
            update_status,
            database_update,
            table_update,
            compressable_query_update,
            query_update,
            bsatn_row_list,
            row_size_hint,
        }
    }
}
