use super::user::{identity, row_list, User};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bsatn_client::messages::*;
use bsatn_client::{DbConnection, Transport};
use bsatn_types::domain::{ConnectionId, Identity, TimeDuration, Timestamp};
use bsatn_types::Deser;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Hands every client frame to a [`FakeServer`].
pub struct LoopbackTransport {
    to_server: mpsc::UnboundedSender<Bytes>,
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn send(&self, frame: Bytes) -> Result<()> {
        self.to_server
            .send(frame)
            .map_err(|_| anyhow!("server is gone"))
    }
}

pub fn loopback() -> (Arc<LoopbackTransport>, mpsc::UnboundedReceiver<Bytes>) {
    let (to_server, from_client) = mpsc::unbounded_channel();
    (Arc::new(LoopbackTransport { to_server }), from_client)
}

/// A tiny stand-in for the chat module: one `user` table and a `set_name` reducer.
///
/// Runs until the client's outbound job drops the transport, and returns every
/// client message it received.
pub struct FakeServer {
    conn: Arc<DbConnection>,
    from_client: mpsc::UnboundedReceiver<Bytes>,
    client_identity: Identity,
    users: BTreeMap<Identity, User>,
    clock: i64,
}

impl FakeServer {
    pub fn new(
        conn: Arc<DbConnection>,
        from_client: mpsc::UnboundedReceiver<Bytes>,
        users: Vec<User>,
    ) -> Self {
        Self {
            conn,
            from_client,
            client_identity: identity(0xaa),
            users: users.into_iter().map(|u| (u.identity, u)).collect(),
            clock: 1_748_846_375_000_000,
        }
    }

    pub async fn run(mut self) -> Result<Vec<ClientMessage>> {
        let hello = ServerMessage::IdentityToken(IdentityToken {
            identity: self.client_identity,
            token: String::from("eyJ0eXAiOiJKV1QiLCJhbGciOiJFUzI1NiJ9.e30.sig"),
            connection_id: ConnectionId::from(0x5eedu128),
        });
        self.reply(&hello).await?;

        let mut seen = vec![];
        while let Some(frame) = self.from_client.recv().await {
            let msg = decode_client_frame(&frame)?;
            self.handle(&msg).await?;
            seen.push(msg);
        }
        Ok(seen)
    }

    async fn handle(&mut self, msg: &ClientMessage) -> Result<()> {
        let reply = match msg {
            ClientMessage::Subscribe(sub) => {
                let users = self.users.values().cloned().collect::<Vec<_>>();
                ServerMessage::InitialSubscription(InitialSubscription {
                    database_update: user_update(&users, &[]),
                    request_id: sub.request_id,
                    total_host_execution_duration: TimeDuration::from_micros(40),
                })
            }
            ClientMessage::CallReducer(call) => {
                let status = match call.reducer.as_str() {
                    "set_name" => self.set_name(&call.args)?,
                    other => UpdateStatus::Failed(format!("no such reducer: {}", other)),
                };
                self.clock += 1_000;
                ServerMessage::TransactionUpdate(TransactionUpdate {
                    status,
                    timestamp: Timestamp::from_micros_since_unix_epoch(self.clock),
                    caller_identity: self.client_identity,
                    caller_connection_id: ConnectionId::from(0x5eedu128),
                    reducer_call: ReducerCallInfo {
                        reducer_name: call.reducer.clone(),
                        reducer_id: 3,
                        args: call.args.clone(),
                        request_id: call.request_id,
                    },
                    energy_quanta_used: EnergyQuanta::from(2_339_000u128),
                    total_host_execution_duration: TimeDuration::from_micros(127),
                })
            }
        };
        self.reply(&reply).await
    }

    fn set_name(&mut self, args: &[u8]) -> Result<UpdateStatus> {
        let name = String::deser_solo(args)?;
        if name.is_empty() {
            return Ok(UpdateStatus::Failed(String::from("Names must not be empty")));
        }

        let new = User {
            identity: self.client_identity,
            name: Some(name),
            online: true,
        };
        self.users.insert(new.identity, new.clone());

        // The row is replaced in place, so only the new version is sent.
        Ok(UpdateStatus::Committed(user_update(&[new], &[])))
    }

    async fn reply(&self, msg: &ServerMessage) -> Result<()> {
        let frame = encode_server_frame(msg)?;
        self.conn.deliver_frame(frame).await?;
        Ok(())
    }
}

pub fn user_update(inserts: &[User], deletes: &[User]) -> DatabaseUpdate {
    DatabaseUpdate {
        tables: vec![TableUpdate {
            table_id: 4096,
            table_name: String::from("user"),
            num_rows: (inserts.len() + deletes.len()) as u64,
            updates: vec![CompressableQueryUpdate::Uncompressed(QueryUpdate {
                deletes: row_list(deletes),
                inserts: row_list(inserts),
            })],
        }],
    }
}
