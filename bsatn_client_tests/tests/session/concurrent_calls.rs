use super::helpers::{
    loopback::{loopback, FakeServer},
    next_event,
    user::{identity, UserBinding},
};
use anyhow::{anyhow, Result};
use bsatn_client::messages::ClientMessage;
use bsatn_client::{ConnectionEvent, ConnectionOptions, DbConnection, TableRegistry};
use bsatn_types::Deser;
use rand::prelude::*;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Many callers share one connection. Every frame must reach the server whole,
/// every caller gets a distinct request id, and the cache ends at the server's
/// last write.
pub async fn test_concurrent_calls() -> Result<()> {
    let callers_ct = 20u32;

    let registry = TableRegistry::new().with_table(UserBinding);
    let (transport, from_client) = loopback();
    let (conn, inbound, outbound, mut events) =
        DbConnection::new(ConnectionOptions::new("quickstart-chat"), registry, transport)?;
    let inbound_task = tokio::spawn(inbound.run());
    let outbound_task = tokio::spawn(outbound.run());
    let server_task = tokio::spawn(FakeServer::new(Arc::clone(&conn), from_client, vec![]).run());

    match next_event(&mut events).await? {
        ConnectionEvent::Connected { .. } => {}
        other => return Err(anyhow!("unexpected {:?}", other)),
    }

    let mut names = (0..callers_ct)
        .map(|i| format!("caller-{:02}-{}", i, "x".repeat(i as usize * 7)))
        .collect::<Vec<_>>();
    names.shuffle(&mut thread_rng());

    let mut tasks = vec![];
    for name in names.clone() {
        let conn = Arc::clone(&conn);
        let task: JoinHandle<Result<u32>> =
            tokio::spawn(async move { Ok(conn.call_reducer_with("set_name", &name).await?) });
        tasks.push(task);
    }

    let mut request_ids = vec![];
    for task in tasks {
        request_ids.push(task.await??);
    }
    request_ids.sort_unstable();
    assert_eq!(request_ids, (0..callers_ct).collect::<Vec<_>>());

    for _ in 0..callers_ct {
        match next_event(&mut events).await? {
            ConnectionEvent::TransactionCommitted { .. } => {}
            other => return Err(anyhow!("unexpected {:?}", other)),
        }
    }

    conn.terminate().await;
    inbound_task.await??;
    outbound_task.await??;
    let seen = server_task.await??;

    let mut seen_names = vec![];
    for msg in &seen {
        match msg {
            ClientMessage::CallReducer(call) => seen_names.push(String::deser_solo(&call.args)?),
            other => return Err(anyhow!("unexpected {:?}", other)),
        }
    }
    let last_name = seen_names.last().cloned();
    seen_names.sort();
    let mut expected = names;
    expected.sort();
    assert_eq!(seen_names, expected);

    let tables = conn.tables().await;
    let users = tables.get::<UserBinding>("user").unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(
        users.find(&identity(0xaa)).and_then(|u| u.name.clone()),
        last_name
    );

    Ok(())
}
