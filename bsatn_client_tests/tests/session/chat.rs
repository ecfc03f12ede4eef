use super::helpers::{
    loopback::{loopback, FakeServer},
    next_event,
    user::{identity, User, UserBinding},
};
use anyhow::{anyhow, Result};
use bsatn_client::messages::{CallReducerFlags, ClientMessage};
use bsatn_client::{ConnectionEvent, ConnectionOptions, DbConnection, RowKey, TableRegistry};
use bsatn_types::Deser;
use std::sync::Arc;

async fn user_name(conn: &DbConnection, n: u8) -> Result<Option<String>> {
    let tables = conn.tables().await;
    let users = tables
        .get::<UserBinding>("user")
        .ok_or_else(|| anyhow!("user table is not registered"))?;
    Ok(users.find(&identity(n)).and_then(|u| u.name.clone()))
}

pub async fn test_chat_session() -> Result<()> {
    let opts = ConnectionOptions::new("quickstart-chat").with_host("ws://localhost:3000");
    let registry = TableRegistry::new().with_table(UserBinding);
    let (transport, from_client) = loopback();
    let (conn, inbound, outbound, mut events) = DbConnection::new(opts, registry, transport)?;

    let inbound_task = tokio::spawn(inbound.run());
    let outbound_task = tokio::spawn(outbound.run());

    let bob = User {
        identity: identity(2),
        name: Some(String::from("bob")),
        online: false,
    };
    let server = FakeServer::new(Arc::clone(&conn), from_client, vec![bob.clone()]);
    let server_task = tokio::spawn(server.run());

    /* Connect. */
    match next_event(&mut events).await? {
        ConnectionEvent::Connected { identity: id, .. } => assert_eq!(id, identity(0xaa)),
        other => return Err(anyhow!("unexpected {:?}", other)),
    }
    assert!(conn.is_connected().await);
    assert!(conn.token().await.is_some());

    /* Subscribe. */
    let sub_id = conn.subscribe(["SELECT * FROM user"]).await?;
    match next_event(&mut events).await? {
        ConnectionEvent::SubscriptionApplied {
            request_id,
            outcome,
            ..
        } => {
            assert_eq!(request_id, sub_id);
            assert!(outcome.errors.is_empty());
            let delta = outcome.delta("user").ok_or_else(|| anyhow!("no user delta"))?;
            assert_eq!(delta.inserted, vec![RowKey::of(&bob.identity)?]);
        }
        other => return Err(anyhow!("unexpected {:?}", other)),
    }
    {
        let tables = conn.tables().await;
        let users = tables.get::<UserBinding>("user").unwrap();
        assert_eq!(users.find(&identity(2)), Some(&bob));
        assert_eq!(users.len(), 1);
    }

    /* First name: a plain insert. */
    let call_id = conn.call_reducer_with("set_name", "ann").await?;
    match next_event(&mut events).await? {
        ConnectionEvent::TransactionCommitted {
            reducer_call,
            caller_identity,
            outcome,
            ..
        } => {
            assert_eq!(reducer_call.request_id, call_id);
            assert_eq!(String::deser_solo(&reducer_call.args)?, "ann");
            assert_eq!(caller_identity, identity(0xaa));
            assert_eq!(outcome.delta("user").map(|d| d.inserted.len()), Some(1));
        }
        other => return Err(anyhow!("unexpected {:?}", other)),
    }
    assert_eq!(user_name(&conn, 0xaa).await?.as_deref(), Some("ann"));

    /* Rename: a re-insert of the same key. */
    conn.call_reducer_with("set_name", "anne").await?;
    match next_event(&mut events).await? {
        ConnectionEvent::TransactionCommitted { outcome, .. } => {
            let delta = outcome.delta("user").ok_or_else(|| anyhow!("no user delta"))?;
            assert_eq!(delta.updated, vec![RowKey::of(&identity(0xaa))?]);
            assert!(delta.deleted.is_empty());
            assert!(delta.inserted.is_empty());
        }
        other => return Err(anyhow!("unexpected {:?}", other)),
    }
    assert_eq!(user_name(&conn, 0xaa).await?.as_deref(), Some("anne"));
    assert_eq!(conn.tables().await.handle("user").map(|t| t.len()), Some(2));

    /* Failures leave the cache alone. */
    conn.call_reducer_with("set_name", "").await?;
    match next_event(&mut events).await? {
        ConnectionEvent::TransactionFailed { message, .. } => {
            assert_eq!(message, "Names must not be empty")
        }
        other => return Err(anyhow!("unexpected {:?}", other)),
    }
    conn.call_reducer("send_message", vec![], CallReducerFlags::NO_SUCCESS_NOTIFY)
        .await?;
    match next_event(&mut events).await? {
        ConnectionEvent::TransactionFailed { reducer_call, .. } => {
            assert_eq!(reducer_call.reducer_name, "send_message")
        }
        other => return Err(anyhow!("unexpected {:?}", other)),
    }
    assert_eq!(user_name(&conn, 0xaa).await?.as_deref(), Some("anne"));

    /* Shut down. */
    conn.terminate().await;
    inbound_task.await??;
    outbound_task.await??;

    let seen = server_task.await??;
    assert_eq!(seen.len(), 5);
    assert!(matches!(seen[0], ClientMessage::Subscribe(_)));
    assert!(seen[1..]
        .iter()
        .all(|msg| matches!(msg, ClientMessage::CallReducer(_))));

    Ok(())
}
