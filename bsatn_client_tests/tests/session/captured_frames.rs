use super::helpers::{loopback::loopback, next_event};
use anyhow::{anyhow, Result};
use bsatn_client::{ConnectionEvent, ConnectionOptions, DbConnection, TableRegistry};
use bsatn_types::domain::Identity;
use bsatn_types::Deser;

// Frames captured from a live server running the quickstart chat module.
const IDENTITY_TOKEN_FRAME: &str = concat!(
    "00030cf431a3f5d27800aaec59ec8ec09883b2f9a9a9b41480056a0487210af600c28201000065794a306558",
    "41694f694a4b563151694c434a68624763694f694a46557a49314e694a392e65794a6f5a5868666157526c62",
    "6e527064486b694f694a6a4d6a41775a6a5977595449784f4463774e445a684d4455344d444530596a52684f",
    "5745355a6a6c694d6a677a4f54686a4d44686c5a574d314f57566a595745774d4463345a444a6d4e57457a4d",
    "7a466d4e44426a4969776963335669496a6f694d6d56684d5449305a4441745a444935597930305a4759774c",
    "546b774f4451745a4745324d6a4e6a4e3259304e5756694969776961584e7a496a6f696247396a5957786f62",
    "334e30496977695958566b496a7062496e4e7759574e6c64476c745a575269496c3073496d6c68644349364d",
    "5463304f44417a4e4441324f4377695a586877496a70756457787366512e5a4a4b6e734f633854736e547033",
    "584a576473535a64755379315876366f2d55585f494672334a4f7a6e7072723970424f68497549426e6b4c5a",
    "5f6c6f34777351306863523667624476446672444857686a63664167daa835213b727f77283d0ff5d51884c1",
);

const TRANSACTION_UPDATE_FRAME: &str = concat!(
    "000100000000003a9cf906913606005cff1d57959caf63f884313a96bed024c07d0f8e6c713b946e8ca6ebe5",
    "6300c2efb64501efd2c807106ff13e25b33a19080000007365745f6e616d65030000001c0000001800000053",
    "65746e616d652063616c6c65642077697468207468697300000000b8b023000000000000000000000000007f",
    "00000000000000",
);

fn unhex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

/// The recorded frames pass through the whole inbound path, with no tables registered.
pub async fn test_captured_frames() -> Result<()> {
    let (transport, _from_client) = loopback();
    let (conn, inbound, outbound, mut events) =
        DbConnection::new(ConnectionOptions::new("quickstart-chat"), TableRegistry::new(), transport)?;
    let inbound_task = tokio::spawn(inbound.run());
    let outbound_task = tokio::spawn(outbound.run());

    conn.deliver_frame(unhex(IDENTITY_TOKEN_FRAME)).await?;
    match next_event(&mut events).await? {
        ConnectionEvent::Connected {
            identity,
            token,
            connection_id,
        } => {
            assert_eq!(
                identity,
                Identity::from_hex("c200f60a2187046a058014b4a9a9f9b28398c08eec59ecaa0078d2f5a331f40c")?
            );
            assert!(token.starts_with("eyJ0eXAiOiJKV1Qi"));
            assert_eq!(connection_id.to_hex(), "c18418d5f50f3d28777f723b2135a8da");
        }
        other => return Err(anyhow!("unexpected {:?}", other)),
    }
    assert_eq!(conn.token().await.map(|t| t.len()), Some(386));

    conn.deliver_frame(unhex(TRANSACTION_UPDATE_FRAME)).await?;
    match next_event(&mut events).await? {
        ConnectionEvent::TransactionCommitted {
            reducer_call,
            outcome,
            timestamp,
            ..
        } => {
            assert_eq!(reducer_call.reducer_name, "set_name");
            assert_eq!(
                String::deser_solo(&reducer_call.args)?,
                "Setname called with this"
            );
            assert_eq!(timestamp.micros_since_unix_epoch(), 1_748_846_375_443_514);
            assert!(outcome.deltas.is_empty());
            assert!(outcome.errors.is_empty());
        }
        other => return Err(anyhow!("unexpected {:?}", other)),
    }

    conn.terminate().await;
    inbound_task.await??;
    outbound_task.await??;

    Ok(())
}
