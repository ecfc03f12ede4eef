use anyhow::Result;

mod session;
use session::{test_captured_frames, test_chat_session, test_concurrent_calls};

#[tokio::test()]
async fn integration_test_chat_session() -> Result<()> {
    test_chat_session().await?;

    test_captured_frames().await?;

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn integration_test_concurrent_calls() -> Result<()> {
    test_concurrent_calls().await?;

    Ok(())
}
