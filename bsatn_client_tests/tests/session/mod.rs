mod captured_frames;
mod chat;
mod concurrent_calls;
pub mod helpers;

pub use captured_frames::test_captured_frames;
pub use chat::test_chat_session;
pub use concurrent_calls::test_concurrent_calls;
