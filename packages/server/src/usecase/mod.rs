//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層と Infrastructure 層を操作します。

pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod fetch_history;
pub mod send_message;
pub mod session;
pub mod upload_file;

pub use connect_participant::{ConnectParticipantUseCase, ConnectedParticipant};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{SendMessageError, UploadError};
pub use fetch_history::FetchHistoryUseCase;
pub use send_message::{SendMessageUseCase, SendOutcome};
pub use session::{RunSessionUseCase, SessionSettings};
pub use upload_file::UploadFileUseCase;
