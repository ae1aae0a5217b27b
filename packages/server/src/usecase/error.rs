//! UseCase 層のエラー定義

use thiserror::Error;

use crate::infrastructure::broadcast::PublishError;

/// メッセージ送信のエラー
///
/// 永続化の失敗はエラーにならない（ログに残して配信を続ける）。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    #[error(transparent)]
    RouterStopped(#[from] PublishError),
}

/// ファイルアップロードのエラー
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to store uploaded file: {0}")]
    Storage(#[from] std::io::Error),

    #[error(transparent)]
    Send(#[from] SendMessageError),
}
