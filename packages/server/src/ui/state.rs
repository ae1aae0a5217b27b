//! Shared application state.

use std::sync::Arc;

use crate::{
    config::UiConfig,
    domain::{HistoryLimit, MessageStore},
    infrastructure::{
        broadcast::{BroadcastPublisher, ConnectionRegistry},
        storage::UploadStorage,
    },
    usecase::{
        FetchHistoryUseCase, RunSessionUseCase, SendMessageUseCase, SessionSettings,
        UploadFileUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// MessageStore（データアクセス層の抽象化）
    pub store: Arc<dyn MessageStore>,
    /// Live connections (shared with the broadcast router)
    pub registry: Arc<ConnectionRegistry>,
    /// Intake of the broadcast router
    pub publisher: BroadcastPublisher,
    pub uploads: UploadStorage,
    pub max_history: HistoryLimit,
    pub session: SessionSettings,
    pub ui: UiConfig,
}

impl AppState {
    pub fn run_session_usecase(&self) -> RunSessionUseCase {
        RunSessionUseCase::new(
            self.store.clone(),
            self.registry.clone(),
            self.publisher.clone(),
            self.max_history,
            self.session,
        )
    }

    pub fn send_message_usecase(&self) -> SendMessageUseCase {
        SendMessageUseCase::new(self.store.clone(), self.publisher.clone())
    }

    pub fn fetch_history_usecase(&self) -> FetchHistoryUseCase {
        FetchHistoryUseCase::new(self.store.clone(), self.max_history)
    }

    pub fn upload_file_usecase(&self) -> UploadFileUseCase {
        UploadFileUseCase::new(self.uploads.clone(), self.send_message_usecase())
    }
}
