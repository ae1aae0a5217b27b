//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};

use crate::{
    infrastructure::dto::{ChatMessageDto, ErrorDto, HealthDto, HistoryQuery},
    ui::state::AppState,
};

const INDEX_TEMPLATE: &str = include_str!("../../../assets/index.html");

/// Chat page with the configured titles
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_index(&state.ui.title, &state.ui.page_title))
}

fn render_index(title: &str, page_title: &str) -> String {
    INDEX_TEMPLATE
        .replace("{{title}}", &escape_html(title))
        .replace("{{page_title}}", &escape_html(page_title))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        connections: state.registry.len().await,
        queue_depth: state.publisher.queue_depth(),
    })
}

/// Most recent messages, oldest first
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ChatMessageDto>>, (StatusCode, Json<ErrorDto>)> {
    let usecase = state.fetch_history_usecase();
    match usecase.execute(query.limit.as_deref()).await {
        Ok(history) => Ok(Json(history.iter().map(ChatMessageDto::from).collect())),
        Err(e) => {
            tracing::error!(error = %e, "failed to load history");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDto {
                    error: "failed to load history".to_string(),
                }),
            ))
        }
    }
}
