use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, SecondsFormat, Utc};
use hl_core::config::SettingReport;
use hl_core::RewrittenItem;
use hl_sources::{Briefing, StatusReport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use crate::AppState;

/// Body of every `/api/news` answer. The HTTP status is always 200;
/// `success` carries the outcome and `news` is never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsEnvelope {
    pub success: bool,
    pub news: Vec<RewrittenItem>,
    pub timestamp: String,
    pub from_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NewsEnvelope {
    fn from_briefing(briefing: Briefing, now: DateTime<Utc>) -> Self {
        Self {
            success: true,
            news: briefing.items,
            timestamp: iso_timestamp(now),
            from_cache: briefing.from_cache,
            message: briefing.message,
            error: None,
        }
    }

    fn failure(news: Vec<RewrittenItem>, error: String, now: DateTime<Utc>) -> Self {
        Self {
            success: false,
            news,
            timestamp: iso_timestamp(now),
            from_cache: true,
            message: None,
            error: Some(error),
        }
    }
}

fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One request cycle, folded into the wire envelope.
pub async fn build_envelope(state: &AppState) -> NewsEnvelope {
    match state.manager.headlines().await {
        Ok(briefing) => {
            info!(
                outcome = ?briefing.outcome,
                items = briefing.items.len(),
                from_cache = briefing.from_cache,
                "served headlines"
            );
            NewsEnvelope::from_briefing(briefing, state.manager.now())
        }
        Err(e) => {
            error!(error = %e, "could not build a fresh headline list");
            let news = state.manager.last_good().await;
            NewsEnvelope::failure(news, e.to_string(), state.manager.now())
        }
    }
}

pub async fn get_news(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(build_envelope(&state).await)
}

pub async fn preflight() -> impl IntoResponse {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: StatusReport,
    pub settings: Vec<SettingReport>,
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatusBody {
        status: state.manager.status().await,
        settings: state.settings.clone(),
    })
}
