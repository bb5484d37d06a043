//! Quest route handlers (require a logged-in user).

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use ecoquest_core::{QuestId, QuestStatus};

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireUser;
use crate::models::Quest;
use crate::services::{QuestService, QuestUpdate};
use crate::state::AppState;

/// The quest board for one user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestBoard {
    pub quests: Vec<Quest>,
    pub active: Vec<Quest>,
    pub completed: Vec<Quest>,
    pub available: Vec<Quest>,
    pub coins: u32,
}

/// Progress request body.
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub amount: u32,
}

/// The user's quests and coin balance.
///
/// Viewing the board applies the daily reset for the local date, as a
/// returning visitor would see.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<QuestBoard>> {
    let coins = user.coins;
    let today = Local::now().date_naive();
    let all = state
        .blocking(move |state| {
            let quests = QuestService::new(state.store(), user.id);
            quests.reset_daily(today)?;
            Ok(quests.quests())
        })
        .await?;
    let by_status = |status: QuestStatus| -> Vec<Quest> {
        all.iter().filter(|q| q.status == status).cloned().collect()
    };
    let active = by_status(QuestStatus::Active);
    let completed = by_status(QuestStatus::Completed);
    let available = by_status(QuestStatus::Available);

    Ok(Json(QuestBoard {
        quests: all,
        active,
        completed,
        available,
        coins,
    }))
}

/// Start a quest.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn start(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<Quest>> {
    let quest = state
        .blocking(move |state| {
            Ok(QuestService::new(state.store(), user.id).start(&QuestId::new(id))?)
        })
        .await?;
    Ok(Json(quest))
}

/// Record progress on an active quest.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn progress(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<QuestUpdate>> {
    let update = state
        .blocking(move |state| {
            Ok(QuestService::new(state.store(), user.id)
                .record_progress(&QuestId::new(id), request.amount)?)
        })
        .await?;
    if update.coins_awarded > 0 {
        add_breadcrumb("quest", "Quest completed", Some(&[("quest_id", update.quest.id.as_str())]));
    }
    Ok(Json(update))
}

/// Complete an active quest.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn complete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<QuestUpdate>> {
    let update = state
        .blocking(move |state| {
            Ok(QuestService::new(state.store(), user.id).complete(&QuestId::new(id))?)
        })
        .await?;
    add_breadcrumb("quest", "Quest completed", Some(&[("quest_id", update.quest.id.as_str())]));
    Ok(Json(update))
}

/// Reset daily quests for today's local date.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn reset_daily(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Value>> {
    let today = Local::now().date_naive();
    let reset = state
        .blocking(move |state| {
            Ok(QuestService::new(state.store(), user.id).reset_daily(today)?)
        })
        .await?;
    Ok(Json(json!({ "reset": reset })))
}
