//! HTTP side endpoints and the application router.
//!
//! `POST /api/end-game` is an operator escape hatch: it forces game over in a
//! lobby without any admin check.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::protocol::{ParticipantInfo, QuestionView};
use crate::state::AppState;
use crate::types::{LobbyId, LobbyPhase, Standing};
use crate::ws;

/// Build the full application: WebSocket gateway plus HTTP endpoints
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/health", get(health))
        .route("/api/end-game", post(end_game))
        .route("/api/lobbies", get(list_lobbies))
        .route("/api/lobbies/{lobby}", get(get_lobby))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndGameRequest {
    pub lobby: LobbyId,
}

/// Force game over in a lobby. Responds 409 when no game is running.
///
/// POST /api/end-game
pub async fn end_game(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EndGameRequest>,
) -> StatusCode {
    let Some(lobby) = state.get_lobby(&req.lobby).await else {
        return StatusCode::NOT_FOUND;
    };

    let ended = lobby.lock().await.end_game();
    tracing::info!(lobby = %req.lobby, ended, "End game requested over HTTP");
    if ended {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::CONFLICT
    }
}

/// Read-only view of a lobby for operators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbySnapshot {
    pub id: LobbyId,
    pub phase: LobbyPhase,
    pub participants: Vec<ParticipantInfo>,
    pub questions: Vec<QuestionView>,
    pub standings: Vec<Standing>,
    pub deadline: Option<String>,
}

/// GET /api/lobbies
pub async fn list_lobbies(State(state): State<Arc<AppState>>) -> Json<Vec<LobbyId>> {
    Json(state.lobby_ids().await)
}

/// GET /api/lobbies/{lobby}
pub async fn get_lobby(
    State(state): State<Arc<AppState>>,
    Path(lobby_id): Path<LobbyId>,
) -> Response {
    let Some(lobby) = state.get_lobby(&lobby_id).await else {
        return (StatusCode::NOT_FOUND, "Lobby not found").into_response();
    };

    let lobby = lobby.lock().await;
    Json(LobbySnapshot {
        id: lobby.id().to_string(),
        phase: lobby.phase(),
        participants: lobby.participant_infos(),
        questions: lobby.question_views(),
        standings: lobby.standings(),
        deadline: lobby.deadline().map(|d| d.to_rfc3339()),
    })
    .into_response()
}
