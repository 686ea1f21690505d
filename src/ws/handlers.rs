//! WebSocket message dispatch
//!
//! Each inbound message is routed to its lobby and handled while holding that
//! lobby's lock, so the read, mutate and broadcast steps of one event never
//! interleave with another event for the same lobby.

use crate::error::LobbyError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{LobbyId, Outbox, ParticipantId};
use std::sync::Arc;

/// Lobby membership a connection acquired through `join`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub lobby: LobbyId,
    pub participant_id: ParticipantId,
}

/// Per-connection state owned by the socket task
#[derive(Debug)]
pub struct Connection {
    pub outbox: Outbox,
    pub membership: Option<Membership>,
}

impl Connection {
    pub fn new(outbox: Outbox) -> Self {
        Self {
            outbox,
            membership: None,
        }
    }

    /// Whether this connection joined `lobby` as `participant_id`
    pub fn acts_as(&self, lobby: &str, participant_id: &str) -> bool {
        self.membership
            .as_ref()
            .is_some_and(|m| m.lobby == lobby && m.participant_id == participant_id)
    }
}

/// Turn a lobby operation result into the direct reply for the sender.
/// Only user-correctable errors are reported; the rest are dropped quietly.
fn reply(result: Result<(), LobbyError>) -> Option<ServerMessage> {
    match result {
        Ok(()) => None,
        Err(e) if e.is_reported() => Some(e.to_message()),
        Err(e) => {
            tracing::debug!(code = e.code(), "Ignoring message: {}", e);
            None
        }
    }
}

/// Handle client messages and return optional response
pub async fn handle_message(
    msg: ClientMessage,
    conn: &mut Connection,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    if msg.lobby().trim().is_empty() {
        return Some(LobbyError::Malformed("lobby must not be empty".to_string()).to_message());
    }

    // Participant-scoped events only count for the connection's own membership
    if let Some(participant_id) = msg.participant_id() {
        if !conn.acts_as(msg.lobby(), participant_id) {
            tracing::debug!(
                "Ignoring message for {} in lobby {}: not this connection's participant",
                participant_id,
                msg.lobby()
            );
            return None;
        }
    }

    match msg {
        ClientMessage::Join { lobby, name } => handle_join(state, conn, lobby, name).await,

        ClientMessage::SubmitQuestions {
            lobby,
            participant_id,
            questions,
        } => {
            let lobby = find_lobby(state, &lobby).await?;
            let mut lobby = lobby.lock().await;
            reply(lobby.submit_questions(&participant_id, questions))
        }

        ClientMessage::RecordAnswer {
            lobby,
            participant_id,
            question_id,
            answer,
        } => {
            let lobby = find_lobby(state, &lobby).await?;
            let mut lobby = lobby.lock().await;
            reply(lobby.record_answer(&participant_id, &question_id, answer))
        }

        ClientMessage::SetReady {
            lobby,
            participant_id,
            ready,
        } => {
            let lobby = find_lobby(state, &lobby).await?;
            let mut lobby = lobby.lock().await;
            reply(lobby.set_ready(&participant_id, ready))
        }

        ClientMessage::RequestAdvance {
            lobby,
            participant_id,
        } => {
            let lobby = find_lobby(state, &lobby).await?;
            let mut lobby = lobby.lock().await;
            reply(lobby.request_advance(&participant_id))
        }

        ClientMessage::RequestCurrentState { lobby } => {
            let lobby = find_lobby(state, &lobby).await?;
            let lobby = lobby.lock().await;
            Some(lobby.current_state())
        }
    }
}

async fn handle_join(
    state: &Arc<AppState>,
    conn: &mut Connection,
    lobby_id: LobbyId,
    name: String,
) -> Option<ServerMessage> {
    // A connection belongs to at most one lobby at a time
    if conn.membership.is_some() {
        handle_disconnect(conn, state).await;
    }

    let lobby = state.get_or_create_lobby(&lobby_id).await;
    let mut lobby = lobby.lock().await;

    match lobby.join(&name, conn.outbox.clone()) {
        Ok(participant) => {
            conn.membership = Some(Membership {
                lobby: lobby_id,
                participant_id: participant.id.clone(),
            });
            Some(ServerMessage::NameConfirmed {
                participant_id: participant.id,
                is_admin: participant.is_admin,
                name: participant.name,
            })
        }
        Err(e) => {
            tracing::info!("Join to lobby {} rejected: {}", lobby_id, e);
            Some(e.to_message())
        }
    }
}

/// Remove the connection's participant (if any) from its lobby
pub async fn handle_disconnect(conn: &mut Connection, state: &Arc<AppState>) {
    let Some(membership) = conn.membership.take() else {
        return;
    };
    if let Some(lobby) = state.get_lobby(&membership.lobby).await {
        lobby.lock().await.leave(&membership.participant_id);
    }
}

async fn find_lobby(state: &Arc<AppState>, lobby_id: &str) -> Option<crate::state::SharedLobby> {
    let lobby = state.get_lobby(lobby_id).await;
    if lobby.is_none() {
        tracing::debug!("Ignoring message for unknown lobby {}", lobby_id);
    }
    lobby
}
