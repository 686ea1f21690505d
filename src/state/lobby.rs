//! Per-lobby session state and lobby-scoped fan-out

use crate::protocol::{ParticipantInfo, QuestionView, ServerMessage};
use crate::types::*;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// One isolated game session.
///
/// Operations live in the sibling modules (`roster`, `question`, `answer`,
/// `score`); this file holds the data, read accessors and broadcasting.
#[derive(Debug)]
pub struct Lobby {
    pub(super) id: LobbyId,
    /// Connected participants in join order
    pub(super) participants: Vec<Participant>,
    /// Question set in authoring order
    pub(super) questions: Vec<Question>,
    /// Answer ledger keyed by (participant, question)
    pub(super) answers: HashMap<(ParticipantId, QuestionId), String>,
    /// Set once the last question is advanced past; cleared only by a new question set
    pub(super) game_ended: bool,
    pub(super) question_timeout: Option<Duration>,
    pub(super) deadline: Option<DateTime<Utc>>,
}

impl Lobby {
    pub fn new(id: LobbyId, question_timeout: Option<Duration>) -> Self {
        Self {
            id,
            participants: Vec::new(),
            questions: Vec::new(),
            answers: HashMap::new(),
            game_ended: false,
            question_timeout,
            deadline: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, participant_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    pub(super) fn participant_mut(&mut self, participant_id: &str) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == participant_id)
    }

    pub fn admin(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_admin)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answer_of(&self, participant_id: &str, question_id: &str) -> Option<&str> {
        self.answers
            .get(&(participant_id.to_string(), question_id.to_string()))
            .map(String::as_str)
    }

    pub fn game_ended(&self) -> bool {
        self.game_ended
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn active_index(&self) -> Option<usize> {
        self.questions.iter().position(|q| q.is_active)
    }

    pub fn active_question(&self) -> Option<&Question> {
        self.questions.iter().find(|q| q.is_active)
    }

    pub fn phase(&self) -> LobbyPhase {
        if self.game_ended {
            return LobbyPhase::Ended;
        }
        match self.active_index() {
            Some(active_index) => LobbyPhase::InProgress { active_index },
            None => LobbyPhase::NotStarted,
        }
    }

    pub fn participant_infos(&self) -> Vec<ParticipantInfo> {
        self.participants.iter().map(ParticipantInfo::from).collect()
    }

    pub fn question_views(&self) -> Vec<QuestionView> {
        self.questions.iter().map(QuestionView::from).collect()
    }

    /// Full resync payload for a single connection
    pub fn current_state(&self) -> ServerMessage {
        ServerMessage::GameState {
            questions: self.question_views(),
            current_question: self.active_index(),
            participants: self.participant_infos(),
            phase: self.phase(),
            standings: self.game_ended.then(|| self.standings()),
        }
    }

    /// Send a message to every connection joined to this lobby.
    /// Closed connections are skipped; their cleanup happens on disconnect.
    pub(super) fn broadcast(&self, msg: ServerMessage) {
        for participant in &self.participants {
            if participant.outbox.send(msg.clone()).is_err() {
                tracing::debug!(
                    "Dropping message for closed connection of {} in lobby {}",
                    participant.id,
                    self.id
                );
            }
        }
    }

    pub(super) fn broadcast_participants(&self) {
        self.broadcast(ServerMessage::Participants {
            participants: self.participant_infos(),
        });
    }

    pub(super) fn broadcast_questions(&self) {
        tracing::info!(
            "Broadcasting {} questions to lobby {} (active: {:?})",
            self.questions.len(),
            self.id,
            self.active_index()
        );
        self.broadcast(ServerMessage::Questions {
            questions: self.question_views(),
            deadline: self.deadline.map(|d| d.to_rfc3339()),
        });
    }
}
