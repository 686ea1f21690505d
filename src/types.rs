use crate::protocol::ServerMessage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::mpsc;

/// Opaque ID types for type safety
pub type LobbyId = String;
pub type ParticipantId = String;
/// Questions are identified by their authoring timestamp (`createdAt`)
pub type QuestionId = String;

/// Sending half of a connection's outbound queue
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// Where a lobby is in its question progression
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LobbyPhase {
    NotStarted,
    InProgress {
        #[serde(rename = "activeIndex")]
        active_index: usize,
    },
    Ended,
}

/// One selectable answer of a question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOption {
    pub index: u32,
    pub answer: String,
}

/// Points a single participant was awarded for one question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionResult {
    pub name: String,
    pub points: u32,
}

/// A question as authored by the admin.
///
/// The same shape is accepted from `submitQuestions`; `isActive` and
/// `results` are owned by the server and reset on submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub answers: Vec<AnswerOption>,
    pub correct: AnswerOption,
    pub created_at: QuestionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    /// Filled in once every connected participant has answered; never rewritten
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<BTreeMap<ParticipantId, QuestionResult>>,
}

impl Question {
    pub fn id(&self) -> &str {
        &self.created_at
    }

    pub fn is_resolved(&self) -> bool {
        self.results.is_some()
    }
}

/// A connected member of a lobby
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub is_admin: bool,
    pub score: u32,
    pub ready: bool,
    pub outbox: Outbox,
}

/// Final (or running) total of a participant, derived from question results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub id: ParticipantId,
    pub name: String,
    pub score: u32,
    /// True for every participant sharing the top score
    pub is_winner: bool,
}
