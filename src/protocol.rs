use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    Join {
        lobby: LobbyId,
        name: String,
    },
    /// Admin only: replaces the question set and starts (or restarts) the game
    #[serde(rename_all = "camelCase")]
    SubmitQuestions {
        lobby: LobbyId,
        participant_id: ParticipantId,
        questions: Vec<Question>,
    },
    #[serde(rename_all = "camelCase")]
    RecordAnswer {
        lobby: LobbyId,
        participant_id: ParticipantId,
        question_id: QuestionId,
        answer: String,
    },
    #[serde(rename_all = "camelCase")]
    SetReady {
        lobby: LobbyId,
        participant_id: ParticipantId,
        ready: bool,
    },
    /// Admin only: move to the next question, or end the game on the last one
    #[serde(rename_all = "camelCase")]
    RequestAdvance {
        lobby: LobbyId,
        participant_id: ParticipantId,
    },
    /// Targeted resync of questions and roster for the sending connection
    RequestCurrentState {
        lobby: LobbyId,
    },
}

impl ClientMessage {
    pub fn lobby(&self) -> &str {
        match self {
            ClientMessage::Join { lobby, .. }
            | ClientMessage::SubmitQuestions { lobby, .. }
            | ClientMessage::RecordAnswer { lobby, .. }
            | ClientMessage::SetReady { lobby, .. }
            | ClientMessage::RequestAdvance { lobby, .. }
            | ClientMessage::RequestCurrentState { lobby } => lobby,
        }
    }

    /// The participant a message claims to act for, if it names one
    pub fn participant_id(&self) -> Option<&str> {
        match self {
            ClientMessage::SubmitQuestions { participant_id, .. }
            | ClientMessage::RecordAnswer { participant_id, .. }
            | ClientMessage::SetReady { participant_id, .. }
            | ClientMessage::RequestAdvance { participant_id, .. } => Some(participant_id),
            ClientMessage::Join { .. } | ClientMessage::RequestCurrentState { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent only to the joining connection, ahead of the roster broadcast
    #[serde(rename_all = "camelCase")]
    NameConfirmed {
        participant_id: ParticipantId,
        is_admin: bool,
        name: String,
    },
    Participants {
        participants: Vec<ParticipantInfo>,
    },
    Questions {
        questions: Vec<QuestionView>,
        /// RFC3339 deadline of the active question when a server timer is configured
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deadline: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AnswerResults {
        question_id: QuestionId,
        correct_answer: AnswerOption,
        results: Vec<AnswerOutcome>,
    },
    GameOver,
    /// Reply to `requestCurrentState`
    #[serde(rename_all = "camelCase")]
    GameState {
        questions: Vec<QuestionView>,
        current_question: Option<usize>,
        participants: Vec<ParticipantInfo>,
        phase: LobbyPhase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        standings: Option<Vec<Standing>>,
    },
    Error {
        code: String,
        msg: String,
    },
}

/// Roster entry as seen by clients (no connection handle)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub id: ParticipantId,
    pub name: String,
    pub is_admin: bool,
    pub score: u32,
    pub ready: bool,
}

impl From<&Participant> for ParticipantInfo {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            is_admin: p.is_admin,
            score: p.score,
            ready: p.ready,
        }
    }
}

/// Public question info. The correct answer is withheld until the question
/// has results, so the active question cannot be read off the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub question: String,
    pub answers: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<AnswerOption>,
    pub created_at: QuestionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<BTreeMap<ParticipantId, QuestionResult>>,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            question: q.question.clone(),
            answers: q.answers.clone(),
            correct: q.is_resolved().then(|| q.correct.clone()),
            created_at: q.created_at.clone(),
            image_path: q.image_path.clone(),
            is_active: q.is_active,
            results: q.results.clone(),
        }
    }
}

/// Per-participant correctness for a resolved question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub id: ParticipantId,
    pub name: String,
    pub points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_tags() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"join","lobby":"L1","name":"Ada"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Join { ref name, .. } if name == "Ada"));

        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"recordAnswer","lobby":"L1","participantId":"p","questionId":"q","answer":"Paris"}"#,
        )
        .unwrap();
        assert_eq!(msg.lobby(), "L1");
        assert!(matches!(msg, ClientMessage::RecordAnswer { ref question_id, .. } if question_id == "q"));
    }

    #[test]
    fn test_missing_fields_fail_to_parse() {
        let result = serde_json::from_str::<ClientMessage>(r#"{"type":"join","lobby":"L1"}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<ClientMessage>(r#"{"type":"selfDestruct"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_submit_questions_accepts_authoring_shape() {
        let raw = r#"{
            "type": "submitQuestions",
            "lobby": "L1",
            "participantId": "admin",
            "questions": [{
                "question": "Capital of France?",
                "answers": [{"index": 0, "answer": "Paris"}, {"index": 1, "answer": "Lyon"}],
                "correct": {"index": 0, "answer": "Paris"},
                "createdAt": "1700000000000",
                "isEditing": false
            }]
        }"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        match msg {
            ClientMessage::SubmitQuestions { questions, .. } => {
                assert_eq!(questions.len(), 1);
                assert_eq!(questions[0].id(), "1700000000000");
                assert!(!questions[0].is_active);
                assert!(questions[0].results.is_none());
            }
            other => panic!("Expected SubmitQuestions, got {:?}", other),
        }
    }

    #[test]
    fn test_server_message_wire_format() {
        let json = serde_json::to_value(ServerMessage::GameOver).unwrap();
        assert_eq!(json, serde_json::json!({"type": "gameOver"}));

        let json = serde_json::to_value(ServerMessage::NameConfirmed {
            participant_id: "p1".to_string(),
            is_admin: true,
            name: "Ada".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "nameConfirmed");
        assert_eq!(json["participantId"], "p1");
        assert_eq!(json["isAdmin"], true);
    }

    #[test]
    fn test_question_view_hides_unresolved_answer() {
        let mut question = Question {
            question: "2 + 2?".to_string(),
            answers: vec![
                AnswerOption {
                    index: 0,
                    answer: "4".to_string(),
                },
                AnswerOption {
                    index: 1,
                    answer: "5".to_string(),
                },
            ],
            correct: AnswerOption {
                index: 0,
                answer: "4".to_string(),
            },
            created_at: "1".to_string(),
            image_path: None,
            is_active: true,
            results: None,
        };

        let view = QuestionView::from(&question);
        assert!(view.correct.is_none());

        question.results = Some(BTreeMap::new());
        let view = QuestionView::from(&question);
        assert_eq!(view.correct.map(|c| c.answer), Some("4".to_string()));
    }
}
