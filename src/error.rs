//! Error taxonomy for lobby operations

use crate::protocol::ServerMessage;
use crate::types::{ParticipantId, QuestionId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    #[error("Name \"{0}\" is already taken in this lobby")]
    NameTaken(String),

    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Only the lobby admin can {0}")]
    NotAdmin(&'static str),

    #[error("Participant {0} is not in this lobby")]
    UnknownParticipant(ParticipantId),

    #[error("Question {0} is not open for answers")]
    QuestionNotActive(QuestionId),

    #[error("Question {0} was already answered by this participant")]
    AlreadyAnswered(QuestionId),
}

impl LobbyError {
    pub fn code(&self) -> &'static str {
        match self {
            LobbyError::NameTaken(_) => "NAME_TAKEN",
            LobbyError::Malformed(_) => "MALFORMED_MESSAGE",
            LobbyError::NotAdmin(_) => "UNAUTHORIZED",
            LobbyError::UnknownParticipant(_) => "UNKNOWN_PARTICIPANT",
            LobbyError::QuestionNotActive(_) => "QUESTION_NOT_ACTIVE",
            LobbyError::AlreadyAnswered(_) => "ALREADY_ANSWERED",
        }
    }

    /// Whether the sender is told about this error. Authorization failures,
    /// stale references and duplicate answers are dropped quietly.
    pub fn is_reported(&self) -> bool {
        matches!(self, LobbyError::NameTaken(_) | LobbyError::Malformed(_))
    }

    pub fn to_message(&self) -> ServerMessage {
        ServerMessage::Error {
            code: self.code().to_string(),
            msg: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_user_correctable_errors_are_reported() {
        assert!(LobbyError::NameTaken("Bob".to_string()).is_reported());
        assert!(LobbyError::Malformed("empty lobby".to_string()).is_reported());
        assert!(!LobbyError::NotAdmin("advance the game").is_reported());
        assert!(!LobbyError::UnknownParticipant("p".to_string()).is_reported());
        assert!(!LobbyError::QuestionNotActive("q".to_string()).is_reported());
        assert!(!LobbyError::AlreadyAnswered("q".to_string()).is_reported());
    }

    #[test]
    fn test_error_message_shape() {
        let msg = LobbyError::NameTaken("Bob".to_string()).to_message();
        match msg {
            ServerMessage::Error { code, msg } => {
                assert_eq!(code, "NAME_TAKEN");
                assert!(msg.contains("Bob"));
            }
            other => panic!("Expected Error, got {:?}", other),
        }
    }
}
