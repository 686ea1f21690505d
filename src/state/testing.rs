//! Helpers shared by the lobby unit tests

use crate::protocol::ServerMessage;
use crate::types::{AnswerOption, Outbox, Question};
use tokio::sync::mpsc;

pub fn outbox() -> (Outbox, mpsc::UnboundedReceiver<ServerMessage>) {
    mpsc::unbounded_channel()
}

/// Everything queued on a connection so far
pub fn drain(rx: &mut mpsc::UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        messages.push(msg);
    }
    messages
}

/// Two-option question whose correct answer is `correct`
pub fn question(id: &str, correct: &str) -> Question {
    Question {
        question: format!("Question {}", id),
        answers: vec![
            AnswerOption {
                index: 0,
                answer: correct.to_string(),
            },
            AnswerOption {
                index: 1,
                answer: "Wrong".to_string(),
            },
        ],
        correct: AnswerOption {
            index: 0,
            answer: correct.to_string(),
        },
        created_at: id.to_string(),
        image_path: None,
        is_active: false,
        results: None,
    }
}
