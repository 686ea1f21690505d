//! Question set lifecycle: NotStarted -> InProgress(i) -> Ended

use super::Lobby;
use crate::error::LobbyError;
use crate::protocol::ServerMessage;
use crate::types::*;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

impl Lobby {
    /// Install a new question set and start the game on its first question.
    ///
    /// Accepted in any phase: a submission mid-game or after the end starts
    /// over, so scores, readiness and recorded answers are reset. In a lobby
    /// left without an admin after game over, the submitter takes the role.
    pub fn submit_questions(
        &mut self,
        participant_id: &str,
        mut questions: Vec<Question>,
    ) -> Result<(), LobbyError> {
        if self.admin().is_none() {
            self.claim_admin(participant_id)?;
        }
        self.require_admin(participant_id, "submit questions")?;

        if questions.is_empty() {
            return Err(LobbyError::Malformed(
                "question set must not be empty".to_string(),
            ));
        }
        {
            let mut seen = HashSet::new();
            for q in &questions {
                if q.created_at.is_empty() {
                    return Err(LobbyError::Malformed(
                        "question is missing createdAt".to_string(),
                    ));
                }
                if !seen.insert(q.created_at.as_str()) {
                    return Err(LobbyError::Malformed(format!(
                        "duplicate question id {}",
                        q.created_at
                    )));
                }
            }
        }

        for q in &mut questions {
            q.is_active = false;
            q.results = None;
        }
        questions[0].is_active = true;

        let restarted = !self.questions.is_empty();
        self.questions = questions;
        self.game_ended = false;
        self.answers.clear();
        for p in &mut self.participants {
            p.score = 0;
            p.ready = false;
        }
        self.arm_deadline();

        tracing::info!(
            "Lobby {} {} with {} questions",
            self.id,
            if restarted { "restarted" } else { "started" },
            self.questions.len()
        );

        self.broadcast_questions();
        self.broadcast_participants();
        Ok(())
    }

    /// Admin-requested advance
    pub fn request_advance(&mut self, participant_id: &str) -> Result<(), LobbyError> {
        self.require_admin(participant_id, "advance the game")?;
        self.advance();
        Ok(())
    }

    /// Move to the next question, or end the game when the active question is
    /// the last one. Returns false (and sends nothing) when no question is
    /// active, which covers both a lobby that never started and one that has
    /// already ended.
    pub fn advance(&mut self) -> bool {
        let Some(index) = self.active_index() else {
            tracing::debug!("Ignoring advance in lobby {}: no active question", self.id);
            return false;
        };

        self.questions[index].is_active = false;

        if index + 1 < self.questions.len() {
            self.questions[index + 1].is_active = true;
            self.arm_deadline();
            tracing::info!("Lobby {} advanced to question {}", self.id, index + 1);
            self.broadcast_questions();
        } else {
            self.finish();
        }
        true
    }

    /// Force the game over regardless of progress. Only a running game can
    /// be ended: returns false without broadcasting when the lobby never
    /// started or has already ended.
    pub fn end_game(&mut self) -> bool {
        if self.active_index().is_none() {
            tracing::debug!("Ignoring end game in lobby {}: no game running", self.id);
            return false;
        }
        for q in &mut self.questions {
            q.is_active = false;
        }
        self.finish();
        true
    }

    /// Advance if the active question's answer window has closed by `now`
    pub fn expire_deadline(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline && self.active_index().is_some() => {
                tracing::info!("Question timer expired in lobby {}", self.id);
                self.advance()
            }
            _ => false,
        }
    }

    fn finish(&mut self) {
        self.game_ended = true;
        self.deadline = None;
        tracing::info!("Game over in lobby {}", self.id);
        self.broadcast(ServerMessage::GameOver);
    }

    fn arm_deadline(&mut self) {
        self.deadline = self
            .question_timeout
            .and_then(|timeout| chrono::Duration::from_std(timeout).ok())
            .map(|timeout| Utc::now() + timeout);
    }
}
