//! Answer recording, completion checks and scoring

use super::Lobby;
use crate::error::LobbyError;
use crate::protocol::{AnswerOutcome, ServerMessage};
use crate::types::*;

impl Lobby {
    /// Record a participant's answer for the active question.
    ///
    /// The first answer wins; repeats are rejected with `AlreadyAnswered`.
    /// Once every connected participant has answered, results are computed.
    pub fn record_answer(
        &mut self,
        participant_id: &str,
        question_id: &str,
        answer: String,
    ) -> Result<(), LobbyError> {
        if self.participant(participant_id).is_none() {
            return Err(LobbyError::UnknownParticipant(participant_id.to_string()));
        }

        let index = self
            .active_index()
            .filter(|&i| {
                let q = &self.questions[i];
                q.created_at == question_id && !q.is_resolved()
            })
            .ok_or_else(|| LobbyError::QuestionNotActive(question_id.to_string()))?;

        let key = (participant_id.to_string(), question_id.to_string());
        if self.answers.contains_key(&key) {
            return Err(LobbyError::AlreadyAnswered(question_id.to_string()));
        }
        self.answers.insert(key, answer);

        tracing::debug!(
            "Recorded answer of {} for question {} in lobby {}",
            participant_id,
            question_id,
            self.id
        );

        if self.all_answered(index) {
            self.resolve_question(index);
        }
        Ok(())
    }

    /// Re-evaluate the all-answered and all-ready predicates against the
    /// current roster. Used after the roster shrinks.
    pub(super) fn check_progress(&mut self) {
        let Some(index) = self.active_index() else {
            return;
        };

        if !self.questions[index].is_resolved() {
            if self.all_answered(index) {
                self.resolve_question(index);
            }
        } else if self.all_ready() {
            tracing::info!("Remaining participants in lobby {} are ready", self.id);
            self.advance();
        }
    }

    /// Whether the active question has results attached
    pub(super) fn results_showing(&self) -> bool {
        self.active_question().is_some_and(Question::is_resolved)
    }

    /// Every participant connected right now has answered question `index`
    fn all_answered(&self, index: usize) -> bool {
        let question_id = &self.questions[index].created_at;
        !self.participants.is_empty()
            && self.participants.iter().all(|p| {
                self.answers
                    .contains_key(&(p.id.clone(), question_id.clone()))
            })
    }

    /// Score question `index`, attach its results, and tell the lobby.
    /// Rows follow roster order, so arrival order of answers does not matter.
    fn resolve_question(&mut self, index: usize) {
        let question_id = self.questions[index].created_at.clone();
        let correct = self.questions[index].correct.clone();

        let outcomes: Vec<AnswerOutcome> = self
            .participants
            .iter()
            .map(|p| {
                let given = self.answers.get(&(p.id.clone(), question_id.clone()));
                AnswerOutcome {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    points: u32::from(given.is_some_and(|a| *a == correct.answer)),
                }
            })
            .collect();

        for (participant, outcome) in self.participants.iter_mut().zip(&outcomes) {
            participant.score += outcome.points;
            participant.ready = false;
        }

        self.questions[index].results = Some(
            outcomes
                .iter()
                .map(|o| {
                    (
                        o.id.clone(),
                        QuestionResult {
                            name: o.name.clone(),
                            points: o.points,
                        },
                    )
                })
                .collect(),
        );

        tracing::info!(
            "Question {} resolved in lobby {}: {}/{} correct",
            question_id,
            self.id,
            outcomes.iter().filter(|o| o.points > 0).count(),
            outcomes.len()
        );

        self.broadcast(ServerMessage::AnswerResults {
            question_id,
            correct_answer: correct,
            results: outcomes,
        });
        self.broadcast_participants();
    }
}
