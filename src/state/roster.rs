//! Admission, departure, admin failover and readiness

use super::Lobby;
use crate::error::LobbyError;
use crate::types::*;

impl Lobby {
    /// Admit a new participant. The first one in an empty lobby becomes admin.
    pub fn join(&mut self, name: &str, outbox: Outbox) -> Result<Participant, LobbyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LobbyError::Malformed("name must not be empty".to_string()));
        }

        let lowered = name.to_lowercase();
        if self
            .participants
            .iter()
            .any(|p| p.name.to_lowercase() == lowered)
        {
            return Err(LobbyError::NameTaken(name.to_string()));
        }

        let participant = Participant {
            id: ulid::Ulid::new().to_string(),
            name: name.to_string(),
            is_admin: self.participants.is_empty(),
            score: 0,
            ready: false,
            outbox,
        };
        self.participants.push(participant.clone());

        tracing::info!(
            "{} joined lobby {} as {} (admin: {})",
            participant.name,
            self.id,
            participant.id,
            participant.is_admin
        );

        self.broadcast_participants();
        Ok(participant)
    }

    /// Remove a participant whose connection closed.
    ///
    /// Hands the admin role to the earliest-joined remaining participant unless
    /// the game has ended, then re-checks the completion predicates so the
    /// departed participant cannot hold up the rest of the lobby.
    pub fn leave(&mut self, participant_id: &str) -> Option<Participant> {
        let position = self
            .participants
            .iter()
            .position(|p| p.id == participant_id)?;
        let removed = self.participants.remove(position);
        self.answers.retain(|(pid, _), _| pid != participant_id);

        tracing::info!("{} left lobby {}", removed.name, self.id);

        if removed.is_admin && !self.game_ended {
            if let Some(next) = self.participants.first_mut() {
                next.is_admin = true;
                tracing::info!("Promoted {} to admin of lobby {}", next.name, self.id);
            }
        }

        self.broadcast_participants();
        self.check_progress();
        Some(removed)
    }

    /// Update a participant's ready flag. Once results are showing and every
    /// connected participant is ready, the lobby moves on.
    pub fn set_ready(&mut self, participant_id: &str, ready: bool) -> Result<(), LobbyError> {
        let participant = self
            .participant_mut(participant_id)
            .ok_or_else(|| LobbyError::UnknownParticipant(participant_id.to_string()))?;
        participant.ready = ready;

        self.broadcast_participants();

        if ready && self.results_showing() && self.all_ready() {
            tracing::info!("Everyone in lobby {} is ready, advancing", self.id);
            self.advance();
        }
        Ok(())
    }

    pub(super) fn all_ready(&self) -> bool {
        !self.participants.is_empty() && self.participants.iter().all(|p| p.ready)
    }

    /// Hand the vacant admin role to `participant_id`
    pub(super) fn claim_admin(&mut self, participant_id: &str) -> Result<(), LobbyError> {
        let lobby_id = self.id.clone();
        let participant = self
            .participant_mut(participant_id)
            .ok_or_else(|| LobbyError::UnknownParticipant(participant_id.to_string()))?;
        participant.is_admin = true;
        tracing::info!("{} claimed admin of lobby {}", participant.name, lobby_id);
        Ok(())
    }

    pub(super) fn require_admin(
        &self,
        participant_id: &str,
        action: &'static str,
    ) -> Result<(), LobbyError> {
        match self.participant(participant_id) {
            None => Err(LobbyError::UnknownParticipant(participant_id.to_string())),
            Some(p) if !p.is_admin => Err(LobbyError::NotAdmin(action)),
            Some(_) => Ok(()),
        }
    }
}
