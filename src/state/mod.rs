mod answer;
mod lobby;
mod question;
mod roster;
mod score;

#[cfg(test)]
pub(crate) mod testing;

pub use lobby::Lobby;

use crate::config::ServerConfig;
use crate::types::LobbyId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// A lobby behind its own lock. Every mutation of one lobby is serialized
/// on this mutex; different lobbies never contend.
pub type SharedLobby = Arc<Mutex<Lobby>>;

/// Shared application state: the lobby registry
#[derive(Clone)]
pub struct AppState {
    pub lobbies: Arc<RwLock<HashMap<LobbyId, SharedLobby>>>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            lobbies: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Look up a lobby, creating it on first use.
    /// Racing first accesses to the same key get the same instance.
    pub async fn get_or_create_lobby(&self, lobby_id: &str) -> SharedLobby {
        if let Some(lobby) = self.lobbies.read().await.get(lobby_id) {
            return lobby.clone();
        }

        let mut lobbies = self.lobbies.write().await;
        lobbies
            .entry(lobby_id.to_string())
            .or_insert_with(|| {
                tracing::info!("Creating lobby {}", lobby_id);
                Arc::new(Mutex::new(Lobby::new(
                    lobby_id.to_string(),
                    self.config.question_timeout,
                )))
            })
            .clone()
    }

    /// Look up a lobby without creating it
    pub async fn get_lobby(&self, lobby_id: &str) -> Option<SharedLobby> {
        self.lobbies.read().await.get(lobby_id).cloned()
    }

    pub async fn lobby_ids(&self) -> Vec<LobbyId> {
        let mut ids: Vec<_> = self.lobbies.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of all lobby handles (the registry lock is released on return)
    pub async fn all_lobbies(&self) -> Vec<SharedLobby> {
        self.lobbies.read().await.values().cloned().collect()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
