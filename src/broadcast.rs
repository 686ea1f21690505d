use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;

const WATCH_INTERVAL: Duration = Duration::from_millis(500);

/// Spawn a background task that advances lobbies whose active question has
/// run past its deadline. Does nothing unless a question timeout is configured.
///
/// The check runs under each lobby's lock, and a fresh deadline is armed on
/// every advance, so a timer firing right after an admin or all-ready advance
/// finds the new question's deadline and leaves it alone.
pub fn spawn_question_timeout_watcher(state: Arc<AppState>) -> Option<tokio::task::JoinHandle<()>> {
    let timeout = state.config.question_timeout?;
    tracing::info!("Question timer enabled: {}s per question", timeout.as_secs());

    Some(tokio::spawn(async move {
        loop {
            tokio::time::sleep(WATCH_INTERVAL).await;

            let now = chrono::Utc::now();
            for lobby in state.all_lobbies().await {
                lobby.lock().await.expire_deadline(now);
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::types::{AnswerOption, Question};

    #[tokio::test]
    async fn test_watcher_disabled_without_timeout() {
        let state = Arc::new(AppState::new());
        assert!(spawn_question_timeout_watcher(state).is_none());
    }

    #[tokio::test]
    async fn test_watcher_advances_expired_question() {
        let config = ServerConfig {
            question_timeout: Some(Duration::from_millis(100)),
            ..ServerConfig::default()
        };
        let state = Arc::new(AppState::with_config(config));
        let lobby = state.get_or_create_lobby("L1").await;
        {
            let mut lobby = lobby.lock().await;
            let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
            let admin = lobby.join("Ada", tx).unwrap();
            let question = Question {
                question: "Fastest land animal?".to_string(),
                answers: vec![AnswerOption {
                    index: 0,
                    answer: "Cheetah".to_string(),
                }],
                correct: AnswerOption {
                    index: 0,
                    answer: "Cheetah".to_string(),
                },
                created_at: "1".to_string(),
                image_path: None,
                is_active: false,
                results: None,
            };
            lobby.submit_questions(&admin.id, vec![question]).unwrap();
        }

        let handle = spawn_question_timeout_watcher(state.clone()).unwrap();
        tokio::time::sleep(Duration::from_millis(1200)).await;
        handle.abort();

        assert!(lobby.lock().await.game_ended());
    }
}
