use super::CommandRunner;
use crate::state::Database;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Queues slash commands into the session's pending input for the host to pick up.
#[derive(Clone)]
pub struct QueuedCommands {
    db: Arc<Mutex<Database>>,
}

impl QueuedCommands {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommandRunner for QueuedCommands {
    async fn run(&self, command: &str, cancel: CancellationToken) -> Result<()> {
        let db = self.db.lock().await;
        if cancel.is_cancelled() {
            bail!("Command cancelled before it was queued: {}", command);
        }
        db.push_pending_input(command)?;
        info!("Queued host command: {}", command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_token_blocks_queueing() {
        let db = Arc::new(Mutex::new(Database::open_memory().unwrap()));
        let runner = QueuedCommands::new(db.clone());

        let token = CancellationToken::new();
        token.cancel();
        assert!(runner.run("/imagine background", token).await.is_err());

        runner
            .run("/imagine background", CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            db.lock().await.pending_input().unwrap(),
            vec!["/imagine background"]
        );
    }
}
