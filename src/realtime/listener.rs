use sqlx::postgres::PgListener;
use std::time::Duration;
use tracing::{info, warn};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::realtime::event::ChangeEvent;
use crate::realtime::hub::FeedHub;

/// Spawn the LISTEN bridge: reaction notifications from other server
/// processes are republished into the local hub, so every process converges
/// on the same board. Local writes also NOTIFY, and the resulting echo is
/// absorbed by the idempotent board updates.
pub fn spawn_reaction_bridge() {
    tokio::spawn(async move {
        loop {
            if let Err(e) = run_bridge().await {
                warn!("Reaction feed bridge lost: {}. Reconnecting shortly", e);
            }
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
}

async fn run_bridge() -> Result<(), DatabaseError> {
    let pool = DatabaseManager::main_pool().await?;
    let channel = &crate::config::config().feed.pg_channel;

    let mut listener = PgListener::connect_with(&pool).await?;
    listener.listen(channel).await?;
    info!("Listening for reaction changes on '{}'", channel);

    loop {
        let notification = listener.recv().await?;
        match serde_json::from_str::<ChangeEvent>(notification.payload()) {
            Ok(event) => FeedHub::global().publish(event),
            Err(e) => warn!("Discarding malformed feed payload: {}", e),
        }
    }
}
