//! The room registry (§5 "Shared resources": "a concurrent mapping
//! roomId → room-actor; lookups and inserts are safe under concurrent
//! join requests"). Injected as a collaborator rather than a module-level
//! singleton (§9), so tests can construct isolated registries.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::BotStrategy;
use crate::infrastructure::actor::room_actor::{spawn_room, RoomHandle};
use crate::infrastructure::config::Config;

pub struct RoomRegistry {
    rooms: RwLock<std::collections::HashMap<Uuid, RoomHandle>>,
    config: Config,
    bot: Arc<dyn BotStrategy>,
}

impl RoomRegistry {
    pub fn new(config: Config, bot: Arc<dyn BotStrategy>) -> Self {
        Self { rooms: RwLock::new(std::collections::HashMap::new()), config, bot }
    }

    pub async fn get(&self, room_id: Uuid) -> Option<RoomHandle> {
        self.rooms.read().await.get(&room_id).cloned()
    }

    /// Resolve an existing room, or create it (with `host_name` as the
    /// founding seat-0 occupant) if `room_id` is unseen.
    pub async fn get_or_create(&self, room_id: Uuid, host_name: String) -> RoomHandle {
        if let Some(handle) = self.get(room_id).await {
            return handle;
        }
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room_id)
            .or_insert_with(|| spawn_room(room_id, host_name, self.config.clone(), self.bot.clone()))
            .clone()
    }

    /// Read-only snapshot for ops/tests: how many rooms currently exist.
    /// Not used for cross-room matchmaking (explicit non-goal, §1).
    pub async fn snapshot(&self) -> Vec<Uuid> {
        self.rooms.read().await.keys().copied().collect()
    }
}
