use std::sync::Arc;

use crate::infrastructure::bot::HeuristicBot;
use crate::infrastructure::config::Config;
use crate::infrastructure::registry::RoomRegistry;

/// Application state shared across all handlers. No persistence layer —
/// §1 excludes persistent match-history storage; the room registry is the
/// entire source of truth, held in memory for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RoomRegistry>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let bot = Arc::new(HeuristicBot::new());
        let rooms = Arc::new(RoomRegistry::new(config.clone(), bot));
        Self { rooms, config }
    }
}
