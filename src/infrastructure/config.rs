//! Runtime configuration, loaded from the environment via `dotenvy`
//! (§6 "Configuration: PORT environment variable...").

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Inter-deal grace period before the next deal is constructed (§4.4
    /// "Deal chaining": "a short grace period (~3 s)").
    pub deal_grace_period: Duration,
    /// Delay before a bot's turn is resolved (§4.3.5: "≥1 s of real time").
    pub bot_turn_delay: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let port = std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000);
        let deal_grace_ms =
            std::env::var("DEAL_GRACE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(3000);
        let bot_delay_ms =
            std::env::var("BOT_TURN_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(1000);

        Self {
            port,
            deal_grace_period: Duration::from_millis(deal_grace_ms),
            bot_turn_delay: Duration::from_millis(bot_delay_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            deal_grace_period: Duration::from_secs(3),
            bot_turn_delay: Duration::from_secs(1),
        }
    }
}
