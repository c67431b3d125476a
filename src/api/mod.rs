pub mod proto;
pub mod router;
pub mod ws;

pub use crate::infrastructure::app_state::AppState;
