pub mod deal_engine;
mod deck;
pub mod match_controller;
mod rules;

pub use deal_engine::*;
pub use deck::*;
pub use match_controller::*;
pub use rules::*;
