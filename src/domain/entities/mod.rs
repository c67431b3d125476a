mod deal;
mod match_state;
mod room;
mod seat;

pub use deal::*;
pub use match_state::*;
pub use room::*;
pub use seat::*;
