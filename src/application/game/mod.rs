mod pass_turn;
mod play_hand;
mod submit_return_tribute;
mod submit_tribute;

pub use pass_turn::*;
pub use play_hand::*;
pub use submit_return_tribute::*;
pub use submit_tribute::*;
