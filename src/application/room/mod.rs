mod force_end;
mod join_room;
mod leave_room;
mod send_chat;
mod set_mode;
mod set_ready;
mod start_match;
mod switch_seat;

pub use force_end::*;
pub use join_room::*;
pub use leave_room::*;
pub use send_chat::*;
pub use set_mode::*;
pub use set_ready::*;
pub use start_match::*;
pub use switch_seat::*;
