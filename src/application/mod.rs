pub mod game;
pub mod room;
