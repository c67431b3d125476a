use crate::domain::entities::Seat;
use crate::infrastructure::actor::room_actor::{RoomError, RoomHandle};

/// Host-only early start (§4.5: "the host may start the match before all
/// four seats report ready"). Empty seats are filled with bots.
pub struct StartMatch;

impl StartMatch {
    pub async fn execute(&self, handle: &RoomHandle, seat: Seat) -> Result<(), RoomError> {
        handle.start(seat).await
    }
}
