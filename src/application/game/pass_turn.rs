use crate::domain::entities::Seat;
use crate::infrastructure::actor::room_actor::{RoomError, RoomHandle};

pub struct PassTurn;

impl PassTurn {
    pub async fn execute(&self, handle: &RoomHandle, seat: Seat) -> Result<(), RoomError> {
        handle.pass(seat).await
    }
}
