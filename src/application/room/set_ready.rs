use crate::domain::entities::Seat;
use crate::infrastructure::actor::room_actor::{RoomError, RoomHandle};

pub struct SetReady;

impl SetReady {
    pub async fn execute(&self, handle: &RoomHandle, seat: Seat) -> Result<(), RoomError> {
        handle.set_ready(seat).await
    }
}
