use crate::api::proto::ModeWire;
use crate::domain::entities::Seat;
use crate::infrastructure::actor::room_actor::{RoomError, RoomHandle};

pub struct SetMode;

impl SetMode {
    pub async fn execute(&self, handle: &RoomHandle, seat: Seat, mode: ModeWire) -> Result<(), RoomError> {
        handle.set_mode(seat, mode).await
    }
}
