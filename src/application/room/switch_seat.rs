use crate::domain::entities::Seat;
use crate::infrastructure::actor::room_actor::{RoomError, RoomHandle};

pub struct SwitchSeat;

impl SwitchSeat {
    pub async fn execute(&self, handle: &RoomHandle, seat: Seat, target: Seat) -> Result<(), RoomError> {
        handle.switch_seat(seat, target).await
    }
}
