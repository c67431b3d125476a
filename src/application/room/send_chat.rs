use crate::domain::entities::Seat;
use crate::infrastructure::actor::room_actor::RoomHandle;

pub struct SendChat;

impl SendChat {
    pub fn execute(&self, handle: &RoomHandle, seat: Seat, text: String) {
        handle.chat(seat, text);
    }
}
