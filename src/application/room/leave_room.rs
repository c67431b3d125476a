use crate::domain::entities::Seat;
use crate::infrastructure::actor::room_actor::RoomHandle;

/// A dropped connection. Lobby seats are freed outright; in-match seats are
/// marked disconnected so the stored name can reclaim them on reconnect
/// (§4.5).
pub struct LeaveRoom;

impl LeaveRoom {
    pub fn execute(&self, handle: &RoomHandle, seat: Seat) {
        handle.disconnect(seat);
    }
}
