use crate::domain::entities::Seat;
use crate::infrastructure::actor::room_actor::{RoomError, RoomHandle};

/// Host-only abandonment of the current match (§4.6), dropping the room
/// back to Lobby with no winner recorded.
pub struct ForceEnd;

impl ForceEnd {
    pub async fn execute(&self, handle: &RoomHandle, seat: Seat) -> Result<(), RoomError> {
        handle.force_end(seat).await
    }
}
