use crate::domain::entities::Seat;
use crate::domain::value_objects::CardId;
use crate::infrastructure::actor::room_actor::{RoomError, RoomHandle};

pub struct SubmitReturnTribute;

impl SubmitReturnTribute {
    pub async fn execute(&self, handle: &RoomHandle, seat: Seat, card: CardId) -> Result<(), RoomError> {
        handle.submit_return(seat, card).await
    }
}
