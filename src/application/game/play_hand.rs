use crate::domain::entities::Seat;
use crate::domain::value_objects::CardId;
use crate::infrastructure::actor::room_actor::{RoomError, RoomHandle};

pub struct PlayHand;

impl PlayHand {
    pub async fn execute(&self, handle: &RoomHandle, seat: Seat, cards: Vec<CardId>) -> Result<(), RoomError> {
        handle.play_hand(seat, cards).await
    }
}
