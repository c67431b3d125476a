use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::api::proto::ServerMessage;
use crate::domain::entities::Seat;
use crate::infrastructure::actor::room_actor::{RoomError, RoomHandle};
use crate::infrastructure::registry::RoomRegistry;

pub struct JoinRoomInput {
    pub room_id: Uuid,
    pub name: String,
    pub outbox: mpsc::UnboundedSender<ServerMessage>,
}

pub struct JoinRoomOutput {
    pub handle: RoomHandle,
    pub seat: Seat,
}

/// Resolves (or founds) a room and binds the caller to a seat in it.
pub struct JoinRoom {
    registry: Arc<RoomRegistry>,
}

impl JoinRoom {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, input: JoinRoomInput) -> Result<JoinRoomOutput, JoinRoomError> {
        let handle = self.registry.get_or_create(input.room_id, input.name.clone()).await;
        let seat = handle.join(input.name, input.outbox).await?;
        Ok(JoinRoomOutput { handle, seat })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JoinRoomError {
    #[error(transparent)]
    Room(#[from] RoomError),
}
