use actix::Addr;

use crate::server::rooms::RoomManager;

pub struct AppState {
    pub room_manager: Addr<RoomManager>,
}

impl AppState {
    pub fn new(room_manager: Addr<RoomManager>) -> Self {
        AppState { room_manager }
    }
}
