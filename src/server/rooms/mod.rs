/// Room management: codes, slots, sessions, and the manager actor.
pub mod messages;
pub mod server;
pub mod types;

pub use server::RoomManager;
