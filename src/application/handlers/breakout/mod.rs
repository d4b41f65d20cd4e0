//! Breakout room handlers.

mod close_rooms;
mod get_rooms;
mod membership;
mod open_round;
mod participant_locks;
mod views;

pub use close_rooms::{CloseAllRoomsCommand, CloseAllRoomsHandler, CloseRoomCommand, CloseRoomHandler};
pub use get_rooms::{BreakoutRoomsView, GetRoomsHandler, GetRoomsQuery};
pub use membership::{JoinRoomCommand, JoinRoomHandler, LeaveRoomCommand, LeaveRoomHandler};
pub use open_round::{OpenRoundCommand, OpenRoundHandler};
pub use participant_locks::ParticipantLocks;
pub use views::{RoomParticipantView, RoomView};
