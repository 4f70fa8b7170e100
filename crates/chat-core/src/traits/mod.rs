//! Ports - interfaces the domain needs from the outside world

mod transport;

pub use transport::{RoomOccupancy, Transport};
