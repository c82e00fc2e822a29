//! Rooms and room/session compatibility.

use serde::{Deserialize, Serialize};

use super::session::SessionType;

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    /// Regular lecture room.
    Theory,
    /// Equipped laboratory.
    Lab,
    /// Common hall.
    Common,
    /// Seminar hall.
    Seminar,
}

impl RoomType {
    /// Whether a room of this type may host the given session kind.
    ///
    /// Labs run only in lab rooms; theory and tutorials take lecture rooms
    /// or common halls; special sessions take common or seminar halls.
    pub fn hosts(self, session: SessionType) -> bool {
        match self {
            RoomType::Lab => session == SessionType::Lab,
            RoomType::Theory => matches!(session, SessionType::Theory | SessionType::Tutorial),
            RoomType::Common => session != SessionType::Lab,
            RoomType::Seminar => session == SessionType::Special,
        }
    }
}

/// A physical room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Room classification.
    pub room_type: RoomType,
    /// Seating capacity.
    pub capacity: u32,
}

impl Room {
    /// Creates a room with a default capacity of 60.
    pub fn new(id: impl Into<String>, room_type: RoomType) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            room_type,
            capacity: 60,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the seating capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }
}
