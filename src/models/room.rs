//! Room model.
//!
//! Rooms are the physical resources that host section groups. A room has
//! a seating capacity and a free-form type tag ("lab", "lecture_hall", ...)
//! that sections may require.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

use serde::{Deserialize, Serialize};

/// A room that section groups can be assigned to.
///
/// Identifiers are upper-cased on construction; room types are stored
/// lower-cased and compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier (upper-case).
    pub id: String,
    /// Number of seats.
    pub capacity: u32,
    /// Room type tag (lower-case).
    pub room_type: String,
}

impl Room {
    /// Creates a new room.
    pub fn new(id: impl AsRef<str>, capacity: u32, room_type: impl AsRef<str>) -> Self {
        Self {
            id: id.as_ref().trim().to_uppercase(),
            capacity,
            room_type: room_type.as_ref().trim().to_lowercase(),
        }
    }

    /// Creates a lab room.
    pub fn lab(id: impl AsRef<str>, capacity: u32) -> Self {
        Self::new(id, capacity, "lab")
    }

    /// Creates a lecture hall.
    pub fn lecture_hall(id: impl AsRef<str>, capacity: u32) -> Self {
        Self::new(id, capacity, "lecture_hall")
    }

    /// Whether this room's type matches `room_type` (case-insensitive).
    pub fn has_type(&self, room_type: &str) -> bool {
        self.room_type.trim().to_lowercase() == room_type.trim().to_lowercase()
    }

    /// Whether this room seats at least `students`.
    #[inline]
    pub fn fits(&self, students: u32) -> bool {
        self.capacity >= students
    }
}

/// Largest capacity among `rooms`, or `None` if the slice is empty.
pub fn max_capacity(rooms: &[Room]) -> Option<u32> {
    rooms.iter().map(|r| r.capacity).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_normalization() {
        let r = Room::new(" a101 ", 30, "LAB");
        assert_eq!(r.id, "A101");
        assert_eq!(r.room_type, "lab");
        assert!(r.has_type("Lab"));
        assert!(!r.has_type("lecture_hall"));
    }

    #[test]
    fn test_has_type_unicode_case() {
        let r = Room {
            id: "S1".into(),
            capacity: 20,
            room_type: " ÄTELIER".into(),
        };
        assert!(r.has_type("ätelier"));
        assert!(!r.has_type("lab"));
    }

    #[test]
    fn test_room_fits() {
        let r = Room::lecture_hall("B", 20);
        assert!(r.fits(20));
        assert!(!r.fits(21));
    }

    #[test]
    fn test_max_capacity() {
        let rooms = vec![Room::lab("A", 30), Room::lecture_hall("B", 45)];
        assert_eq!(max_capacity(&rooms), Some(45));
        assert_eq!(max_capacity(&[]), None);
    }
}
