//! Timetabling domain models.
//!
//! The read-only input side of the engine — time grid, subjects, session
//! requirements, faculty, rooms, the target batch and pinned slots — plus
//! the serializable [`Timetable`] output view. Enumerations are closed
//! sum types matched exhaustively; entities are plain id-linked structs
//! with no ambient storage session behind them.

mod catalog;
mod faculty;
mod grid;
mod room;
mod session;
mod timetable;

pub use catalog::{Batch, Catalog, FixedAssignment};
pub use faculty::{Faculty, UnavailabilityWindow};
pub use grid::{Day, Period, PeriodSpec, TimeGrid};
pub use room::{Room, RoomType};
pub use session::{SessionRequirement, SessionType, Subject};
pub use timetable::{Timetable, TimetableDay, TimetableEntry, TimetableSlot};
