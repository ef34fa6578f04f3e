//! Course records extracted from the portal.

pub mod course;
pub mod division;
pub mod time_slot;

pub use course::{CourseRecord, RowColumns};
pub use time_slot::TimeSlot;
