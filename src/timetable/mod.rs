//! # Timetable Encoding
//!
//! A timetable is a `T × R` grid (time slots by rooms) of session codes, with `0`
//! marking a free room. A complete timetable holds exactly
//! `Σ classes · credits` occupied cells, keeps the two weekly sessions of a section on
//! different days, and never puts two different courses in the same time slot.

pub mod chromosome;
pub mod code;
pub mod config;

pub use chromosome::{Chromosome, GridRegion};
pub use code::SessionCode;
pub use config::{Configuration, ConfigurationBuilder, Course, Room, DEFAULT_SLOTS_PER_DAY};
