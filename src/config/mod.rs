//! Job configuration loaded from JSON.

pub mod job;
