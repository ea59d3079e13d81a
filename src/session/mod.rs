//! Render jobs.

pub mod render_job;
