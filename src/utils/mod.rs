//! Shared helpers for dates and XML output.

pub mod date;
pub mod xml;
