// src/models/mod.rs

pub mod historical;
pub mod insights;
pub mod quiz;
pub mod submission;
