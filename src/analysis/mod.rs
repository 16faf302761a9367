//! Flatten, join, summarize and plot the quiz feeds.

pub mod chart;
pub mod merge;
pub mod stats;
pub mod table;
