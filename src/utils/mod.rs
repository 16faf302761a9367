// src/utils/mod.rs

pub mod de;
