// src/utils/mod.rs
//! Shared utilities

pub mod time;
