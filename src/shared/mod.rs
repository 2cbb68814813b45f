// src/shared/mod.rs

pub mod errors;
pub mod shared_structs;
