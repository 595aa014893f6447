// src/lib.rs

//! Invoice lottery updater library.
//!
//! Parses the uniform-invoice lottery results feed into drawing records and
//! keeps them in a local JSON database.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
