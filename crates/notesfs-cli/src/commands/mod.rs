//! Command handlers

pub mod config;
pub mod copy;
pub mod entry;
pub mod list;
pub mod status;
pub mod store;
