//! Command implementations and terminal rendering

pub mod collection;
pub mod compat;
pub mod import;
pub mod list;
pub mod setting;
pub mod setup;
pub mod stats;
pub mod ui;
