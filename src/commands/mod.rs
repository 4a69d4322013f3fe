//! Command implementations.

pub mod db;
pub mod show;
