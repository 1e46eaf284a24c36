//! Integration test modules for rackhost

pub mod events;
pub mod loading;
pub mod processing;
