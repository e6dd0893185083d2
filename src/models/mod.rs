// Core data models for Annomig
// These structs represent the persisted annotation query configuration

pub mod annotation;

pub use annotation::*;
