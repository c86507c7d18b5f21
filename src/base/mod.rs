//! Core abstractions shared across the crate.

pub mod kvstore;
