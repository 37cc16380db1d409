//! Concrete implementations of the outbound ports.

pub mod http;
pub mod persistence;
