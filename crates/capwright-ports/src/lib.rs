//! Boundary traits between the CAP domain and the outside world.
//!
//! Outbound ports are implemented by adapters (HTTP, SQLite, brokers);
//! inbound ports are implemented by application services and consumed by
//! whatever transport fronts the system.

pub mod error;
pub mod inbound;
pub mod outbound;
pub mod types;
