//! Application services orchestrating the CAP codec against the ports.

pub mod error;
pub mod import_service;
pub mod publish_service;

pub use error::AppError;
pub use import_service::ImportService;
pub use publish_service::PublishService;
