//! Port traits the domain depends on; implementations live in [`crate::adapters`].

pub mod cache_port;
pub mod config_port;
pub mod data_port;
pub mod report_port;
