//! Payment gateway interface and HTTP adapter.

pub mod http;
pub mod models;
