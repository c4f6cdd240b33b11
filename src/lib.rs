//! Pingback - HTTP/1.x acknowledgement server
//!
//! Parses each incoming request and answers it with a short fixed response.

pub mod config;
pub mod http;
pub mod server;
pub mod telemetry;
