//! TCP accept loop.

pub mod listener;

pub use listener::{Accept, run, serve};
