//! Shared utilities: filesystem helpers, downloads, process execution.

pub mod fs;
pub mod http;
pub mod process;
