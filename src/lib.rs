//! blockio-nri - Block I/O plugin for the container runtime's NRI hooks

pub mod blockio;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod logging;
pub mod nri;

pub use blockio::{BlockioNri, PLUGIN_TYPE};
pub use config::Config;
pub use error::{NriError, Result};
