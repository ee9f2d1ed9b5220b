//! NRI v1 plugin plumbing.
//!
//! # Architecture
//!
//! - **types**: Wire documents (`Request`, `PluginResult`, `Spec`, `State`)
//! - **skel**: The `Plugin` and `Runner` traits, the invocation `Context`,
//!   and `StdioRunner`, which serves the exec-style protocol
//!
//! # Protocol
//!
//! ```text
//! runtime ──exec──▶ blockio-nri invoke
//!         ──stdin─▶ {"version":"0.1","id":"c1","state":"create",...}
//!         ◀─stdout─ {"version":"0.1","plugin":"blockio-nri","metadata":{}}
//! ```

pub mod skel;
pub mod types;

#[cfg(test)]
pub use skel::MockRunner;
pub use skel::{Context, Plugin, Runner, StdioRunner, CMD_INVOKE, CMD_VERSION};
pub use types::{PluginResult, Request, Spec, State};
