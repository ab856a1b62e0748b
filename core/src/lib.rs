//! Mock datasets and tool handlers behind the mocktools MCP server.
//!
//! Every handler is a pure function over immutable static tables, so the
//! whole crate is safe to call from any number of threads without locking.

pub mod args;
pub mod datasets;
pub mod error;
pub mod greeting;
pub mod orders;
pub mod products;
pub mod tool;
pub mod weather;

pub use args::{ArgumentError, normalize, normalize_value};
pub use tool::{Tool, ToolError, ToolOutput, ToolProperty, ToolRegistry};
