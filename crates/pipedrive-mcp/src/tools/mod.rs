//! Tool adapters.
//!
//! Each adapter turns string-typed tool parameters into client requests and
//! returns the unwrapped result; the server turns that result into the
//! response envelope through [`helpers::respond`].

pub mod comments;
pub mod deals;
pub mod helpers;
pub mod notes;
pub mod params;
pub mod pipelines;
pub mod users;

pub use helpers::{convert_id_string, format_tool_response, respond, ToolError, ToolResult};
pub use params::*;
