//! Function-invocation entry point: one sync per invocation, answered with a
//! `{ statusCode, body }` pair instead of a process exit status.

mod error;
pub mod protocol;
mod runtime;

pub use error::FunctionError;
pub use protocol::{ActionRequest, ActionResponse};
pub use runtime::{execute, handle, handle_with_lookup, init_tracing, start_blocking};
