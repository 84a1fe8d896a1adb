//! Dispatch layer
//!
//! Routes a named push to the one handler that registered the function,
//! and fans lifecycle notifications out to every handler.

mod router;

pub use router::{DispatchError, RouteResult, TagDispatcher};
