//! Tag handler layer
//!
//! The lifecycle and dispatch contract shared by every backend adapter,
//! plus the diagnostic boundary adapters report through.

mod diagnostics;
mod error;
mod state;
mod traits;

pub use diagnostics::{Diagnostic, DiagnosticSink, RecordingDiagnostics, TracingDiagnostics};
pub use error::TagError;
pub use state::{HandlerCore, HandlerState};
pub use traits::{backend, BackendFactory, TagHandler};
