//! tagdispatch: Tag Dispatch and Backend Adaptation
//!
//! Receives named pushes carrying an untyped parameter bag, routes each
//! to the handler that registered the function, and lets that handler
//! validate the bag and forward it to its analytics backend.
//!
//! # Core Concepts
//!
//! - **EventBag**: ordered string-keyed parameters of heterogeneous values
//! - **Extraction**: typed reads where a type mismatch reads as absence
//! - **TagHandler**: an adapter with an Uninitialized → Ready lifecycle
//! - **Diagnostics**: every accepted parameter and every drop is reported
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tagdispatch::{build_dispatcher, Config, EventBag, RecordingDiagnostics};
//!
//! let recorder = RecordingDiagnostics::new();
//! let mut dispatcher = build_dispatcher(&Config::default(), Arc::new(recorder.clone())).unwrap();
//! dispatcher.initialize_all();
//!
//! let result = dispatcher.dispatch("ACC_tagView", EventBag::new().with("screenName", "home"));
//! assert!(!result.is_accepted()); // ACC_init has not run yet
//! ```

pub mod bag;
pub mod config;
pub mod dispatch;
pub mod extract;
pub mod handler;
pub mod handlers;
pub mod models;
pub mod replay;

pub use bag::{from_json, EventBag, EventValue, Handle};
pub use config::{Config, ConfigError};
pub use dispatch::{DispatchError, RouteResult, TagDispatcher};
pub use handler::{
    Diagnostic, DiagnosticSink, HandlerState, RecordingDiagnostics, TagError, TagHandler,
    TracingDiagnostics,
};
pub use handlers::dry_run::build_dispatcher;
pub use handlers::{AccengageHandler, FirebaseHandler, TuneHandler};
pub use models::LineItem;
pub use replay::{replay, Push, ReplayError, ReplaySummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
