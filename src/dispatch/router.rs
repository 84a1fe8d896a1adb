//! Tag dispatcher — routes pushes to the handler owning the function
//!
//! Every function name belongs to exactly one handler. Registering a
//! handler indexes all of its declared functions; a name claimed twice
//! is rejected. A push for a name nobody claimed is unrouted, which is
//! not an error.

use crate::bag::{EventBag, Handle};
use crate::handler::{TagError, TagHandler};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Registration failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("function {function} already registered by {owner}")]
    DuplicateFunction { function: String, owner: String },
}

/// Result of routing one push.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteResult {
    /// How many handlers received the push (0 or 1)
    pub handlers_invoked: usize,
    /// Why the push was dropped (handler_id, error)
    pub errors: Vec<(String, TagError)>,
}

impl RouteResult {
    pub fn is_routed(&self) -> bool {
        self.handlers_invoked > 0
    }

    /// Routed and forwarded without error.
    pub fn is_accepted(&self) -> bool {
        self.is_routed() && self.errors.is_empty()
    }
}

/// Owns the registered handlers and the function → handler index.
#[derive(Default)]
pub struct TagDispatcher {
    handlers: Vec<Box<dyn TagHandler>>,
    routes: HashMap<&'static str, usize>,
}

impl TagDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under every function it declares.
    ///
    /// Nothing is registered when any of its names is already taken.
    pub fn register(&mut self, handler: Box<dyn TagHandler>) -> Result<(), DispatchError> {
        for &function in handler.functions() {
            if let Some(&owner) = self.routes.get(function) {
                return Err(DispatchError::DuplicateFunction {
                    function: function.to_string(),
                    owner: self.handlers[owner].id().to_string(),
                });
            }
        }

        let index = self.handlers.len();
        for &function in handler.functions() {
            self.routes.insert(function, index);
        }
        debug!(handler = handler.id(), functions = handler.functions().len(), "registered handler");
        self.handlers.push(handler);
        Ok(())
    }

    /// Acquire every handler's backend handle.
    pub fn initialize_all(&mut self) {
        for handler in &mut self.handlers {
            handler.initialize();
        }
    }

    pub fn dispatch(&mut self, function: &str, bag: EventBag) -> RouteResult {
        let mut result = RouteResult::default();

        let Some(&index) = self.routes.get(function) else {
            debug!(function, "no handler registered for function");
            return result;
        };

        let handler = &mut self.handlers[index];
        result.handlers_invoked += 1;
        if let Err(e) = handler.dispatch(function, bag) {
            result.errors.push((handler.id().to_string(), e));
        }
        result
    }

    /// Every routable function name, sorted.
    pub fn functions(&self) -> Vec<&'static str> {
        let mut functions: Vec<&'static str> = self.routes.keys().copied().collect();
        functions.sort_unstable();
        functions
    }

    pub fn handlers(&self) -> impl Iterator<Item = &dyn TagHandler> {
        self.handlers.iter().map(|h| h.as_ref())
    }

    pub fn handler(&self, id: &str) -> Option<&dyn TagHandler> {
        self.handlers().find(|h| h.id() == id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn activity_started(&mut self, activity: &Handle) {
        for handler in &mut self.handlers {
            handler.on_activity_started(activity);
        }
    }

    pub fn activity_resumed(&mut self, activity: &Handle) {
        for handler in &mut self.handlers {
            handler.on_activity_resumed(activity);
        }
    }

    pub fn activity_paused(&mut self, activity: &Handle) {
        for handler in &mut self.handlers {
            handler.on_activity_paused(activity);
        }
    }

    pub fn activity_stopped(&mut self, activity: &Handle) {
        for handler in &mut self.handlers {
            handler.on_activity_stopped(activity);
        }
    }
}

impl std::fmt::Debug for TagDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagDispatcher")
            .field("handlers", &self.handlers().map(|h| h.id()).collect::<Vec<_>>())
            .field("functions", &self.routes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{HandlerCore, RecordingDiagnostics};
    use std::sync::{Arc, Mutex};

    // === Test handler implementations ===

    /// Records every executed function; `init_function` always succeeds.
    struct TestHandler {
        core: HandlerCore,
        functions: &'static [&'static str],
        executed: Arc<Mutex<Vec<String>>>,
        resumed: Arc<Mutex<usize>>,
    }

    impl TestHandler {
        fn new(
            name: &'static str,
            functions: &'static [&'static str],
        ) -> (Self, Arc<Mutex<Vec<String>>>, Arc<Mutex<usize>>) {
            let executed = Arc::new(Mutex::new(Vec::new()));
            let resumed = Arc::new(Mutex::new(0));
            let core = HandlerCore::new(name, name, Arc::new(RecordingDiagnostics::new()));
            (
                Self {
                    core,
                    functions,
                    executed: executed.clone(),
                    resumed: resumed.clone(),
                },
                executed,
                resumed,
            )
        }
    }

    impl TagHandler for TestHandler {
        fn core(&self) -> &HandlerCore {
            &self.core
        }
        fn init_function(&self) -> &'static str {
            self.functions[0]
        }
        fn functions(&self) -> &'static [&'static str] {
            self.functions
        }
        fn initialize(&mut self) {
            self.core.validate(true);
        }
        fn init(&mut self, _bag: &mut EventBag) -> Result<(), TagError> {
            self.core.mark_ready();
            Ok(())
        }
        fn execute(&mut self, function: &str, _bag: &mut EventBag) -> Result<(), TagError> {
            self.executed.lock().unwrap().push(function.to_string());
            Ok(())
        }
        fn on_activity_resumed(&mut self, _activity: &Handle) {
            *self.resumed.lock().unwrap() += 1;
        }
    }

    // === Scenario: push routed to the handler owning the function ===
    #[test]
    fn push_routed_to_owner() {
        let mut dispatcher = TagDispatcher::new();
        let (a, a_executed, _) = TestHandler::new("A", &["A_init", "A_track"]);
        let (b, b_executed, _) = TestHandler::new("B", &["B_init", "B_track"]);
        dispatcher.register(Box::new(a)).unwrap();
        dispatcher.register(Box::new(b)).unwrap();
        dispatcher.initialize_all();

        dispatcher.dispatch("A_init", EventBag::new());
        let result = dispatcher.dispatch("A_track", EventBag::new());

        assert!(result.is_accepted());
        assert_eq!(*a_executed.lock().unwrap(), vec!["A_track".to_string()]);
        assert!(b_executed.lock().unwrap().is_empty());
    }

    // === Scenario: unregistered function is unrouted, not an error ===
    #[test]
    fn unregistered_function_is_unrouted() {
        let mut dispatcher = TagDispatcher::new();
        let (a, _, _) = TestHandler::new("A", &["A_init"]);
        dispatcher.register(Box::new(a)).unwrap();

        let result = dispatcher.dispatch("Z_track", EventBag::new());

        assert!(!result.is_routed());
        assert!(result.errors.is_empty());
    }

    // === Scenario: handler failure lands in the route result ===
    #[test]
    fn uninitialized_push_is_recorded() {
        let mut dispatcher = TagDispatcher::new();
        let (a, executed, _) = TestHandler::new("A", &["A_init", "A_track"]);
        dispatcher.register(Box::new(a)).unwrap();

        let result = dispatcher.dispatch("A_track", EventBag::new());

        assert_eq!(result.handlers_invoked, 1);
        assert_eq!(
            result.errors,
            vec![("A".to_string(), TagError::Uninitialized("A_track".into()))]
        );
        assert!(!result.is_accepted());
        assert!(executed.lock().unwrap().is_empty());
    }

    // === Scenario: a function name claimed twice is rejected ===
    #[test]
    fn duplicate_function_rejected() {
        let mut dispatcher = TagDispatcher::new();
        let (a, _, _) = TestHandler::new("A", &["A_init", "shared"]);
        let (b, _, _) = TestHandler::new("B", &["B_init", "shared"]);
        dispatcher.register(Box::new(a)).unwrap();

        let err = dispatcher.register(Box::new(b)).unwrap_err();

        assert_eq!(
            err,
            DispatchError::DuplicateFunction {
                function: "shared".into(),
                owner: "A".into()
            }
        );
        assert_eq!(dispatcher.len(), 1);
        assert!(!dispatcher.functions().contains(&"B_init"));
    }

    // === Scenario: lifecycle notifications reach every handler ===
    #[test]
    fn lifecycle_fans_out() {
        let mut dispatcher = TagDispatcher::new();
        let (a, _, a_resumed) = TestHandler::new("A", &["A_init"]);
        let (b, _, b_resumed) = TestHandler::new("B", &["B_init"]);
        dispatcher.register(Box::new(a)).unwrap();
        dispatcher.register(Box::new(b)).unwrap();

        let activity = Handle::new("main");
        dispatcher.activity_resumed(&activity);
        dispatcher.activity_paused(&activity);

        assert_eq!(*a_resumed.lock().unwrap(), 1);
        assert_eq!(*b_resumed.lock().unwrap(), 1);
    }

    #[test]
    fn lookup_by_id() {
        let mut dispatcher = TagDispatcher::new();
        let (a, _, _) = TestHandler::new("A", &["A_init", "A_track"]);
        dispatcher.register(Box::new(a)).unwrap();

        assert_eq!(dispatcher.handler("A").map(|h| h.functions().len()), Some(2));
        assert!(dispatcher.handler("B").is_none());
        assert_eq!(dispatcher.functions(), vec!["A_init", "A_track"]);
    }
}
