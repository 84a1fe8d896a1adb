//! TagHandler trait — the contract every backend adapter implements
//!
//! A handler declares the functions it understands, acquires its backend
//! handle in `initialize()`, and receives pushes through `dispatch()`.
//! `dispatch()` owns the shared gating (init event first, then the
//! Ready check) so adapters only write their per-function routines.

use super::error::TagError;
use super::state::HandlerCore;
use crate::bag::{EventBag, Handle};

/// Factory for a backend handle, e.g. "get the SDK singleton".
///
/// Returning `None` means the backend is unusable in this process.
pub type BackendFactory<T> = Box<dyn FnMut() -> Option<Box<T>> + Send>;

/// Borrow the backend behind `slot`, or fail as unavailable.
pub fn backend<T: ?Sized>(slot: &mut Option<Box<T>>) -> Result<&mut T, TagError> {
    slot.as_deref_mut().ok_or(TagError::BackendUnavailable)
}

/// The contract backend adapters implement.
pub trait TagHandler: Send {
    fn core(&self) -> &HandlerCore;

    /// The function that initializes this handler (e.g. `ACC_init`)
    fn init_function(&self) -> &'static str;

    /// Every function this handler registers, init function included
    fn functions(&self) -> &'static [&'static str];

    /// Acquire the backend handle. Calling it again keeps an existing handle.
    fn initialize(&mut self);

    /// Handle the init function. Reaching Ready is up to the adapter.
    fn init(&mut self, bag: &mut EventBag) -> Result<(), TagError>;

    /// Handle any non-init function. Only called while Ready.
    ///
    /// Unrecognized names return `Err(TagError::UnknownFunction)`.
    fn execute(&mut self, function: &str, bag: &mut EventBag) -> Result<(), TagError>;

    /// Stable identifier, the backend display name
    fn id(&self) -> &str {
        self.core().name()
    }

    fn is_initialized(&self) -> bool {
        self.core().is_ready()
    }

    /// Entry point for one push.
    ///
    /// The init function always runs; anything else is dropped until the
    /// handler is Ready. A failure is reported once through the
    /// diagnostic sink and handed back for the caller's bookkeeping.
    fn dispatch(&mut self, function: &str, mut bag: EventBag) -> Result<(), TagError> {
        self.core().received(function, &bag);

        let result = if function == self.init_function() {
            self.init(&mut bag)
        } else if !self.core().is_ready() {
            Err(TagError::Uninitialized(function.to_string()))
        } else {
            self.execute(function, &mut bag)
        };

        if let Err(ref error) = result {
            self.core().reject(error);
        }
        result
    }

    fn on_activity_started(&mut self, _activity: &Handle) {}

    fn on_activity_resumed(&mut self, _activity: &Handle) {}

    fn on_activity_paused(&mut self, _activity: &Handle) {}

    fn on_activity_stopped(&mut self, _activity: &Handle) {}
}
