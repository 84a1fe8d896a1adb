//! TuneHandler — attribution analytics adapter
//!
//! `Tune_init` initializes the tracker once with the advertiser id and
//! conversion key. `Tune_purchase` attaches whichever user ids the push
//! carries and measures a purchase event. Each resumed activity is
//! measured as a session.

use crate::bag::{EventBag, Handle};
use crate::extract::{get_string, required};
use crate::handler::{backend, BackendFactory, DiagnosticSink, HandlerCore, TagError, TagHandler};
use crate::models::user::{USER_FACEBOOK_ID, USER_GOOGLE_ID, USER_ID};
use std::sync::Arc;

pub const TUNE_INIT: &str = "Tune_init";
pub const TUNE_PURCHASE: &str = "Tune_purchase";

const FUNCTIONS: &[&str] = &[TUNE_INIT, TUNE_PURCHASE];

pub const ADVERTISER_ID: &str = "advertiserId";
pub const CONVERSION_KEY: &str = "conversionKey";
pub const PURCHASE_EVENT: &str = "purchase";

/// The calls the adapter makes on the Tune SDK.
pub trait TuneTracker: Send {
    fn init(&mut self, advertiser_id: &str, conversion_key: &str);

    fn set_user_id(&mut self, user_id: &str);

    fn set_facebook_user_id(&mut self, user_id: &str);

    fn set_google_user_id(&mut self, user_id: &str);

    fn measure_event(&mut self, event_name: &str);

    /// Attribute the session to whatever launched `activity`
    fn set_referral_sources(&mut self, activity: &Handle);

    fn measure_session(&mut self);
}

/// Adapter between tag pushes and the Tune tracker.
pub struct TuneHandler {
    core: HandlerCore,
    factory: BackendFactory<dyn TuneTracker>,
    tracker: Option<Box<dyn TuneTracker>>,
}

impl TuneHandler {
    pub fn new(
        factory: impl FnMut() -> Option<Box<dyn TuneTracker>> + Send + 'static,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            core: HandlerCore::new("Tune", "Tune", diagnostics),
            factory: Box::new(factory),
            tracker: None,
        }
    }

    fn purchase(&mut self, bag: &EventBag) -> Result<(), TagError> {
        let user_id = get_string(bag, USER_ID);
        let facebook_id = get_string(bag, USER_FACEBOOK_ID);
        let google_id = get_string(bag, USER_GOOGLE_ID);

        let tracker = backend(&mut self.tracker)?;
        if let Some(ref id) = user_id {
            tracker.set_user_id(id);
        }
        if let Some(ref id) = facebook_id {
            tracker.set_facebook_user_id(id);
        }
        if let Some(ref id) = google_id {
            tracker.set_google_user_id(id);
        }
        tracker.measure_event(PURCHASE_EVENT);

        for (param, id) in [
            (USER_ID, user_id),
            (USER_FACEBOOK_ID, facebook_id),
            (USER_GOOGLE_ID, google_id),
        ] {
            if let Some(id) = id {
                self.core.accepted(param, id);
            }
        }
        Ok(())
    }
}

impl TagHandler for TuneHandler {
    fn core(&self) -> &HandlerCore {
        &self.core
    }

    fn init_function(&self) -> &'static str {
        TUNE_INIT
    }

    fn functions(&self) -> &'static [&'static str] {
        FUNCTIONS
    }

    fn initialize(&mut self) {
        if self.tracker.is_none() {
            self.tracker = (self.factory)();
        }
        self.core.validate(self.tracker.is_some());
    }

    /// The tracker is initialized at most once; later init pushes are ignored.
    fn init(&mut self, bag: &mut EventBag) -> Result<(), TagError> {
        if self.core.is_ready() {
            return Err(TagError::AlreadyInitialized(TUNE_INIT.to_string()));
        }

        let mut missing = Vec::new();
        let advertiser_id: Option<String> = required(bag, ADVERTISER_ID, &mut missing);
        let conversion_key: Option<String> = required(bag, CONVERSION_KEY, &mut missing);
        let (Some(advertiser_id), Some(conversion_key)) = (advertiser_id, conversion_key) else {
            return Err(TagError::missing(TUNE_INIT, &missing));
        };
        bag.remove(ADVERTISER_ID);
        bag.remove(CONVERSION_KEY);

        backend(&mut self.tracker)?.init(&advertiser_id, &conversion_key);
        self.core.mark_ready();
        self.core.accepted(ADVERTISER_ID, advertiser_id);
        self.core.accepted(CONVERSION_KEY, conversion_key);
        Ok(())
    }

    fn execute(&mut self, function: &str, bag: &mut EventBag) -> Result<(), TagError> {
        match function {
            TUNE_PURCHASE => self.purchase(bag),
            other => Err(TagError::UnknownFunction(other.to_string())),
        }
    }

    fn on_activity_resumed(&mut self, activity: &Handle) {
        if !self.core.is_ready() {
            return;
        }
        if let Some(tracker) = self.tracker.as_deref_mut() {
            tracker.set_referral_sources(activity);
            tracker.measure_session();
        }
    }
}

impl std::fmt::Debug for TuneHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TuneHandler")
            .field("core", &self.core)
            .field("has_tracker", &self.tracker.is_some())
            .finish_non_exhaustive()
    }
}
