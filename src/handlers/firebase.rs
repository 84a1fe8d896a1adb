//! FirebaseHandler — product analytics adapter
//!
//! `Firebase_init` toggles analytics collection, `Firebase_identify` sets
//! the user id and user properties, `Firebase_tagEvent` logs a named
//! event with its extra parameters.

use crate::bag::{EventBag, EventValue, Handle};
use crate::extract::{get_bool, get_string};
use crate::handler::{
    backend, BackendFactory, Diagnostic, DiagnosticSink, HandlerCore, TagError, TagHandler,
};
use crate::models::event::EVENT_NAME;
use crate::models::user::USER_ID;
use std::sync::Arc;

pub const FIREBASE_INIT: &str = "Firebase_init";
pub const FIREBASE_IDENTIFY: &str = "Firebase_identify";
pub const FIREBASE_TAG_EVENT: &str = "Firebase_tagEvent";

const FUNCTIONS: &[&str] = &[FIREBASE_INIT, FIREBASE_IDENTIFY, FIREBASE_TAG_EVENT];

pub const ENABLE_COLLECTION: &str = "enableCollection";
/// Event logged each time an activity is resumed
pub const APP_OPEN: &str = "app_open";

/// A typed event parameter. Firebase only carries text and integers here.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Long(i64),
}

/// Ordered event parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventParams {
    entries: Vec<(String, ParamValue)>,
}

impl EventParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), ParamValue::Text(value.into())));
    }

    pub fn put_long(&mut self, key: impl Into<String>, value: i64) {
        self.entries.push((key.into(), ParamValue::Long(value)));
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The calls the adapter makes on the Firebase analytics SDK.
pub trait FirebaseAnalytics: Send {
    fn set_analytics_collection_enabled(&mut self, enabled: bool);

    fn set_user_id(&mut self, user_id: &str);

    /// `None` clears the property.
    fn set_user_property(&mut self, name: &str, value: Option<&str>);

    /// `None` logs the event without parameters.
    fn log_event(&mut self, name: &str, params: Option<EventParams>);
}

/// Adapter between tag pushes and Firebase analytics.
pub struct FirebaseHandler {
    core: HandlerCore,
    factory: BackendFactory<dyn FirebaseAnalytics>,
    analytics: Option<Box<dyn FirebaseAnalytics>>,
}

impl FirebaseHandler {
    pub fn new(
        factory: impl FnMut() -> Option<Box<dyn FirebaseAnalytics>> + Send + 'static,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            core: HandlerCore::new("Firebase", "Firebase", diagnostics),
            factory: Box::new(factory),
            analytics: None,
        }
    }

    /// Every key besides `userId` becomes a user property.
    fn identify(&mut self, bag: &mut EventBag) -> Result<(), TagError> {
        let user_id = get_string(bag, USER_ID);
        bag.remove(USER_ID);
        let bag: &EventBag = bag;
        let properties: Vec<(&str, Option<String>)> =
            bag.keys().map(|key| (key, get_string(bag, key))).collect();

        let analytics = backend(&mut self.analytics)?;
        if let Some(ref user_id) = user_id {
            analytics.set_user_id(user_id);
        }
        for (name, value) in &properties {
            analytics.set_user_property(name, value.as_deref());
        }

        if let Some(user_id) = user_id {
            self.core.accepted(USER_ID, user_id);
        }
        for (name, value) in properties {
            self.core.accepted(name, value);
        }
        Ok(())
    }

    /// Named event. Text and integer extras become event parameters; any
    /// other extra is skipped and reported as ignored.
    fn tag_event(&mut self, bag: &mut EventBag) -> Result<(), TagError> {
        let event_name = get_string(bag, EVENT_NAME)
            .ok_or_else(|| TagError::missing(FIREBASE_TAG_EVENT, &[EVENT_NAME]))?;
        bag.remove(EVENT_NAME);

        let mut forwarded: Vec<(String, EventValue)> = Vec::new();
        let params = if bag.is_empty() {
            None
        } else {
            let mut params = EventParams::new();
            for (key, value) in bag.iter() {
                match value {
                    EventValue::String(s) => params.put_string(key, s.as_str()),
                    EventValue::Int(n) => params.put_long(key, *n),
                    _ => {
                        self.core.report(Diagnostic::ParameterIgnored {
                            function: FIREBASE_TAG_EVENT.to_string(),
                            param: key.to_string(),
                        });
                        continue;
                    }
                }
                forwarded.push((key.to_string(), value.clone()));
            }
            Some(params)
        };

        backend(&mut self.analytics)?.log_event(&event_name, params);
        self.core.accepted(EVENT_NAME, event_name);
        for (key, value) in forwarded {
            self.core.accepted(&key, value);
        }
        Ok(())
    }
}

impl TagHandler for FirebaseHandler {
    fn core(&self) -> &HandlerCore {
        &self.core
    }

    fn init_function(&self) -> &'static str {
        FIREBASE_INIT
    }

    fn functions(&self) -> &'static [&'static str] {
        FUNCTIONS
    }

    fn initialize(&mut self) {
        if self.analytics.is_none() {
            self.analytics = (self.factory)();
        }
        self.core.validate(self.analytics.is_some());
    }

    /// No credentials are needed: the push only optionally toggles
    /// collection. A present but non-boolean toggle enables collection.
    fn init(&mut self, bag: &mut EventBag) -> Result<(), TagError> {
        let analytics = backend(&mut self.analytics)?;

        let enabled = bag
            .contains_key(ENABLE_COLLECTION)
            .then(|| get_bool(bag, ENABLE_COLLECTION, true));
        if let Some(enabled) = enabled {
            analytics.set_analytics_collection_enabled(enabled);
            self.core.accepted(ENABLE_COLLECTION, enabled);
        }

        self.core.mark_ready();
        Ok(())
    }

    fn execute(&mut self, function: &str, bag: &mut EventBag) -> Result<(), TagError> {
        match function {
            FIREBASE_IDENTIFY => self.identify(bag),
            FIREBASE_TAG_EVENT => self.tag_event(bag),
            other => Err(TagError::UnknownFunction(other.to_string())),
        }
    }

    fn on_activity_resumed(&mut self, _activity: &Handle) {
        if let Some(analytics) = self.analytics.as_deref_mut() {
            analytics.log_event(APP_OPEN, Some(EventParams::new()));
        }
    }
}

impl std::fmt::Debug for FirebaseHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseHandler")
            .field("core", &self.core)
            .field("has_analytics", &self.analytics.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_keep_insertion_order() {
        let mut params = EventParams::new();
        params.put_string("b", "x");
        params.put_long("a", 2);
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(params.get("a"), Some(&ParamValue::Long(2)));
        assert_eq!(params.len(), 2);
    }
}
