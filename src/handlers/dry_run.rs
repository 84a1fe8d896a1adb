//! Dry-run backends — log every backend call instead of sending it
//!
//! Used by the replay tool to show what a sequence of pushes would do
//! without any SDK present.

use super::{
    AccengageHandler, AccengageTracker, Cart, DeviceInfo, EventParams, FirebaseAnalytics,
    FirebaseHandler, Lead, Purchase, TuneHandler, TuneTracker,
};
use crate::bag::Handle;
use crate::config::Config;
use crate::dispatch::{DispatchError, TagDispatcher};
use crate::handler::DiagnosticSink;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default)]
pub struct DryRunAccengage;

impl AccengageTracker for DryRunAccengage {
    fn set_intent(&mut self, intent: &Handle) {
        info!(backend = "Accengage", intent = intent.type_name(), "set_intent");
    }

    fn track_event(&mut self, event_id: i64, event_name: &str) {
        info!(backend = "Accengage", event_id, event_name, "track_event");
    }

    fn track_event_with_params(&mut self, event_id: i64, event_name: &str, params: &[String]) {
        info!(backend = "Accengage", event_id, event_name, ?params, "track_event");
    }

    fn track_lead(&mut self, lead: Lead) {
        info!(backend = "Accengage", label = %lead.label, value = %lead.value, "track_lead");
    }

    fn track_add_to_cart(&mut self, cart: Cart) {
        info!(backend = "Accengage", cart = %cart.id, item = %cart.item, "track_add_to_cart");
    }

    fn track_purchase(&mut self, purchase: Purchase) {
        info!(
            backend = "Accengage",
            id = %purchase.id,
            currency = %purchase.currency_code,
            total = purchase.total,
            items = purchase.items.as_ref().map_or(0, Vec::len),
            "track_purchase"
        );
    }

    fn update_device_info(&mut self, info: DeviceInfo) {
        info!(backend = "Accengage", ?info, "update_device_info");
    }

    fn set_view(&mut self, screen_name: &str) {
        info!(backend = "Accengage", screen_name, "set_view");
    }

    fn start_activity(&mut self, activity: &Handle) {
        info!(backend = "Accengage", activity = activity.type_name(), "start_activity");
    }

    fn stop_activity(&mut self, activity: &Handle) {
        info!(backend = "Accengage", activity = activity.type_name(), "stop_activity");
    }
}

#[derive(Debug, Default)]
pub struct DryRunFirebase;

impl FirebaseAnalytics for DryRunFirebase {
    fn set_analytics_collection_enabled(&mut self, enabled: bool) {
        info!(backend = "Firebase", enabled, "set_analytics_collection_enabled");
    }

    fn set_user_id(&mut self, user_id: &str) {
        info!(backend = "Firebase", user_id, "set_user_id");
    }

    fn set_user_property(&mut self, name: &str, value: Option<&str>) {
        info!(backend = "Firebase", name, ?value, "set_user_property");
    }

    fn log_event(&mut self, name: &str, params: Option<EventParams>) {
        info!(backend = "Firebase", name, ?params, "log_event");
    }
}

#[derive(Debug, Default)]
pub struct DryRunTune;

impl TuneTracker for DryRunTune {
    fn init(&mut self, advertiser_id: &str, conversion_key: &str) {
        info!(backend = "Tune", advertiser_id, conversion_key, "init");
    }

    fn set_user_id(&mut self, user_id: &str) {
        info!(backend = "Tune", user_id, "set_user_id");
    }

    fn set_facebook_user_id(&mut self, user_id: &str) {
        info!(backend = "Tune", user_id, "set_facebook_user_id");
    }

    fn set_google_user_id(&mut self, user_id: &str) {
        info!(backend = "Tune", user_id, "set_google_user_id");
    }

    fn measure_event(&mut self, event_name: &str) {
        info!(backend = "Tune", event_name, "measure_event");
    }

    fn set_referral_sources(&mut self, activity: &Handle) {
        info!(backend = "Tune", activity = activity.type_name(), "set_referral_sources");
    }

    fn measure_session(&mut self) {
        info!(backend = "Tune", "measure_session");
    }
}

/// A dispatcher holding the handlers `config` enables, backed by dry-run
/// backends. Backends are not acquired until `initialize_all()`.
pub fn build_dispatcher(
    config: &Config,
    diagnostics: Arc<dyn DiagnosticSink>,
) -> Result<TagDispatcher, DispatchError> {
    let mut dispatcher = TagDispatcher::new();

    if config.accengage.enabled {
        let handler = AccengageHandler::new(
            || Some(Box::new(DryRunAccengage) as Box<dyn AccengageTracker>),
            diagnostics.clone(),
        )
        .with_settings(config.accengage.settings.clone());
        dispatcher.register(Box::new(handler))?;
    }
    if config.firebase.enabled {
        let handler = FirebaseHandler::new(
            || Some(Box::new(DryRunFirebase) as Box<dyn FirebaseAnalytics>),
            diagnostics.clone(),
        );
        dispatcher.register(Box::new(handler))?;
    }
    if config.tune.enabled {
        let handler = TuneHandler::new(
            || Some(Box::new(DryRunTune) as Box<dyn TuneTracker>),
            diagnostics,
        );
        dispatcher.register(Box::new(handler))?;
    }

    Ok(dispatcher)
}
