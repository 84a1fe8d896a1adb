//! Recording implementations of the backend traits

use std::sync::{Arc, Mutex};
use tagdispatch::handlers::{
    AccengageTracker, Cart, DeviceInfo, EventParams, FirebaseAnalytics, Lead, Purchase,
    TuneTracker,
};
use tagdispatch::Handle;

// === Accengage ===

#[derive(Debug, Clone, PartialEq)]
pub enum AccCall {
    SetIntent(Handle),
    TrackEvent(i64, String),
    TrackEventWithParams(i64, String, Vec<String>),
    TrackLead(Lead),
    TrackAddToCart(Cart),
    TrackPurchase(Purchase),
    UpdateDeviceInfo(DeviceInfo),
    SetView(String),
    StartActivity(Handle),
    StopActivity(Handle),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingAccengage {
    calls: Arc<Mutex<Vec<AccCall>>>,
}

impl RecordingAccengage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AccCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn factory(&self) -> impl FnMut() -> Option<Box<dyn AccengageTracker>> + Send + 'static {
        let tracker = self.clone();
        move || Some(Box::new(tracker.clone()) as Box<dyn AccengageTracker>)
    }

    fn push(&self, call: AccCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AccengageTracker for RecordingAccengage {
    fn set_intent(&mut self, intent: &Handle) {
        self.push(AccCall::SetIntent(intent.clone()));
    }
    fn track_event(&mut self, event_id: i64, event_name: &str) {
        self.push(AccCall::TrackEvent(event_id, event_name.to_string()));
    }
    fn track_event_with_params(&mut self, event_id: i64, event_name: &str, params: &[String]) {
        self.push(AccCall::TrackEventWithParams(
            event_id,
            event_name.to_string(),
            params.to_vec(),
        ));
    }
    fn track_lead(&mut self, lead: Lead) {
        self.push(AccCall::TrackLead(lead));
    }
    fn track_add_to_cart(&mut self, cart: Cart) {
        self.push(AccCall::TrackAddToCart(cart));
    }
    fn track_purchase(&mut self, purchase: Purchase) {
        self.push(AccCall::TrackPurchase(purchase));
    }
    fn update_device_info(&mut self, info: DeviceInfo) {
        self.push(AccCall::UpdateDeviceInfo(info));
    }
    fn set_view(&mut self, screen_name: &str) {
        self.push(AccCall::SetView(screen_name.to_string()));
    }
    fn start_activity(&mut self, activity: &Handle) {
        self.push(AccCall::StartActivity(activity.clone()));
    }
    fn stop_activity(&mut self, activity: &Handle) {
        self.push(AccCall::StopActivity(activity.clone()));
    }
}

// === Firebase ===

#[derive(Debug, Clone, PartialEq)]
pub enum FirebaseCall {
    SetCollectionEnabled(bool),
    SetUserId(String),
    SetUserProperty(String, Option<String>),
    LogEvent(String, Option<EventParams>),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingFirebase {
    calls: Arc<Mutex<Vec<FirebaseCall>>>,
}

impl RecordingFirebase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<FirebaseCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn factory(&self) -> impl FnMut() -> Option<Box<dyn FirebaseAnalytics>> + Send + 'static {
        let analytics = self.clone();
        move || Some(Box::new(analytics.clone()) as Box<dyn FirebaseAnalytics>)
    }

    fn push(&self, call: FirebaseCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl FirebaseAnalytics for RecordingFirebase {
    fn set_analytics_collection_enabled(&mut self, enabled: bool) {
        self.push(FirebaseCall::SetCollectionEnabled(enabled));
    }
    fn set_user_id(&mut self, user_id: &str) {
        self.push(FirebaseCall::SetUserId(user_id.to_string()));
    }
    fn set_user_property(&mut self, name: &str, value: Option<&str>) {
        self.push(FirebaseCall::SetUserProperty(
            name.to_string(),
            value.map(str::to_string),
        ));
    }
    fn log_event(&mut self, name: &str, params: Option<EventParams>) {
        self.push(FirebaseCall::LogEvent(name.to_string(), params));
    }
}

// === Tune ===

#[derive(Debug, Clone, PartialEq)]
pub enum TuneCall {
    Init(String, String),
    SetUserId(String),
    SetFacebookUserId(String),
    SetGoogleUserId(String),
    MeasureEvent(String),
    SetReferralSources(Handle),
    MeasureSession,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingTune {
    calls: Arc<Mutex<Vec<TuneCall>>>,
}

impl RecordingTune {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TuneCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn factory(&self) -> impl FnMut() -> Option<Box<dyn TuneTracker>> + Send + 'static {
        let tracker = self.clone();
        move || Some(Box::new(tracker.clone()) as Box<dyn TuneTracker>)
    }

    fn push(&self, call: TuneCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl TuneTracker for RecordingTune {
    fn init(&mut self, advertiser_id: &str, conversion_key: &str) {
        self.push(TuneCall::Init(
            advertiser_id.to_string(),
            conversion_key.to_string(),
        ));
    }
    fn set_user_id(&mut self, user_id: &str) {
        self.push(TuneCall::SetUserId(user_id.to_string()));
    }
    fn set_facebook_user_id(&mut self, user_id: &str) {
        self.push(TuneCall::SetFacebookUserId(user_id.to_string()));
    }
    fn set_google_user_id(&mut self, user_id: &str) {
        self.push(TuneCall::SetGoogleUserId(user_id.to_string()));
    }
    fn measure_event(&mut self, event_name: &str) {
        self.push(TuneCall::MeasureEvent(event_name.to_string()));
    }
    fn set_referral_sources(&mut self, activity: &Handle) {
        self.push(TuneCall::SetReferralSources(activity.clone()));
    }
    fn measure_session(&mut self) {
        self.push(TuneCall::MeasureSession);
    }
}
