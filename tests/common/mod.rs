//! Common test utilities for handler integration tests
//!
//! Recording backends capture every call in an `Arc<Mutex<Vec<_>>>` so a
//! test can keep one clone and hand the other to the handler.

#![allow(dead_code)]

pub mod backends;

pub use backends::{
    AccCall, FirebaseCall, RecordingAccengage, RecordingFirebase, RecordingTune, TuneCall,
};

use std::sync::Arc;
use tagdispatch::handlers::{AccengageHandler, FirebaseHandler, TuneHandler};
use tagdispatch::{EventBag, RecordingDiagnostics, TagHandler};

/// An initialized Accengage handler wired to a recorder, not yet Ready.
pub fn accengage() -> (AccengageHandler, RecordingAccengage, RecordingDiagnostics) {
    let tracker = RecordingAccengage::new();
    let recorder = RecordingDiagnostics::new();
    let mut handler = AccengageHandler::new(tracker.factory(), Arc::new(recorder.clone()));
    handler.initialize();
    (handler, tracker, recorder)
}

/// An Accengage handler that has accepted `ACC_init`.
pub fn ready_accengage() -> (AccengageHandler, RecordingAccengage, RecordingDiagnostics) {
    let (mut handler, tracker, recorder) = accengage();
    handler
        .dispatch(
            "ACC_init",
            EventBag::new()
                .with("privateKey", "myPrivateKey")
                .with("partnerId", "myPartnerId"),
        )
        .unwrap();
    recorder.clear();
    (handler, tracker, recorder)
}

pub fn firebase() -> (FirebaseHandler, RecordingFirebase, RecordingDiagnostics) {
    let analytics = RecordingFirebase::new();
    let recorder = RecordingDiagnostics::new();
    let mut handler = FirebaseHandler::new(analytics.factory(), Arc::new(recorder.clone()));
    handler.initialize();
    (handler, analytics, recorder)
}

pub fn ready_firebase() -> (FirebaseHandler, RecordingFirebase, RecordingDiagnostics) {
    let (mut handler, analytics, recorder) = firebase();
    handler.dispatch("Firebase_init", EventBag::new()).unwrap();
    recorder.clear();
    (handler, analytics, recorder)
}

pub fn tune() -> (TuneHandler, RecordingTune, RecordingDiagnostics) {
    let tracker = RecordingTune::new();
    let recorder = RecordingDiagnostics::new();
    let mut handler = TuneHandler::new(tracker.factory(), Arc::new(recorder.clone()));
    handler.initialize();
    (handler, tracker, recorder)
}

pub fn ready_tune() -> (TuneHandler, RecordingTune, RecordingDiagnostics) {
    let (mut handler, tracker, recorder) = tune();
    handler
        .dispatch(
            "Tune_init",
            EventBag::new()
                .with("advertiserId", "adv-1")
                .with("conversionKey", "conv-1"),
        )
        .unwrap();
    recorder.clear();
    (handler, tracker, recorder)
}
