//! Backend adapters
//!
//! One handler per analytics backend. Each owns a backend handle behind
//! a trait so hosts plug in the real SDK and tests plug in recorders.

mod accengage;
pub mod dry_run;
mod firebase;
mod tune;

pub use accengage::{
    AccengageHandler, AccengageSettings, AccengageTracker, Cart, DeviceInfo, Lead, Purchase,
    ACC_INIT, ACC_INTENT, ACC_TAG_ADD_TO_CART, ACC_TAG_EVENT, ACC_TAG_LEAD, ACC_TAG_PURCHASE,
    ACC_TAG_VIEW, ACC_UPDATE_DEVICE_INFO, DEFAULT_DATE_FORMAT, DEFAULT_MIN_EVENT_ID,
    DEVICE_INFO_DATE, DEVICE_INFO_KEY, DEVICE_INFO_VALUE, INTENT, ITEM, LEAD_LABEL, LEAD_VALUE,
    PARAMETERS, PARTNER_ID, PRIVATE_KEY,
};
pub use firebase::{
    EventParams, FirebaseAnalytics, FirebaseHandler, ParamValue, APP_OPEN, ENABLE_COLLECTION,
    FIREBASE_IDENTIFY, FIREBASE_INIT, FIREBASE_TAG_EVENT,
};
pub use tune::{
    TuneHandler, TuneTracker, ADVERTISER_ID, CONVERSION_KEY, PURCHASE_EVENT, TUNE_INIT,
    TUNE_PURCHASE,
};
