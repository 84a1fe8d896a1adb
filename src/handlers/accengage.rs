//! AccengageHandler — push-notification analytics adapter
//!
//! Translates `ACC_*` pushes into Accengage tracker calls: custom events,
//! leads, carts, purchases, device profile updates and screen views.
//! The tracker only accepts pushes once `ACC_init` has supplied the
//! partner id and private key.

use crate::bag::{EventBag, Handle};
use crate::extract::{get, get_date, get_double, get_list, get_long, get_string, required};
use crate::handler::{backend, BackendFactory, DiagnosticSink, HandlerCore, TagError, TagHandler};
use crate::models::event::{EVENT_ID, EVENT_NAME};
use crate::models::screen::SCREEN_NAME;
use crate::models::transaction::{
    TRANSACTION_CURRENCY_CODE, TRANSACTION_ID, TRANSACTION_PRODUCTS, TRANSACTION_TOTAL,
};
use crate::models::LineItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

pub const ACC_INIT: &str = "ACC_init";
pub const ACC_INTENT: &str = "ACC_intent";
pub const ACC_TAG_EVENT: &str = "ACC_tagEvent";
pub const ACC_TAG_LEAD: &str = "ACC_tagLead";
pub const ACC_TAG_ADD_TO_CART: &str = "ACC_tagAddToCart";
pub const ACC_TAG_PURCHASE: &str = "ACC_tagPurchase";
pub const ACC_UPDATE_DEVICE_INFO: &str = "ACC_updateDeviceInfo";
pub const ACC_TAG_VIEW: &str = "ACC_tagView";

const FUNCTIONS: &[&str] = &[
    ACC_INIT,
    ACC_INTENT,
    ACC_TAG_EVENT,
    ACC_TAG_LEAD,
    ACC_TAG_ADD_TO_CART,
    ACC_TAG_PURCHASE,
    ACC_UPDATE_DEVICE_INFO,
    ACC_TAG_VIEW,
];

pub const PRIVATE_KEY: &str = "privateKey";
pub const PARTNER_ID: &str = "partnerId";
pub const INTENT: &str = "intent";
pub const LEAD_LABEL: &str = "leadLabel";
pub const LEAD_VALUE: &str = "leadValue";
pub const ITEM: &str = "item";
pub const DEVICE_INFO_KEY: &str = "deviceInfoKey";
pub const DEVICE_INFO_VALUE: &str = "deviceInfoValue";
pub const DEVICE_INFO_DATE: &str = "deviceInfoDate";
/// Name under which the serialized extra parameters of a custom event are reported
pub const PARAMETERS: &str = "parameters";

/// Custom event ids below this value are reserved by Accengage.
pub const DEFAULT_MIN_EVENT_ID: i64 = 1000;
/// Device profile values are strings; dates are rendered with this pattern.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// A custom lead: a label and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub label: String,
    pub value: String,
}

/// An add-to-cart report.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub id: String,
    pub item: LineItem,
}

/// A purchase report. `items` is `None` for the simple purchase shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub id: String,
    pub currency_code: String,
    pub total: f64,
    pub items: Option<Vec<LineItem>>,
}

/// Device profile update: string keys to string values.
pub type DeviceInfo = BTreeMap<String, String>;

/// The calls the adapter makes on the Accengage SDK.
pub trait AccengageTracker: Send {
    fn set_intent(&mut self, intent: &Handle);

    fn track_event(&mut self, event_id: i64, event_name: &str);

    /// Custom event with `"key: value"` parameters
    fn track_event_with_params(&mut self, event_id: i64, event_name: &str, params: &[String]);

    fn track_lead(&mut self, lead: Lead);

    fn track_add_to_cart(&mut self, cart: Cart);

    fn track_purchase(&mut self, purchase: Purchase);

    fn update_device_info(&mut self, info: DeviceInfo);

    fn set_view(&mut self, screen_name: &str);

    fn start_activity(&mut self, activity: &Handle);

    fn stop_activity(&mut self, activity: &Handle);
}

/// Tunables for the Accengage adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccengageSettings {
    /// Smallest accepted custom event id
    pub min_event_id: i64,
    /// strftime pattern for `deviceInfoDate` values
    pub device_info_date_format: String,
}

impl Default for AccengageSettings {
    fn default() -> Self {
        Self {
            min_event_id: DEFAULT_MIN_EVENT_ID,
            device_info_date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Credentials {
    partner_id: String,
    private_key: String,
}

/// Adapter between tag pushes and the Accengage tracker.
pub struct AccengageHandler {
    core: HandlerCore,
    settings: AccengageSettings,
    factory: BackendFactory<dyn AccengageTracker>,
    tracker: Option<Box<dyn AccengageTracker>>,
    credentials: Option<Credentials>,
}

impl AccengageHandler {
    pub fn new(
        factory: impl FnMut() -> Option<Box<dyn AccengageTracker>> + Send + 'static,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            core: HandlerCore::new("ACC", "Accengage", diagnostics),
            settings: AccengageSettings::default(),
            factory: Box::new(factory),
            tracker: None,
            credentials: None,
        }
    }

    pub fn with_settings(mut self, settings: AccengageSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &AccengageSettings {
        &self.settings
    }

    /// The partner id, for the SDK's credential lookup.
    pub fn partner_id(&self) -> Option<&str> {
        let partner_id = self.credentials.as_ref().map(|c| c.partner_id.as_str());
        if let Some(id) = partner_id {
            self.core.accepted(PARTNER_ID, id);
        }
        partner_id
    }

    /// The private key, for the SDK's credential lookup.
    pub fn private_key(&self) -> Option<&str> {
        let private_key = self.credentials.as_ref().map(|c| c.private_key.as_str());
        if let Some(key) = private_key {
            self.core.accepted(PRIVATE_KEY, key);
        }
        private_key
    }

    fn set_intent(&mut self, bag: &EventBag) -> Result<(), TagError> {
        let intent: Handle =
            get(bag, INTENT).ok_or_else(|| TagError::missing(ACC_INTENT, &[INTENT]))?;

        backend(&mut self.tracker)?.set_intent(&intent);
        self.core.accepted(INTENT, intent);
        Ok(())
    }

    /// Custom event. Every key besides the id and name is forwarded as a
    /// `"key: value"` string, in push order.
    fn tag_event(&mut self, bag: &mut EventBag) -> Result<(), TagError> {
        let event_id = get_long(bag, EVENT_ID, 0);
        if event_id < self.settings.min_event_id {
            return Err(TagError::missing(ACC_TAG_EVENT, &[EVENT_ID]));
        }
        let event_name = get_string(bag, EVENT_NAME)
            .ok_or_else(|| TagError::missing(ACC_TAG_EVENT, &[EVENT_NAME]))?;

        bag.remove(EVENT_ID);
        bag.remove(EVENT_NAME);
        let parameters: Vec<String> = bag
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();

        let tracker = backend(&mut self.tracker)?;
        if parameters.is_empty() {
            tracker.track_event(event_id, &event_name);
        } else {
            tracker.track_event_with_params(event_id, &event_name, &parameters);
        }

        self.core.accepted(EVENT_ID, event_id);
        self.core.accepted(EVENT_NAME, event_name);
        if !parameters.is_empty() {
            self.core.accepted(PARAMETERS, parameters);
        }
        Ok(())
    }

    fn tag_view(&mut self, bag: &EventBag) -> Result<(), TagError> {
        let screen_name = get_string(bag, SCREEN_NAME)
            .ok_or_else(|| TagError::missing(ACC_TAG_VIEW, &[SCREEN_NAME]))?;

        backend(&mut self.tracker)?.set_view(&screen_name);
        self.core.accepted(SCREEN_NAME, screen_name);
        Ok(())
    }

    fn tag_lead(&mut self, bag: &EventBag) -> Result<(), TagError> {
        let mut missing = Vec::new();
        let label: Option<String> = required(bag, LEAD_LABEL, &mut missing);
        let value: Option<String> = required(bag, LEAD_VALUE, &mut missing);
        let (Some(label), Some(value)) = (label, value) else {
            return Err(TagError::missing(ACC_TAG_LEAD, &missing));
        };

        backend(&mut self.tracker)?.track_lead(Lead {
            label: label.clone(),
            value: value.clone(),
        });
        self.core.accepted(LEAD_LABEL, label);
        self.core.accepted(LEAD_VALUE, value);
        Ok(())
    }

    /// Add to cart. An `item` that is not a line item counts as missing.
    fn tag_add_to_cart(&mut self, bag: &EventBag) -> Result<(), TagError> {
        let mut missing = Vec::new();
        let cart_id: Option<String> = required(bag, TRANSACTION_ID, &mut missing);
        let item: Option<LineItem> = required(bag, ITEM, &mut missing);
        let (Some(cart_id), Some(item)) = (cart_id, item) else {
            return Err(TagError::missing(ACC_TAG_ADD_TO_CART, &missing));
        };

        let described = item.to_string();
        backend(&mut self.tracker)?.track_add_to_cart(Cart {
            id: cart_id.clone(),
            item,
        });
        self.core.accepted(TRANSACTION_ID, cart_id);
        self.core.accepted(ITEM, described);
        Ok(())
    }

    /// Purchase. A products list that does not decode as line items (or is
    /// empty) is dropped and the simple purchase shape is sent instead.
    fn tag_purchase(&mut self, bag: &EventBag) -> Result<(), TagError> {
        let mut missing = Vec::new();
        let id: Option<String> = required(bag, TRANSACTION_ID, &mut missing);
        let currency_code: Option<String> = required(bag, TRANSACTION_CURRENCY_CODE, &mut missing);
        let total = Some(get_double(bag, TRANSACTION_TOTAL, -1.0)).filter(|total| *total >= 0.0);
        if total.is_none() {
            missing.push(TRANSACTION_TOTAL);
        }
        let (Some(id), Some(currency_code), Some(total)) = (id, currency_code, total) else {
            return Err(TagError::missing(ACC_TAG_PURCHASE, &missing));
        };

        let items = get_list::<LineItem>(bag, TRANSACTION_PRODUCTS).filter(|items| !items.is_empty());
        let described: Option<Vec<String>> = items
            .as_ref()
            .map(|items| items.iter().map(LineItem::to_string).collect());

        backend(&mut self.tracker)?.track_purchase(Purchase {
            id: id.clone(),
            currency_code: currency_code.clone(),
            total,
            items,
        });
        self.core.accepted(TRANSACTION_ID, id);
        self.core.accepted(TRANSACTION_CURRENCY_CODE, currency_code);
        self.core.accepted(TRANSACTION_TOTAL, total);
        if let Some(described) = described {
            self.core.accepted(TRANSACTION_PRODUCTS, described);
        }
        Ok(())
    }

    /// Device profile update. The value wins over the date when both are set.
    fn update_device_info(&mut self, bag: &EventBag) -> Result<(), TagError> {
        let key = get_string(bag, DEVICE_INFO_KEY)
            .ok_or_else(|| TagError::missing(ACC_UPDATE_DEVICE_INFO, &[DEVICE_INFO_KEY]))?;

        let (param, value) = if let Some(value) = get_string(bag, DEVICE_INFO_VALUE) {
            (DEVICE_INFO_VALUE, value)
        } else if let Some(date) = get_date(bag, DEVICE_INFO_DATE) {
            let mut formatted = String::new();
            if write!(formatted, "{}", date.format(&self.settings.device_info_date_format)).is_err() {
                formatted = date.format(DEFAULT_DATE_FORMAT).to_string();
            }
            (DEVICE_INFO_DATE, formatted)
        } else {
            return Err(TagError::missing(
                ACC_UPDATE_DEVICE_INFO,
                &[DEVICE_INFO_VALUE, DEVICE_INFO_DATE],
            ));
        };

        let mut info = DeviceInfo::new();
        info.insert(key.clone(), value.clone());
        backend(&mut self.tracker)?.update_device_info(info);
        self.core.accepted(DEVICE_INFO_KEY, key);
        self.core.accepted(param, value);
        Ok(())
    }
}

impl TagHandler for AccengageHandler {
    fn core(&self) -> &HandlerCore {
        &self.core
    }

    fn init_function(&self) -> &'static str {
        ACC_INIT
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

    /// Store the credentials. A re-init replaces them only when both are
    /// present; otherwise the previous ones stay in place.
    fn init(&mut self, bag: &mut EventBag) -> Result<(), TagError> {
        let mut missing = Vec::new();
        let private_key: Option<String> = required(bag, PRIVATE_KEY, &mut missing);
        let partner_id: Option<String> = required(bag, PARTNER_ID, &mut missing);
        let (Some(private_key), Some(partner_id)) = (private_key, partner_id) else {
            return Err(TagError::missing(ACC_INIT, &missing));
        };
        backend(&mut self.tracker)?;

        self.credentials = Some(Credentials {
            partner_id,
            private_key,
        });
        self.core.mark_ready();
        Ok(())
    }

    fn execute(&mut self, function: &str, bag: &mut EventBag) -> Result<(), TagError> {
        match function {
            ACC_INTENT => self.set_intent(bag),
            ACC_TAG_EVENT => self.tag_event(bag),
            ACC_TAG_LEAD => self.tag_lead(bag),
            ACC_TAG_ADD_TO_CART => self.tag_add_to_cart(bag),
            ACC_TAG_PURCHASE => self.tag_purchase(bag),
            ACC_UPDATE_DEVICE_INFO => self.update_device_info(bag),
            ACC_TAG_VIEW => self.tag_view(bag),
            other => Err(TagError::UnknownFunction(other.to_string())),
        }
    }

    /// Session measurement starts when an activity comes to the foreground.
    fn on_activity_resumed(&mut self, activity: &Handle) {
        if let Some(tracker) = self.tracker.as_deref_mut() {
            tracker.start_activity(activity);
        }
    }

    fn on_activity_paused(&mut self, activity: &Handle) {
        if let Some(tracker) = self.tracker.as_deref_mut() {
            tracker.stop_activity(activity);
        }
    }
}

impl std::fmt::Debug for AccengageHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccengageHandler")
            .field("core", &self.core)
            .field("settings", &self.settings)
            .field("has_tracker", &self.tracker.is_some())
            .finish_non_exhaustive()
    }
}
