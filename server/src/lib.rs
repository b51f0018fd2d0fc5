//! Sponsorship marketplace API: events, sponsor bids with phone verification,
//! and venue rental requests.

pub mod config;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

pub use config::Config;
pub use utils::{AppError, AppResult};

use notify::{HttpNotifier, LogNotifier, Notifier};
use services::{BidService, ContactService, EventService, SpaceService};
use store::Store;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notifier: Arc<dyn Notifier>,
    pub bids: Arc<BidService>,
    pub events: Arc<EventService>,
    pub spaces: Arc<SpaceService>,
    pub contact: Arc<ContactService>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>, notifier: Arc<dyn Notifier>) -> Self {
        let admin_email = config.admin_email.clone();

        Self {
            bids: Arc::new(BidService::new(
                store.clone(),
                notifier.clone(),
                admin_email.clone(),
                config.otp_ttl(),
            )),
            events: Arc::new(EventService::new(store.clone(), notifier.clone())),
            spaces: Arc::new(SpaceService::new(
                store,
                notifier.clone(),
                admin_email.clone(),
            )),
            contact: Arc::new(ContactService::new(notifier.clone(), admin_email)),
            notifier,
            config: Arc::new(config),
        }
    }
}

/// Picks the HTTP gateway when one is configured, the log otherwise.
pub fn notifier_from_config(config: &Config) -> AppResult<Arc<dyn Notifier>> {
    if !config.has_notification_gateway() {
        tracing::warn!("No notification gateway configured, notifications will only be logged");
        return Ok(Arc::new(LogNotifier));
    }

    let notifier = HttpNotifier::new(
        config.notify_email_url.clone(),
        config.notify_sms_url.clone(),
        config.notify_api_key.clone(),
    )?;
    Ok(Arc::new(notifier))
}
