use std::sync::Arc;

use tracing::info;

use crate::models::ContactForm;
use crate::notify::{Notification, Notifier};
use crate::utils::validation;
use crate::utils::AppResult;

const MAX_NAME_LEN: usize = 120;
const MAX_SUBJECT_LEN: usize = 200;
const MAX_MESSAGE_LEN: usize = 5000;

pub struct ContactService {
    notifier: Arc<dyn Notifier>,
    admin_email: String,
}

impl ContactService {
    pub fn new(notifier: Arc<dyn Notifier>, admin_email: String) -> Self {
        Self {
            notifier,
            admin_email,
        }
    }

    /// Forwards a visitor message to the admin mailbox.
    pub async fn send_contact_form(&self, form: ContactForm) -> AppResult<()> {
        let name = validation::required("name", &form.name, MAX_NAME_LEN)?;
        let email = validation::normalize_email(&form.email)?;
        let subject = validation::optional("subject", form.subject.as_deref(), MAX_SUBJECT_LEN)?;
        let message = validation::required("message", &form.message, MAX_MESSAGE_LEN)?;

        self.notifier
            .send(&Notification::contact_form(
                &self.admin_email,
                &name,
                &email,
                subject.as_deref(),
                &message,
            ))
            .await?;
        info!(from = %email, "Contact form forwarded");
        Ok(())
    }
}
