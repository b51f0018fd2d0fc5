use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::models::{Event, NewEvent, ReviewStatus};
use crate::notify::{self, Notification, Notifier};
use crate::store::Store;
use crate::utils::validation;
use crate::utils::{AppError, AppResult};

const MAX_TITLE_LEN: usize = 200;
const MAX_TEXT_LEN: usize = 5000;

/// Organizer submissions and admin moderation of events.
pub struct EventService {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
}

impl EventService {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn submit_event(&self, input: NewEvent) -> AppResult<Event> {
        let event = self.store.insert_event(validate(input)?).await?;
        info!(event_id = %event.id, title = %event.title, "Event submitted for review");
        Ok(event)
    }

    pub async fn get_event(&self, id: Uuid) -> AppResult<Event> {
        self.store
            .get_event(id)
            .await?
            .ok_or_else(|| event_not_found(id))
    }

    /// Public listing: approved events only.
    pub async fn list_approved_events(&self) -> AppResult<Vec<Event>> {
        self.store.list_events(Some(ReviewStatus::Approved)).await
    }

    pub async fn list_events(&self, status: Option<ReviewStatus>) -> AppResult<Vec<Event>> {
        self.store.list_events(status).await
    }

    pub async fn approve_event(&self, id: Uuid) -> AppResult<Event> {
        let event = self
            .store
            .update_event_status(id, ReviewStatus::Approved, None)
            .await?
            .ok_or_else(|| event_not_found(id))?;
        info!(event_id = %id, "Event approved");

        notify::dispatch(self.notifier.as_ref(), Notification::event_approved(&event)).await;
        Ok(event)
    }

    pub async fn reject_event(&self, id: Uuid, reason: Option<String>) -> AppResult<Event> {
        let reason = validation::optional("reason", reason.as_deref(), MAX_TEXT_LEN)?;
        let event = self
            .store
            .update_event_status(id, ReviewStatus::Rejected, reason)
            .await?
            .ok_or_else(|| event_not_found(id))?;
        info!(event_id = %id, "Event rejected");

        notify::dispatch(self.notifier.as_ref(), Notification::event_rejected(&event)).await;
        Ok(event)
    }

    /// Re-send the organizer mail matching the event's current decision.
    ///
    /// Fails when the event is not in `expected` state or the gateway refuses.
    pub async fn send_decision_email(&self, id: Uuid, expected: ReviewStatus) -> AppResult<Event> {
        let event = self.get_event(id).await?;
        let notification = match (expected, event.status) {
            (ReviewStatus::Approved, ReviewStatus::Approved) => Notification::event_approved(&event),
            (ReviewStatus::Rejected, ReviewStatus::Rejected) => Notification::event_rejected(&event),
            _ => {
                return Err(AppError::ValidationError(format!(
                    "Event is {}, not {}",
                    event.status, expected
                )))
            }
        };

        self.notifier.send(&notification).await?;
        info!(event_id = %id, status = %event.status, "Decision email sent");
        Ok(event)
    }
}

fn event_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Event '{}' was not found", id))
}

fn validate(input: NewEvent) -> AppResult<NewEvent> {
    if let Some(end) = input.end_date {
        if end < input.start_date {
            return Err(AppError::ValidationError(
                "end_date must not be before start_date".to_string(),
            ));
        }
    }

    let min_bid = input
        .min_bid
        .map(|v| validation::positive_amount("min_bid", v))
        .transpose()?;
    let max_bid = input
        .max_bid
        .map(|v| validation::positive_amount("max_bid", v))
        .transpose()?;
    if let (Some(min), Some(max)) = (min_bid, max_bid) {
        if min > max {
            return Err(AppError::ValidationError(
                "min_bid must not exceed max_bid".to_string(),
            ));
        }
    }

    let organizer_phone = match input.organizer_phone.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(phone) => Some(validation::normalize_phone(phone)?),
    };

    Ok(NewEvent {
        title: validation::required("title", &input.title, MAX_TITLE_LEN)?,
        description: validation::optional("description", input.description.as_deref(), MAX_TEXT_LEN)?,
        location: validation::required("location", &input.location, MAX_TITLE_LEN)?,
        start_date: input.start_date,
        end_date: input.end_date,
        min_bid,
        max_bid,
        organizer_name: validation::required("organizer_name", &input.organizer_name, MAX_TITLE_LEN)?,
        organizer_email: validation::normalize_email(&input.organizer_email)?,
        organizer_phone,
        requires_phone_verification: input.requires_phone_verification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationKind, RecordingNotifier};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn new_event() -> NewEvent {
        NewEvent {
            title: "  Dubai Fitness Challenge  ".into(),
            description: Some("".into()),
            location: "Dubai".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 11, 30),
            min_bid: Some(Decimal::from(2000)),
            max_bid: Some(Decimal::from(20000)),
            organizer_name: "Fit UAE".into(),
            organizer_email: "Events@FitUAE.ae".into(),
            organizer_phone: Some("+971 4 123 4567".into()),
            requires_phone_verification: true,
        }
    }

    fn service() -> (EventService, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let service = EventService::new(Arc::new(MemoryStore::new()), notifier.clone());
        (service, notifier)
    }

    #[tokio::test]
    async fn test_submitted_events_are_pending_and_normalized() {
        let (service, _) = service();
        let event = service.submit_event(new_event()).await.unwrap();

        assert_eq!(event.status, ReviewStatus::Pending);
        assert_eq!(event.title, "Dubai Fitness Challenge");
        assert_eq!(event.organizer_email, "events@fituae.ae");
        assert_eq!(event.organizer_phone.as_deref(), Some("+97141234567"));
        assert!(event.description.is_none());
        assert!(service.list_approved_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_ranges_are_rejected() {
        let (service, _) = service();

        let mut inverted = new_event();
        inverted.min_bid = Some(Decimal::from(50000));
        assert!(service.submit_event(inverted).await.is_err());

        let mut backwards = new_event();
        backwards.end_date = NaiveDate::from_ymd_opt(2026, 10, 1);
        assert!(service.submit_event(backwards).await.is_err());
    }

    #[tokio::test]
    async fn test_approve_and_reject_notify_organizer() {
        let (service, notifier) = service();
        let first = service.submit_event(new_event()).await.unwrap();
        let second = service.submit_event(new_event()).await.unwrap();

        service.approve_event(first.id).await.unwrap();
        let rejected = service
            .reject_event(second.id, Some("Missing venue permit".into()))
            .await
            .unwrap();

        assert_eq!(rejected.rejection_reason.as_deref(), Some("Missing venue permit"));
        assert_eq!(notifier.count_kind(NotificationKind::EventApproved), 1);
        let mail = notifier.last_of(NotificationKind::EventRejected).unwrap();
        assert_eq!(mail.to, "events@fituae.ae");
        assert!(mail.body.contains("Missing venue permit"));

        let approved = service.list_approved_events().await.unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, first.id);
    }

    #[tokio::test]
    async fn test_decision_email_requires_matching_status() {
        let (service, notifier) = service();
        let event = service.submit_event(new_event()).await.unwrap();

        let err = service
            .send_decision_email(event.id, ReviewStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        service.approve_event(event.id).await.unwrap();
        service
            .send_decision_email(event.id, ReviewStatus::Approved)
            .await
            .unwrap();
        assert_eq!(notifier.count_kind(NotificationKind::EventApproved), 2);
    }

    #[tokio::test]
    async fn test_missing_event() {
        let (service, _) = service();
        let err = service.approve_event(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
