use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::models::{Bid, BidDraft, BidSubmission, Event, NewBid, ReviewDecision};
use crate::notify::{self, Notification, Notifier};
use crate::store::Store;
use crate::utils::otp::{self, OneTimeCode};
use crate::utils::validation;
use crate::utils::{AppError, AppResult};

const MAX_NAME_LEN: usize = 120;
const MAX_MESSAGE_LEN: usize = 2000;
/// Wrong guesses allowed per issued code before it is discarded.
pub const MAX_VERIFICATION_ATTEMPTS: i32 = 5;

/// Sponsorship bid workflow: submission, phone verification, admin decisions.
pub struct BidService {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    admin_email: String,
    otp_ttl: Duration,
}

impl BidService {
    pub fn new(
        store: Arc<dyn Store>,
        notifier: Arc<dyn Notifier>,
        admin_email: String,
        otp_ttl: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            admin_email,
            otp_ttl,
        }
    }

    /// Submit a bid against an approved event.
    ///
    /// When the event requires phone verification the bid is stored unverified
    /// and a code is sent instead of the new-bid notification. The bid is
    /// already stored at that point, so a failed code delivery is only logged
    /// and the caller resends through `send_verification_code`.
    pub async fn submit_bid(&self, event_id: Uuid, input: NewBid) -> AppResult<BidSubmission> {
        let draft = validate(event_id, input)?;

        let event = self.load_event(event_id).await?;
        if !event.is_open_for_bids() {
            return Err(AppError::ValidationError(
                "This event is not accepting bids".to_string(),
            ));
        }
        if !event.accepts_amount(draft.amount) {
            return Err(AppError::ValidationError(range_message(&event)));
        }

        if self
            .store
            .find_duplicate_bid(event_id, &draft.email, &draft.phone)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You have already submitted a bid for this event with this email and phone number"
                    .to_string(),
            ));
        }

        let bid = self.store.insert_bid(draft).await?;
        info!(bid_id = %bid.id, event_id = %event_id, amount = %bid.amount, "Bid submitted");

        if event.requires_phone_verification {
            let (bid, sms) = self.issue_code(&bid).await?;
            if notify::dispatch(self.notifier.as_ref(), sms).await {
                info!(bid_id = %bid.id, "Verification code sent");
            }
            return Ok(BidSubmission {
                bid,
                verification_required: true,
            });
        }

        notify::dispatch(
            self.notifier.as_ref(),
            Notification::new_bid(&self.admin_email, &event, &bid),
        )
        .await;

        Ok(BidSubmission {
            bid,
            verification_required: false,
        })
    }

    /// Issue a fresh code for an unverified bid, replacing any outstanding one.
    pub async fn send_verification_code(&self, bid_id: Uuid) -> AppResult<Bid> {
        let bid = self.load_bid(bid_id).await?;
        if bid.phone_verified {
            return Err(AppError::ValidationError(
                "Phone number is already verified".to_string(),
            ));
        }
        let (bid, sms) = self.issue_code(&bid).await?;
        self.notifier.send(&sms).await?;
        info!(bid_id = %bid.id, "Verification code sent");
        Ok(bid)
    }

    /// Check `code` against the bid's outstanding code.
    ///
    /// A missing or expired code leaves the bid untouched. A wrong code counts
    /// against [`MAX_VERIFICATION_ATTEMPTS`]; at the limit the code is discarded
    /// and a new one must be requested. Verifying an already verified bid
    /// succeeds without notifying again.
    pub async fn verify_phone(&self, bid_id: Uuid, code: &str) -> AppResult<Bid> {
        let bid = self.load_bid(bid_id).await?;
        if bid.phone_verified {
            return Ok(bid);
        }

        let (expected, expires_at) = match (&bid.verification_code, bid.verification_expires_at) {
            (Some(stored), Some(expires_at)) => (stored, expires_at),
            _ if bid.verification_attempts >= MAX_VERIFICATION_ATTEMPTS => {
                return Err(too_many_attempts());
            }
            _ => {
                return Err(AppError::VerificationFailed(
                    "No verification code has been sent for this bid".to_string(),
                ))
            }
        };

        if Utc::now() > expires_at {
            return Err(AppError::VerificationFailed(
                "Verification code has expired, request a new one".to_string(),
            ));
        }
        if !otp::codes_match(expected, code) {
            let attempts = self
                .store
                .record_failed_attempt(bid_id, MAX_VERIFICATION_ATTEMPTS)
                .await?
                .map_or(MAX_VERIFICATION_ATTEMPTS, |b| b.verification_attempts);
            info!(bid_id = %bid_id, attempts, "Incorrect verification code");
            if attempts >= MAX_VERIFICATION_ATTEMPTS {
                return Err(too_many_attempts());
            }
            return Err(AppError::VerificationFailed(
                "Invalid verification code".to_string(),
            ));
        }

        // Only the request that flips the flag notifies.
        let bid = match self.store.mark_phone_verified(bid_id, expected).await? {
            Some(bid) => bid,
            None => {
                let current = self.load_bid(bid_id).await?;
                if current.phone_verified {
                    return Ok(current);
                }
                return Err(AppError::VerificationFailed(
                    "Verification code is no longer valid, request a new one".to_string(),
                ));
            }
        };
        info!(bid_id = %bid_id, "Phone number verified");

        let event = self.load_event(bid.event_id).await?;
        notify::dispatch(
            self.notifier.as_ref(),
            Notification::new_bid(&self.admin_email, &event, &bid),
        )
        .await;

        Ok(bid)
    }

    pub async fn respond_to_bid(&self, bid_id: Uuid, decision: ReviewDecision) -> AppResult<Bid> {
        if !decision.status.is_decision() {
            return Err(AppError::ValidationError(
                "Status must be approved or rejected".to_string(),
            ));
        }
        let admin_response = validation::optional(
            "admin_response",
            decision.admin_response.as_deref(),
            MAX_MESSAGE_LEN,
        )?;

        let bid = self
            .store
            .update_bid_status(bid_id, decision.status, admin_response)
            .await?
            .ok_or_else(|| bid_not_found(bid_id))?;
        info!(bid_id = %bid_id, status = %bid.status, "Bid reviewed");

        let event = self.load_event(bid.event_id).await?;
        notify::dispatch(self.notifier.as_ref(), Notification::bid_decision(&event, &bid)).await;

        Ok(bid)
    }

    pub async fn list_bids(&self, event_id: Uuid) -> AppResult<Vec<Bid>> {
        self.load_event(event_id).await?;
        self.store.list_bids_for_event(event_id).await
    }

    /// Store a fresh code and build the SMS carrying it. Delivery is left to
    /// the caller.
    async fn issue_code(&self, bid: &Bid) -> AppResult<(Bid, Notification)> {
        let otp = OneTimeCode::issue(self.otp_ttl);
        let bid = self
            .store
            .set_verification_code(bid.id, &otp.code, otp.expires_at)
            .await?
            .ok_or_else(|| bid_not_found(bid.id))?;

        let sms =
            Notification::verification_code(&bid.phone, &otp.code, self.otp_ttl.num_minutes());
        Ok((bid, sms))
    }

    async fn load_event(&self, event_id: Uuid) -> AppResult<Event> {
        self.store
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' was not found", event_id)))
    }

    async fn load_bid(&self, bid_id: Uuid) -> AppResult<Bid> {
        self.store
            .get_bid(bid_id)
            .await?
            .ok_or_else(|| bid_not_found(bid_id))
    }
}

fn bid_not_found(bid_id: Uuid) -> AppError {
    AppError::NotFound(format!("Bid '{}' was not found", bid_id))
}

fn too_many_attempts() -> AppError {
    AppError::VerificationFailed("Too many incorrect attempts, request a new code".to_string())
}

fn range_message(event: &Event) -> String {
    match (event.min_bid, event.max_bid) {
        (Some(min), Some(max)) => format!("Bid amount must be between AED {} and AED {}", min, max),
        (Some(min), None) => format!("Bid amount must be at least AED {}", min),
        (None, Some(max)) => format!("Bid amount must be at most AED {}", max),
        (None, None) => "Bid amount is out of range".to_string(),
    }
}

fn validate(event_id: Uuid, input: NewBid) -> AppResult<BidDraft> {
    Ok(BidDraft {
        event_id,
        brand_name: validation::required("brand_name", &input.brand_name, MAX_NAME_LEN)?,
        contact_name: validation::required("contact_name", &input.contact_name, MAX_NAME_LEN)?,
        email: validation::normalize_email(&input.email)?,
        phone: validation::normalize_phone(&input.phone)?,
        amount: validation::positive_amount("amount", input.amount)?,
        message: validation::optional("message", input.message.as_deref(), MAX_MESSAGE_LEN)?,
    })
}
