use serde::Serialize;

use super::Channel;
use crate::models::{Bid, Event, EventSpace, ReviewStatus, SpaceRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ContactForm,
    EventApproved,
    EventRejected,
    NewBid,
    BidDecision,
    VerificationCode,
    SpaceRequestReceived,
    SpaceRequestDecision,
    Custom,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ContactForm => "contact_form",
            NotificationKind::EventApproved => "event_approved",
            NotificationKind::EventRejected => "event_rejected",
            NotificationKind::NewBid => "new_bid",
            NotificationKind::BidDecision => "bid_decision",
            NotificationKind::VerificationCode => "verification_code",
            NotificationKind::SpaceRequestReceived => "space_request_received",
            NotificationKind::SpaceRequestDecision => "space_request_decision",
            NotificationKind::Custom => "custom",
        }
    }
}

/// A rendered message addressed to one recipient.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub channel: Channel,
    pub to: String,
    pub subject: Option<String>,
    pub body: String,
    pub reply_to: Option<String>,
}

impl Notification {
    fn email(kind: NotificationKind, to: &str, subject: String, body: String) -> Self {
        Self {
            kind,
            channel: Channel::Email,
            to: to.to_string(),
            subject: Some(subject),
            body,
            reply_to: None,
        }
    }

    pub fn custom(channel: Channel, to: &str, subject: Option<String>, body: String) -> Self {
        Self {
            kind: NotificationKind::Custom,
            channel,
            to: to.to_string(),
            subject,
            body,
            reply_to: None,
        }
    }

    pub fn contact_form(
        admin_email: &str,
        name: &str,
        email: &str,
        subject: Option<&str>,
        message: &str,
    ) -> Self {
        let subject = match subject {
            Some(s) => format!("Contact form: {}", s),
            None => format!("Contact form message from {}", name),
        };
        let body = format!("From: {} <{}>\n\n{}", name, email, message);
        let mut n = Self::email(NotificationKind::ContactForm, admin_email, subject, body);
        n.reply_to = Some(email.to_string());
        n
    }

    pub fn event_approved(event: &Event) -> Self {
        let subject = format!("Your event \"{}\" has been approved", event.title);
        let body = format!(
            "Hi {},\n\nGood news: \"{}\" ({}, starting {}) is now live and open for \
             sponsorship bids.",
            event.organizer_name, event.title, event.location, event.start_date
        );
        Self::email(
            NotificationKind::EventApproved,
            &event.organizer_email,
            subject,
            body,
        )
    }

    pub fn event_rejected(event: &Event) -> Self {
        let subject = format!("Update on your event \"{}\"", event.title);
        let mut body = format!(
            "Hi {},\n\nUnfortunately \"{}\" was not approved for listing.",
            event.organizer_name, event.title
        );
        if let Some(reason) = &event.rejection_reason {
            body.push_str(&format!("\n\nReason: {}", reason));
        }
        Self::email(
            NotificationKind::EventRejected,
            &event.organizer_email,
            subject,
            body,
        )
    }

    pub fn new_bid(admin_email: &str, event: &Event, bid: &Bid) -> Self {
        let subject = format!("New bid on \"{}\" from {}", event.title, bid.brand_name);
        let verified = if bid.phone_verified {
            "verified"
        } else {
            "not verified"
        };
        let mut body = format!(
            "Brand: {}\nContact: {} <{}>\nPhone: {} ({})\nAmount: AED {}",
            bid.brand_name, bid.contact_name, bid.email, bid.phone, verified, bid.amount
        );
        if let Some(message) = &bid.message {
            body.push_str(&format!("\n\n{}", message));
        }
        Self::email(NotificationKind::NewBid, admin_email, subject, body)
    }

    pub fn bid_decision(event: &Event, bid: &Bid) -> Self {
        let outcome = match bid.status {
            ReviewStatus::Approved => "accepted",
            ReviewStatus::Rejected => "declined",
            ReviewStatus::Pending => "updated",
        };
        let subject = format!("Your bid for \"{}\" was {}", event.title, outcome);
        let mut body = format!(
            "Hi {},\n\nYour AED {} sponsorship bid for \"{}\" was {}.",
            bid.contact_name, bid.amount, event.title, outcome
        );
        if let Some(response) = &bid.admin_response {
            body.push_str(&format!("\n\n{}", response));
        }
        Self::email(NotificationKind::BidDecision, &bid.email, subject, body)
    }

    pub fn verification_code(phone: &str, code: &str, ttl_minutes: i64) -> Self {
        Self {
            kind: NotificationKind::VerificationCode,
            channel: Channel::Sms,
            to: phone.to_string(),
            subject: None,
            body: format!(
                "Your verification code is {}. It expires in {} minutes.",
                code, ttl_minutes
            ),
            reply_to: None,
        }
    }

    pub fn space_request_received(
        admin_email: &str,
        space: &EventSpace,
        request: &SpaceRequest,
    ) -> Self {
        let subject = format!("New rental request for {}", space.name);
        let mut body = format!(
            "Requester: {} <{}>\nDate: {}\nGuests: {}",
            request.requester_name, request.requester_email, request.event_date, request.guest_count
        );
        if let Some(message) = &request.message {
            body.push_str(&format!("\n\n{}", message));
        }
        let mut n = Self::email(
            NotificationKind::SpaceRequestReceived,
            admin_email,
            subject,
            body,
        );
        n.reply_to = Some(request.requester_email.clone());
        n
    }

    pub fn space_request_decision(space: &EventSpace, request: &SpaceRequest) -> Self {
        let outcome = match request.status {
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "declined",
            ReviewStatus::Pending => "updated",
        };
        let subject = format!("Your request for {} was {}", space.name, outcome);
        let mut body = format!(
            "Hi {},\n\nYour request to rent {} on {} was {}.",
            request.requester_name, space.name, request.event_date, outcome
        );
        if let Some(response) = &request.admin_response {
            body.push_str(&format!("\n\n{}", response));
        }
        Self::email(
            NotificationKind::SpaceRequestDecision,
            &request.requester_email,
            subject,
            body,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_code_goes_by_sms() {
        let n = Notification::verification_code("+971501234567", "042137", 10);
        assert_eq!(n.channel, Channel::Sms);
        assert_eq!(n.to, "+971501234567");
        assert!(n.body.contains("042137"));
        assert!(n.subject.is_none());
    }

    #[test]
    fn test_contact_form_sets_reply_to() {
        let n = Notification::contact_form(
            "admin@example.com",
            "Layla",
            "layla@example.com",
            None,
            "Do you cover Sharjah?",
        );
        assert_eq!(n.to, "admin@example.com");
        assert_eq!(n.reply_to.as_deref(), Some("layla@example.com"));
        assert_eq!(
            n.subject.as_deref(),
            Some("Contact form message from Layla")
        );
    }
}
