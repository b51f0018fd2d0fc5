pub mod bid;
pub mod contact;
pub mod event;
pub mod space;
pub mod status;

pub use bid::{Bid, BidDraft, BidSubmission, NewBid, ReviewDecision};
pub use contact::ContactForm;
pub use event::{Event, NewEvent};
pub use space::{EventSpace, NewEventSpace, NewSpaceRequest, SpaceRequest};
pub use status::ReviewStatus;
