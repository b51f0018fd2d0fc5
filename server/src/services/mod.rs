pub mod bid_service;
pub mod contact_service;
pub mod event_service;
pub mod space_service;

pub use bid_service::BidService;
pub use contact_service::ContactService;
pub use event_service::EventService;
pub use space_service::SpaceService;
