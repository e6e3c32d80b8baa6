pub mod inbound_event;
pub mod new_subscriber;
pub mod phone_number;
pub mod subscriber;
pub mod subscriber_name;
pub mod variant;
