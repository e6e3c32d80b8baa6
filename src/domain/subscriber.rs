use chrono::{DateTime, Utc};

use crate::domain::phone_number::PhoneNumber;
use crate::domain::subscriber_name::SubscriberName;

/// A persisted subscriber. `name` is absent for records created implicitly by
/// a webhook upsert.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Subscriber {
    pub phone_number: PhoneNumber,
    pub name: Option<SubscriberName>,
    pub subscribed: bool,
    pub created_at: DateTime<Utc>,
}
