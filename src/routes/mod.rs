mod fun_facts;
mod health_check;
mod newsletters;
mod subscriptions;
mod subscriptions_invite;
mod webhooks;

pub use fun_facts::*;
pub use health_check::*;
pub use newsletters::*;
pub use subscriptions::*;
pub use subscriptions_invite::*;
pub use webhooks::*;

/// `{ success, message }` body shared by the invite and webhook endpoints.
#[derive(Debug, serde::Serialize)]
pub struct StatusBody {
    pub success: bool,
    pub message: String,
}

impl StatusBody {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
