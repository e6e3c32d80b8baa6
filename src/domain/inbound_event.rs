use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadCode {
    ArxivRequest,
    OptIn,
    OptOut,
    Unrecognized(String),
}

impl PayloadCode {
    pub fn parse(payload: &str) -> PayloadCode {
        match payload {
            "arxiv" => PayloadCode::ArxivRequest,
            "OPT_IN" => PayloadCode::OptIn,
            "OPT_OUT" => PayloadCode::OptOut,
            other => PayloadCode::Unrecognized(other.to_string()),
        }
    }
}

impl AsRef<str> for PayloadCode {
    fn as_ref(&self) -> &str {
        match self {
            PayloadCode::ArxivRequest => "arxiv",
            PayloadCode::OptIn => "OPT_IN",
            PayloadCode::OptOut => "OPT_OUT",
            PayloadCode::Unrecognized(payload) => payload,
        }
    }
}

/// Body the provider POSTs to the webhook. Both framings are live.
#[derive(Debug, Deserialize)]
#[serde(tag = "messageType", rename_all = "lowercase")]
pub enum InboundMessage {
    Action {
        payload: String,
        from: String,
    },
    Postback {
        #[serde(rename = "buttonPayload")]
        button_payload: ButtonPayload,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonPayload {
    pub payload: String,
    pub from_num: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub execute: Option<String>,
    #[serde(default)]
    pub sent: Option<String>,
}

/// A button press reduced to what reconciliation needs. `from` is kept as
/// sent; it is only parsed when the payload code acts on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub code: PayloadCode,
    pub from: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InboundEventError {
    #[error("Unsupported message type")]
    UnsupportedMessageType,
}

impl TryFrom<InboundMessage> for InboundEvent {
    type Error = InboundEventError;

    fn try_from(message: InboundMessage) -> Result<Self, Self::Error> {
        let (payload, from) = match message {
            InboundMessage::Action { payload, from } => (payload, from),
            InboundMessage::Postback { button_payload } => {
                (button_payload.payload, button_payload.from_num)
            }
            InboundMessage::Unsupported => return Err(InboundEventError::UnsupportedMessageType),
        };
        Ok(InboundEvent {
            code: PayloadCode::parse(&payload),
            from,
        })
    }
}
