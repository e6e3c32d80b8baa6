/// Which newsletter this deployment runs. The two products share the whole
/// subscription lifecycle and differ only where noted on each method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Arxiv,
    FunFacts,
}

impl Variant {
    /// Duplicate registrations are rejected instead of upserted.
    pub fn rejects_duplicates(&self) -> bool {
        matches!(self, Variant::Arxiv)
    }

    /// Opt-in/opt-out events for unknown numbers create the record.
    pub fn upserts_on_webhook(&self) -> bool {
        matches!(self, Variant::FunFacts)
    }

    /// The inbound `arxiv` keyword asks for a fresh invite.
    pub fn accepts_invite_requests(&self) -> bool {
        matches!(self, Variant::Arxiv)
    }

    pub fn registration_message(&self, phone_number: &str) -> String {
        match self {
            Variant::Arxiv => phone_number.to_string(),
            Variant::FunFacts => format!("Message sent to {}", phone_number),
        }
    }

    pub fn invite_title(&self) -> &'static str {
        match self {
            Variant::Arxiv => "Hey it's Rosie from Pinnacle here! Would you like to opt into receiving daily updates on new AI papers from ArXiv?",
            Variant::FunFacts => "Hey it's Rosie from Pinnacle here! Would you like to opt into receiving daily fun facts?",
        }
    }

    pub fn unsubscribe_title(&self) -> &'static str {
        match self {
            Variant::Arxiv => "You've been unsubscribed from ArXiv AI paper updates",
            Variant::FunFacts => "You've been unsubscribed from Pinnacle's Daily Fun Facts!",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Arxiv => "arxiv",
            Variant::FunFacts => "fun_facts",
        }
    }
}
