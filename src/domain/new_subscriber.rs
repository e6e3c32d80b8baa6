use serde::Deserialize;

use crate::domain::phone_number::PhoneNumber;
use crate::domain::subscriber_name::SubscriberName;

#[derive(Debug)]
pub struct NewSubscriber {
    pub phone_number: PhoneNumber,
    pub name: SubscriberName,
}

/// Form fields posted by the signup page. `number` is already normalized by
/// the client-side mask. Absent fields are validated as empty.
#[derive(Deserialize)]
pub struct NewSubscriberForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
}

/// Every rule a candidate subscriber violated, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation error: {}", .0.join(", "))]
pub struct ValidationError(Vec<String>);

impl ValidationError {
    pub fn violations(&self) -> &[String] {
        &self.0
    }
}

impl NewSubscriber {
    pub fn parse(name: String, number: String) -> Result<NewSubscriber, ValidationError> {
        let name = SubscriberName::parse(name);
        let phone_number = PhoneNumber::parse(number);

        match (name, phone_number) {
            (Ok(name), Ok(phone_number)) => Ok(NewSubscriber { phone_number, name }),
            (name, phone_number) => Err(ValidationError(
                [name.err(), phone_number.err()]
                    .into_iter()
                    .flatten()
                    .collect(),
            )),
        }
    }
}

impl TryFrom<NewSubscriberForm> for NewSubscriber {
    type Error = ValidationError;

    fn try_from(form: NewSubscriberForm) -> Result<Self, Self::Error> {
        NewSubscriber::parse(form.name, form.number)
    }
}
