const COUNTRY_PREFIX: &str = "+1";
const NATIONAL_DIGITS: usize = 10;

pub const INVALID_PHONE_NUMBER: &str = "Phone number must be in the format +12345678901";

/// A US number in E.164 form: `+1` followed by exactly ten digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(number: String) -> Result<PhoneNumber, String> {
        let is_valid = number
            .strip_prefix(COUNTRY_PREFIX)
            .map(|digits| {
                digits.len() == NATIONAL_DIGITS && digits.chars().all(|c| c.is_ascii_digit())
            })
            .unwrap_or(false);

        if !is_valid {
            return Err(INVALID_PHONE_NUMBER.to_string());
        }

        Ok(Self(number))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
