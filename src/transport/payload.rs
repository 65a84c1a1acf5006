use serde::Deserialize;
use serde::de::Error as DeError;

/// `request` field returned by 2captcha as either a JSON string or a JSON number.
///
/// Task ids come back as numbers on some accounts (`"request":2122988149`).
/// For numbers the raw JSON token is kept verbatim, so an id never passes
/// through a float and the balance `1.50` stays `"1.50"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPayload(String);

impl TransportPayload {
    pub fn into_string(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for TransportPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        match token.as_bytes().first().copied() {
            Some(b'"') => {
                let parsed = serde_json::from_str::<String>(token).map_err(D::Error::custom)?;
                Ok(Self(parsed))
            }
            Some(b'-' | b'0'..=b'9') => Ok(Self(token.to_owned())),
            _ => Err(D::Error::custom(
                "expected request field to be JSON string or number",
            )),
        }
    }
}
