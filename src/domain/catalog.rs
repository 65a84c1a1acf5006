use std::collections::BTreeMap;
use std::fmt;

use crate::domain::value::{KnownServiceCode, ServiceCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// What the solver does with a service error.
pub enum ErrorClass {
    /// Transient; the poll loop may sleep and ask again.
    RetryAutomatically,
    /// The account or key is unusable.
    FatalCredential,
    /// The request itself was rejected or cannot succeed.
    FatalRequest,
}

impl ErrorClass {
    pub fn is_fatal(self) -> bool {
        !matches!(self, Self::RetryAutomatically)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RetryAutomatically => "retryable",
            Self::FatalCredential => "credential error",
            Self::FatalRequest => "request error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable mapping from known service codes to their [`ErrorClass`].
///
/// Codes missing from the catalog, and codes unknown to the crate, classify
/// as [`ErrorClass::FatalRequest`].
pub struct ErrorCatalog {
    entries: BTreeMap<KnownServiceCode, ErrorClass>,
}

impl ErrorCatalog {
    /// Catalog matching the documented 2captcha behaviour.
    pub fn standard() -> Self {
        let entries = KnownServiceCode::ALL
            .into_iter()
            .map(|code| (code, standard_class(code)))
            .collect();
        Self { entries }
    }

    /// Build a catalog from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (KnownServiceCode, ErrorClass)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn classify(&self, code: &ServiceCode) -> ErrorClass {
        code.known()
            .and_then(|known| self.entries.get(&known).copied())
            .unwrap_or(ErrorClass::FatalRequest)
    }
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_class(code: KnownServiceCode) -> ErrorClass {
    match code {
        KnownServiceCode::NoSlotAvailable | KnownServiceCode::CaptchaNotReady => {
            ErrorClass::RetryAutomatically
        }
        KnownServiceCode::WrongUserKey
        | KnownServiceCode::KeyDoesNotExist
        | KnownServiceCode::ZeroBalance
        | KnownServiceCode::IpBanned => ErrorClass::FatalCredential,
        _ => ErrorClass::FatalRequest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_splits_retryable_from_fatal() {
        let catalog = ErrorCatalog::standard();
        let class = |raw: &str| catalog.classify(&ServiceCode::new(raw));

        assert_eq!(class("ERROR_NO_SLOT_AVAILABLE"), ErrorClass::RetryAutomatically);
        assert_eq!(class("CAPCHA_NOT_READY"), ErrorClass::RetryAutomatically);
        assert_eq!(class("ERROR_KEY_DOES_NOT_EXIST"), ErrorClass::FatalCredential);
        assert_eq!(class("ERROR_ZERO_BALANCE"), ErrorClass::FatalCredential);
        assert_eq!(class("MAX_USER_TURN"), ErrorClass::FatalRequest);
        assert_eq!(class("ERROR_CAPTCHA_UNSOLVABLE"), ErrorClass::FatalRequest);
        assert_eq!(class("ERROR_WRONG_ID_FORMAT"), ErrorClass::FatalRequest);
    }

    #[test]
    fn unknown_codes_are_fatal() {
        let catalog = ErrorCatalog::standard();
        let class = catalog.classify(&ServiceCode::new("ERROR_PROXY_CONNECTION_FAILED"));
        assert_eq!(class, ErrorClass::FatalRequest);
        assert!(class.is_fatal());
    }

    #[test]
    fn custom_catalog_only_knows_its_entries() {
        let catalog = ErrorCatalog::from_entries([(
            KnownServiceCode::MaxUserTurn,
            ErrorClass::RetryAutomatically,
        )]);
        assert_eq!(
            catalog.classify(&ServiceCode::new("MAX_USER_TURN")),
            ErrorClass::RetryAutomatically
        );
        assert_eq!(
            catalog.classify(&ServiceCode::new("CAPCHA_NOT_READY")),
            ErrorClass::FatalRequest
        );
    }
}
