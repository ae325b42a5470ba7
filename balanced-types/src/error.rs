//! Error taxonomy for the Balanced API.
//!
//! The API tags failures with a short `category_code`. Callers match on
//! [`ErrorKind`] instead of parsing those strings; [`kind_for_category_code`]
//! turns one into the other.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Category codes reported when a bank account verification cannot proceed.
pub const BANK_ACCOUNT_VERIFICATION_FAILURES: [&str; 3] = [
    "bank-account-authentication-not-pending",
    "bank-account-authentication-failed",
    "bank-account-authentication-already-exists",
];

/// Classification of a client error.
///
/// Kinds form a tree rooted at [`ErrorKind::Balanced`]; see [`ErrorKind::parent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Root of the tree; also used for unreadable (non-JSON) responses.
    Balanced,
    Resource,
    NoResultFound,
    MultipleResultsFound,
    /// The API answered with a failing status.
    Http,
    /// The API needs a follow-up action at a `redirect_uri`.
    MoreInformationRequired,
    FundingInstrumentVerificationFailure,
    BankAccountVerificationFailure,
}

impl ErrorKind {
    /// The next more general kind, or `None` for the root.
    pub fn parent(self) -> Option<ErrorKind> {
        match self {
            ErrorKind::Balanced => None,
            ErrorKind::Resource
            | ErrorKind::NoResultFound
            | ErrorKind::MultipleResultsFound
            | ErrorKind::Http => Some(ErrorKind::Balanced),
            ErrorKind::MoreInformationRequired
            | ErrorKind::FundingInstrumentVerificationFailure => Some(ErrorKind::Http),
            ErrorKind::BankAccountVerificationFailure => {
                Some(ErrorKind::FundingInstrumentVerificationFailure)
            }
        }
    }

    /// Returns true when `self` is `ancestor` or descends from it.
    pub fn is(self, ancestor: ErrorKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Balanced => "BalancedError",
            ErrorKind::Resource => "ResourceError",
            ErrorKind::NoResultFound => "NoResultFound",
            ErrorKind::MultipleResultsFound => "MultipleResultsFound",
            ErrorKind::Http => "HTTPError",
            ErrorKind::MoreInformationRequired => "MoreInformationRequiredError",
            ErrorKind::FundingInstrumentVerificationFailure => {
                "FundingInstrumentVerificationFailure"
            }
            ErrorKind::BankAccountVerificationFailure => "BankAccountVerificationFailure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static CATEGORY_CODE_MAP: LazyLock<HashMap<&'static str, ErrorKind>> = LazyLock::new(|| {
    BANK_ACCOUNT_VERIFICATION_FAILURES
        .iter()
        .map(|&code| (code, ErrorKind::BankAccountVerificationFailure))
        .collect()
});

/// The category code lookup table, built on first use.
pub fn category_code_map() -> &'static HashMap<&'static str, ErrorKind> {
    &CATEGORY_CODE_MAP
}

/// Looks up the specific kind for an API category code.
pub fn kind_for_category_code(code: &str) -> Option<ErrorKind> {
    CATEGORY_CODE_MAP.get(code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_account_codes_are_mapped() {
        for code in BANK_ACCOUNT_VERIFICATION_FAILURES {
            assert_eq!(
                kind_for_category_code(code),
                Some(ErrorKind::BankAccountVerificationFailure)
            );
        }
        assert_eq!(category_code_map().len(), 3);
    }

    #[test]
    fn test_unknown_code_is_unmapped() {
        assert_eq!(kind_for_category_code("card-declined"), None);
        assert_eq!(kind_for_category_code(""), None);
    }

    #[test]
    fn test_kind_ancestry() {
        let kind = ErrorKind::BankAccountVerificationFailure;
        assert!(kind.is(ErrorKind::FundingInstrumentVerificationFailure));
        assert!(kind.is(ErrorKind::Http));
        assert!(kind.is(ErrorKind::Balanced));
        assert!(!kind.is(ErrorKind::MoreInformationRequired));
        assert!(!ErrorKind::Http.is(ErrorKind::BankAccountVerificationFailure));
        assert!(ErrorKind::NoResultFound.is(ErrorKind::Balanced));
        assert!(!ErrorKind::NoResultFound.is(ErrorKind::Http));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::Http.to_string(), "HTTPError");
        assert_eq!(
            ErrorKind::BankAccountVerificationFailure.to_string(),
            "BankAccountVerificationFailure"
        );
    }
}
