use std::fmt;
use std::net::IpAddr;

use thiserror::Error;

/// Catégorie d'erreur renvoyée par la validation ou par la vérification DNS.
///
/// The set is closed: the first ten kinds are syntactic and always come with
/// a character offset, the two `Dns*` kinds are only produced by the
/// resolution check and carry a cause instead.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TooLong,
    LocalTooLong,
    /// The whole domain after the `@` is too long.
    DomainTooLong,
    /// A single label of the domain is too long.
    DomainPartTooLong,
    InvalidCharacterInLocalPart,
    InvalidLocalPart,
    NoAtSign,
    InvalidDomain,
    InvalidCharacterInDomain,
    #[cfg_attr(feature = "with-serde", serde(rename = "InvalidTLD"))]
    InvalidTld,
    /// No lookup was performed, e.g. the domain is a literal IP address.
    DnsCheckSkipped,
    /// The lookup failed; inspect the cause for the reason.
    DnsCheckFailed,
}

impl ErrorKind {
    /// Stable numeric code. The DNS kinds live in their own range.
    pub fn code(self) -> u32 {
        match self {
            Self::TooLong => 0,
            Self::LocalTooLong => 1,
            Self::DomainTooLong => 2,
            Self::DomainPartTooLong => 3,
            Self::InvalidCharacterInLocalPart => 4,
            Self::InvalidLocalPart => 5,
            Self::NoAtSign => 6,
            Self::InvalidDomain => 7,
            Self::InvalidCharacterInDomain => 8,
            Self::InvalidTld => 9,
            Self::DnsCheckSkipped => 100,
            Self::DnsCheckFailed => 101,
        }
    }

    pub fn is_dns(self) -> bool {
        matches!(self, Self::DnsCheckSkipped | Self::DnsCheckFailed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TooLong => "TooLong",
            Self::LocalTooLong => "LocalTooLong",
            Self::DomainTooLong => "DomainTooLong",
            Self::DomainPartTooLong => "DomainPartTooLong",
            Self::InvalidCharacterInLocalPart => "InvalidCharacterInLocalPart",
            Self::InvalidLocalPart => "InvalidLocalPart",
            Self::NoAtSign => "NoAtSign",
            Self::InvalidDomain => "InvalidDomain",
            Self::InvalidCharacterInDomain => "InvalidCharacterInDomain",
            Self::InvalidTld => "InvalidTLD",
            Self::DnsCheckSkipped => "DNSCheckSkipped",
            Self::DnsCheckFailed => "DNSCheckFailed",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::TooLong => "address too long",
            Self::LocalTooLong => "local part too long",
            Self::DomainTooLong => "domain too long",
            Self::DomainPartTooLong => "domain label too long",
            Self::InvalidCharacterInLocalPart => "invalid character in local part",
            Self::InvalidLocalPart => "invalid local part",
            Self::NoAtSign => "expected exactly one '@'",
            Self::InvalidDomain => "invalid domain",
            Self::InvalidCharacterInDomain => "invalid character in domain",
            Self::InvalidTld => "invalid top-level domain",
            Self::DnsCheckSkipped => "DNS check skipped",
            Self::DnsCheckFailed => "DNS check failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Premier défaut syntaxique trouvé dans une adresse.
///
/// `offset` is a zero-based character index into the original address, not
/// into the segment that was being scanned.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("{kind} at offset {offset}")]
pub struct ValidationError {
    kind: ErrorKind,
    offset: usize,
}

impl ValidationError {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        debug_assert!(!kind.is_dns(), "DNS kinds are not syntactic");
        Self { kind, offset }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Décomposition d'une adresse bien formée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress<'a> {
    pub local: &'a str,
    pub domain: Domain<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Domain<'a> {
    /// `user@192.0.2.1`, `user@[2001:db8::1]`, `user@[IPv6:2001:db8::1]`
    Literal(IpAddr),
    Name { name: &'a str, labels: Vec<&'a str> },
}

impl Domain<'_> {
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Top-level label, `None` for literals.
    pub fn tld(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Name { labels, .. } => labels.last().copied(),
        }
    }
}

/// Résumé owned d'une validation, utilisé pour les sorties CLI.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressReport {
    pub original: String,
    pub local: String,
    pub domain: String,
    pub literal_domain: bool,
    pub valid: bool,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<ValidationError>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub reason: Option<String>,
}
