use std::time::Duration;

use thiserror::Error;
use trust_dns_resolver::error::ResolveError;

use super::SkipReason;
use crate::validator::{ErrorKind, ValidationError};

/// Cause d'un échec de résolution. Never turns a well-formed address into an
/// invalid one; it only explains why the lookup did not succeed.
#[derive(Debug, Clone, Error)]
pub enum ResolveFailure {
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: ResolveError,
    },
    #[error("lookup of {domain} failed: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: ResolveError,
    },
    #[error("{domain} has no A/AAAA records")]
    NoAddresses { domain: String },
    #[error("lookup of {domain} timed out after {}ms", .after.as_millis())]
    TimedOut { domain: String, after: Duration },
    #[error("lookup of {domain} was interrupted: {reason}")]
    Interrupted { domain: String, reason: String },
}

impl ResolveFailure {
    pub(crate) fn resolver_init(source: impl Into<ResolveError>) -> Self {
        Self::ResolverInit {
            source: source.into(),
        }
    }

    pub(crate) fn lookup(domain: impl Into<String>, source: ResolveError) -> Self {
        Self::Lookup {
            domain: domain.into(),
            source,
        }
    }

    pub(crate) fn no_addresses(domain: impl Into<String>) -> Self {
        Self::NoAddresses {
            domain: domain.into(),
        }
    }

    pub(crate) fn timed_out(domain: impl Into<String>, after: Duration) -> Self {
        Self::TimedOut {
            domain: domain.into(),
            after,
        }
    }

    pub(crate) fn interrupted(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Interrupted {
            domain: domain.into(),
            reason: reason.into(),
        }
    }
}

/// Erreur remontée à l'appelant d'une vérification complète.
///
/// Only [`CheckError::Invalid`] means the address is malformed. The two DNS
/// variants accompany a report whose `is_valid()` is still `true`.
#[derive(Debug, Clone, Error)]
pub enum CheckError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("DNS check skipped: {reason}")]
    DnsCheckSkipped { reason: SkipReason },
    #[error("DNS check failed: {source}")]
    DnsCheckFailed {
        #[source]
        source: ResolveFailure,
    },
}

impl CheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Invalid(err) => err.kind(),
            Self::DnsCheckSkipped { .. } => ErrorKind::DnsCheckSkipped,
            Self::DnsCheckFailed { .. } => ErrorKind::DnsCheckFailed,
        }
    }

    /// Character offset of the defect; `None` for the DNS kinds.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Invalid(err) => Some(err.offset()),
            Self::DnsCheckSkipped { .. } | Self::DnsCheckFailed { .. } => None,
        }
    }
}
