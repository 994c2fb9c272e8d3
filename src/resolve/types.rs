use std::fmt;
use std::net::IpAddr;

use super::{CheckError, ResolveFailure};
use crate::validator::ValidationError;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The domain is an IP literal, there is nothing to resolve.
    LiteralAddress,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiteralAddress => f.write_str("literal address"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ResolutionOutcome {
    /// Sorted, deduplicated addresses returned for the domain.
    Resolved { addresses: Vec<IpAddr> },
    Skipped { reason: SkipReason },
    Failed { cause: ResolveFailure },
}

impl ResolutionOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    pub fn addresses(&self) -> &[IpAddr] {
        match self {
            Self::Resolved { addresses } => addresses.as_slice(),
            Self::Skipped { .. } | Self::Failed { .. } => &[],
        }
    }
}

/// Résultat unique d'une vérification complète (syntaxe puis DNS).
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub address: String,
    pub syntax: Result<(), ValidationError>,
    /// `None` when the syntax check failed and no lookup was attempted.
    pub resolution: Option<ResolutionOutcome>,
}

impl CheckReport {
    pub(crate) fn invalid(address: impl Into<String>, error: ValidationError) -> Self {
        Self {
            address: address.into(),
            syntax: Err(error),
            resolution: None,
        }
    }

    pub(crate) fn checked(address: impl Into<String>, resolution: ResolutionOutcome) -> Self {
        Self {
            address: address.into(),
            syntax: Ok(()),
            resolution: Some(resolution),
        }
    }

    /// Syntactic validity only. A failed or skipped lookup leaves this `true`.
    pub fn is_valid(&self) -> bool {
        self.syntax.is_ok()
    }

    pub fn error(&self) -> Option<CheckError> {
        match (&self.syntax, &self.resolution) {
            (Err(err), _) => Some(CheckError::Invalid(*err)),
            (Ok(()), Some(ResolutionOutcome::Skipped { reason })) => {
                Some(CheckError::DnsCheckSkipped { reason: *reason })
            }
            (Ok(()), Some(ResolutionOutcome::Failed { cause })) => {
                Some(CheckError::DnsCheckFailed {
                    source: cause.clone(),
                })
            }
            (Ok(()), Some(ResolutionOutcome::Resolved { .. }) | None) => None,
        }
    }
}
