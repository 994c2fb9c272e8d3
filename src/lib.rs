#![forbid(unsafe_code)]
//! emailcheck_lib — validation syntaxique d'adresses e-mail + vérification DNS
//! du domaine.
//!
//! [`validate_email`] is synchronous and pure: it reports the first defect of
//! an address with its character offset. With the default `with-dns`
//! feature, [`check_email_address`] and friends additionally resolve the
//! domain on the Tokio runtime.

pub mod validator;
pub use validator::{
    AddressReport, Domain, EmailAddress, ErrorKind, MAX_ADDRESS_LEN, MAX_DOMAIN_LEN,
    MAX_LABEL_LEN, MAX_LOCAL_LEN, ValidationError, describe_email,
    is_correctly_formed_email_address, is_correctly_formed_email_address_with_error, parse_email,
    validate_email,
};

#[cfg(feature = "with-dns")]
pub mod resolve;
#[cfg(feature = "with-dns")]
pub use resolve::{
    CheckError, CheckHandle, CheckOptions, CheckReport, DnsChecker, ResolutionOutcome,
    ResolveFailure, SkipReason, check_email_address, check_email_address_with, spawn_check,
};
