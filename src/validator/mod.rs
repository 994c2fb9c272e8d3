mod domain;
mod local;
mod types;

pub use types::{AddressReport, Domain, EmailAddress, ErrorKind, ValidationError};

pub use domain::{MAX_DOMAIN_LEN, MAX_LABEL_LEN};
pub use local::MAX_LOCAL_LEN;

use domain::check_domain;
use local::check_local;

/// RFC 5321: 254 caractères max, '@' compris
pub const MAX_ADDRESS_LEN: usize = 254;

/// Checks that `address` is well formed, reporting the first defect found.
///
/// The scan never panics and never normalizes its input: the address is
/// neither trimmed nor case-folded, and offsets in the returned error are
/// character indices into `address` as given.
pub fn validate_email(address: &str) -> Result<(), ValidationError> {
    parse_email(address).map(|_| ())
}

/// Identique à [`validate_email`], mais renvoie la décomposition
/// (local part, domaine nommé ou littéral).
pub fn parse_email(address: &str) -> Result<EmailAddress<'_>, ValidationError> {
    let total = address.chars().count();
    if total > MAX_ADDRESS_LEN {
        return Err(ValidationError::new(ErrorKind::TooLong, MAX_ADDRESS_LEN));
    }

    let (local, domain) = split_at_sign(address, total)?;
    check_local(local)?;

    let domain_start = local.chars().count() + 1;
    let domain = check_domain(domain, domain_start)?;

    Ok(EmailAddress { local, domain })
}

pub fn is_correctly_formed_email_address(address: &str) -> bool {
    validate_email(address).is_ok()
}

/// Variante "bool + erreur optionnelle" pour les appelants qui veulent les deux.
pub fn is_correctly_formed_email_address_with_error(
    address: &str,
) -> (bool, Option<ValidationError>) {
    match validate_email(address) {
        Ok(()) => (true, None),
        Err(err) => (false, Some(err)),
    }
}

/// Builds an owned report for display; local and domain are split on the
/// first `@` even when the address is invalid.
pub fn describe_email(address: &str) -> AddressReport {
    let (local, domain) = address.split_once('@').unwrap_or((address, ""));
    let parsed = parse_email(address);
    let literal_domain = parsed
        .as_ref()
        .is_ok_and(|parsed| parsed.domain.is_literal());
    let error = parsed.err();

    AddressReport {
        original: address.to_string(),
        local: local.to_string(),
        domain: domain.to_string(),
        literal_domain,
        valid: error.is_none(),
        reason: error.map(|e| e.to_string()),
        error,
    }
}

/// Exactement un '@'. Absent: erreur en fin de chaîne; en double: erreur
/// sur le second.
fn split_at_sign(address: &str, total: usize) -> Result<(&str, &str), ValidationError> {
    let mut at_signs = address
        .char_indices()
        .enumerate()
        .filter(|(_, (_, c))| *c == '@');

    let Some((_, (byte_idx, _))) = at_signs.next() else {
        return Err(ValidationError::new(ErrorKind::NoAtSign, total));
    };
    if let Some((offset, _)) = at_signs.next() {
        return Err(ValidationError::new(ErrorKind::NoAtSign, offset));
    }

    Ok((&address[..byte_idx], &address[byte_idx + 1..]))
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;

    fn failure(address: &str) -> (ErrorKind, usize) {
        let err = validate_email(address).expect_err("address should be rejected");
        (err.kind(), err.offset())
    }

    #[test]
    fn accepts_minimal() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(is_correctly_formed_email_address("alice.smith+news@mail.example.com"));
    }

    #[test]
    fn too_long_wins_over_everything() {
        let address = "@".repeat(255);
        assert_eq!(failure(&address), (ErrorKind::TooLong, 254));
    }

    #[test]
    fn at_sign_rules() {
        assert_eq!(failure("plainaddress"), (ErrorKind::NoAtSign, 12));
        assert_eq!(failure(""), (ErrorKind::NoAtSign, 0));
        assert_eq!(failure("a@@b.com"), (ErrorKind::NoAtSign, 2));
        assert_eq!(failure("a@b@c.com"), (ErrorKind::NoAtSign, 3));
    }

    #[test]
    fn local_too_long_offset() {
        let address = format!("{}@example.com", "a".repeat(65));
        assert_eq!(failure(&address), (ErrorKind::LocalTooLong, 64));
    }

    #[test]
    fn empty_local_part() {
        assert_eq!(failure("@example.com"), (ErrorKind::InvalidLocalPart, 0));
    }

    #[test]
    fn domain_offsets_are_absolute() {
        assert_eq!(
            failure("user@[invalid char]!.com"),
            (ErrorKind::InvalidCharacterInDomain, 5)
        );
        assert_eq!(failure("user@ex_mple.com"), (ErrorKind::InvalidCharacterInDomain, 7));
        assert_eq!(failure("user@"), (ErrorKind::InvalidDomain, 5));
        assert_eq!(failure("user@localhost"), (ErrorKind::InvalidDomain, 14));
        assert_eq!(failure("user@example.1"), (ErrorKind::InvalidTld, 13));
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        // 'é' prend deux octets mais un seul caractère
        assert_eq!(
            failure("éa@example.com"),
            (ErrorKind::InvalidCharacterInLocalPart, 0)
        );
        assert_eq!(
            failure("ab@exämple.com"),
            (ErrorKind::InvalidCharacterInDomain, 5)
        );
    }

    #[test]
    fn address_ceiling_shadows_domain_ceiling() {
        // un domaine > 253 implique une adresse > 254
        let domain = format!(
            "{}.{}.{}.{}",
            "a".repeat(63),
            "b".repeat(63),
            "c".repeat(63),
            "d".repeat(63)
        );
        assert_eq!(domain.len(), 255);
        assert_eq!(failure(&format!("u@{domain}")), (ErrorKind::TooLong, 254));

        let domain = format!(
            "{}.{}.{}.{}",
            "a".repeat(63),
            "b".repeat(63),
            "c".repeat(63),
            "d".repeat(61)
        );
        assert_eq!(domain.len(), 253);
        assert!(validate_email(&format!("u@{domain}")).is_err_and(|e| e.kind() == ErrorKind::TooLong));
        assert!(validate_email(&format!("@{domain}")).is_err_and(|e| e.kind() == ErrorKind::InvalidLocalPart));
    }

    #[test]
    fn literal_domain_is_parsed() {
        let parsed = parse_email("user@192.168.0.1").expect("literal accepted");
        assert_eq!(parsed.local, "user");
        assert_eq!(
            parsed.domain,
            Domain::Literal(IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1)))
        );
        assert!(validate_email("user@[IPv6:2001:db8::1]").is_ok());
    }

    #[test]
    fn no_normalization() {
        assert_eq!(failure(" a@b.co"), (ErrorKind::InvalidCharacterInLocalPart, 0));
        assert_eq!(failure("a@b.co "), (ErrorKind::InvalidCharacterInDomain, 6));
        assert!(validate_email("A@B.CO").is_ok());
    }

    #[test]
    fn tuple_form() {
        assert_eq!(is_correctly_formed_email_address_with_error("a@b.co"), (true, None));
        let (ok, err) = is_correctly_formed_email_address_with_error("a.@b.co");
        assert!(!ok);
        let err = err.expect("error present");
        assert_eq!((err.kind(), err.offset()), (ErrorKind::InvalidLocalPart, 1));
    }

    #[test]
    fn report_fields() {
        let report = describe_email("bob@10.0.0.1");
        assert!(report.valid);
        assert!(report.literal_domain);
        assert_eq!(report.domain, "10.0.0.1");

        let report = describe_email("bob@nowhere");
        assert!(!report.valid);
        assert_eq!(report.local, "bob");
        assert_eq!(report.error.map(|e| e.kind()), Some(ErrorKind::InvalidDomain));
        assert_eq!(
            report.reason.as_deref(),
            Some("invalid domain at offset 11")
        );
    }
}
