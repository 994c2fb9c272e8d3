use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::types::{Domain, ErrorKind, ValidationError};

pub const MAX_DOMAIN_LEN: usize = 253;
pub const MAX_LABEL_LEN: usize = 63;
const MIN_TLD_LEN: usize = 2;

/// Domaine littéral: IPv4 nu, `[ipv6]`, `[IPv6:ipv6]` ou `[ipv4]`.
pub(crate) fn parse_literal(domain: &str) -> Option<IpAddr> {
    if let Some(inner) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        if let Some(v6) = inner.strip_prefix("IPv6:") {
            return v6.parse::<Ipv6Addr>().ok().map(IpAddr::V6);
        }
        return inner.parse::<IpAddr>().ok();
    }
    domain.parse::<Ipv4Addr>().ok().map(IpAddr::V4)
}

/// Valide le domaine qui commence à l'offset `start` de l'adresse.
///
/// Literal addresses short-circuit everything else. Otherwise the checks run
/// in order: emptiness, total length, presence of a dot, then each label left
/// to right, and finally the TLD rule on the last label.
pub(crate) fn check_domain(domain: &str, start: usize) -> Result<Domain<'_>, ValidationError> {
    if let Some(ip) = parse_literal(domain) {
        return Ok(Domain::Literal(ip));
    }

    let len = domain.chars().count();
    if len == 0 {
        return Err(ValidationError::new(ErrorKind::InvalidDomain, start));
    }
    if len > MAX_DOMAIN_LEN {
        return Err(ValidationError::new(
            ErrorKind::DomainTooLong,
            start + MAX_DOMAIN_LEN,
        ));
    }
    // un label seul (ex: "localhost") n'est pas accepté
    if !domain.contains('.') {
        return Err(ValidationError::new(ErrorKind::InvalidDomain, start + len));
    }

    let mut labels = Vec::new();
    let mut label_start = start;
    let mut tld_start = start;
    for label in domain.split('.') {
        check_label(label, label_start)?;
        tld_start = label_start;
        label_start += label.chars().count() + 1;
        labels.push(label);
    }

    if let Some(tld) = labels.last() {
        check_tld(tld, tld_start)?;
    }

    Ok(Domain::Name {
        name: domain,
        labels,
    })
}

fn check_label(label: &str, start: usize) -> Result<(), ValidationError> {
    let len = label.chars().count();
    if len == 0 {
        return Err(ValidationError::new(ErrorKind::InvalidDomain, start));
    }
    if len > MAX_LABEL_LEN {
        return Err(ValidationError::new(
            ErrorKind::DomainPartTooLong,
            start + MAX_LABEL_LEN,
        ));
    }
    for (idx, c) in label.chars().enumerate() {
        let edge_hyphen = c == '-' && (idx == 0 || idx == len - 1);
        if edge_hyphen || !(c.is_ascii_alphanumeric() || c == '-') {
            return Err(ValidationError::new(
                ErrorKind::InvalidCharacterInDomain,
                start + idx,
            ));
        }
    }
    Ok(())
}

fn check_tld(tld: &str, start: usize) -> Result<(), ValidationError> {
    let plausible = tld.len() >= MIN_TLD_LEN && tld.chars().all(|c| c.is_ascii_alphabetic());
    if plausible {
        Ok(())
    } else {
        Err(ValidationError::new(ErrorKind::InvalidTld, start))
    }
}
