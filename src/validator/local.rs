use super::types::{ErrorKind, ValidationError};

pub const MAX_LOCAL_LEN: usize = 64;

/// Sous-ensemble volontairement réduit: ASCII alphanumérique + `. _ % + -`
fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-')
}

/// Scans the local part, which always starts at offset 0 of the address.
///
/// The length ceiling is checked before any character: a 65-char local part
/// full of garbage still reports `LocalTooLong`.
pub(crate) fn check_local(local: &str) -> Result<(), ValidationError> {
    let len = local.chars().count();
    if len == 0 {
        return Err(ValidationError::new(ErrorKind::InvalidLocalPart, 0));
    }
    if len > MAX_LOCAL_LEN {
        return Err(ValidationError::new(
            ErrorKind::LocalTooLong,
            MAX_LOCAL_LEN,
        ));
    }

    let mut prev_dot = false;
    for (offset, c) in local.chars().enumerate() {
        if c == '.' {
            // pas de '.' initial/terminal, pas de ".."
            if offset == 0 || prev_dot || offset == len - 1 {
                return Err(ValidationError::new(ErrorKind::InvalidLocalPart, offset));
            }
            prev_dot = true;
            continue;
        }
        if !is_local_char(c) {
            return Err(ValidationError::new(
                ErrorKind::InvalidCharacterInLocalPart,
                offset,
            ));
        }
        prev_dot = false;
    }
    Ok(())
}
