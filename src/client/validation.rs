//! Local input checks run before any request is built

use std::net::IpAddr;

use super::error::{BentoError, Result};

/// Characters allowed in an unquoted local part besides alphanumerics
const ATEXT_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

/// Validate a mailbox, optionally written as `Display Name <addr@host>`
pub fn email(value: &str) -> Result<()> {
    parse_mailbox(value)
        .map(|_| ())
        .ok_or_else(|| BentoError::InvalidEmail(value.to_string()))
}

/// Validate an IPv4 or IPv6 literal
pub fn ip_address(value: &str) -> Result<()> {
    value
        .parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| BentoError::InvalidIpAddress(value.to_string()))
}

/// Reject empty and whitespace-only strings with the supplied error
pub fn required(value: &str, err: impl FnOnce() -> BentoError) -> Result<()> {
    if value.trim().is_empty() {
        Err(err())
    } else {
        Ok(())
    }
}

/// Extract the `local@domain` part of a mailbox, if it is well formed
fn parse_mailbox(value: &str) -> Option<&str> {
    let value = value.trim();

    let addr = match (value.rfind('<'), value.ends_with('>')) {
        (Some(open), true) => {
            let display = value[..open].trim();
            if display.contains(['<', '>']) {
                return None;
            }
            &value[open + 1..value.len() - 1]
        },
        (None, false) => value,
        _ => return None,
    };

    let (local, domain) = addr.rsplit_once('@')?;
    (is_local_part(local) && is_domain(domain)).then_some(addr)
}

fn is_local_part(local: &str) -> bool {
    if local.len() >= 2 && local.starts_with('"') && local.ends_with('"') {
        let inner = &local[1..local.len() - 1];
        return !inner.is_empty() && inner.chars().all(|c| c != '"' && !c.is_control());
    }

    !local.is_empty()
        && local.split('.').all(|atom| {
            !atom.is_empty()
                && atom
                    .chars()
                    .all(|c| c.is_alphanumeric() || ATEXT_SPECIALS.contains(c))
        })
}

fn is_domain(domain: &str) -> bool {
    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        return literal.parse::<IpAddr>().is_ok()
            || literal
                .strip_prefix("IPv6:")
                .is_some_and(|v6| v6.parse::<IpAddr>().is_ok());
    }

    !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for addr in [
            "user@example.com",
            "first.last+tag@sub.example.co.uk",
            "x@localhost",
            "Jane Doe <jane@example.com>",
            "<jane@example.com>",
            "\"quoted name\"@example.com",
            "ops@[192.168.0.1]",
            "  padded@example.com  ",
        ] {
            assert!(email(addr).is_ok(), "expected {addr:?} to be accepted");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for addr in [
            "",
            "   ",
            "not-an-email",
            "@example.com",
            "user@",
            "user@@example.com",
            "us er@example.com",
            "user@exa mple.com",
            "user..dots@example.com",
            ".user@example.com",
            "user@-example.com",
            "user@example..com",
            "Jane <jane@example.com",
            "jane@example.com>",
        ] {
            assert!(
                matches!(email(addr), Err(BentoError::InvalidEmail(_))),
                "expected {addr:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_ip_addresses() {
        assert!(ip_address("192.168.1.1").is_ok());
        assert!(ip_address("::1").is_ok());
        assert!(ip_address("2001:db8::ff00:42:8329").is_ok());

        for ip in ["", "256.1.1.1", "1.2.3", "invalid-ip", "192.168.1.1/24"] {
            assert!(matches!(ip_address(ip), Err(BentoError::InvalidIpAddress(_))));
        }
    }

    #[test]
    fn test_required() {
        assert!(required("x", || BentoError::InvalidName("x".into())).is_ok());
        assert!(matches!(
            required(" \t", || BentoError::InvalidName("blank".into())),
            Err(BentoError::InvalidName(_))
        ));
    }
}
