//! Login form checks.
//!
//! The address grammar is the one Android ships as `Patterns.EMAIL_ADDRESS`:
//!
//! ```text
//! [A-Za-z0-9+._%-]{1,256} @ [A-Za-z0-9][A-Za-z0-9-]{0,64} ( . [A-Za-z0-9][A-Za-z0-9-]{0,25} )+
//! ```
//!
//! None of the character classes contain `@` or `.` where it would matter, so
//! the match is a split followed by per-part checks.

const LOCAL_MAX: usize = 256;
const DOMAIN_HEAD_MAX: usize = 65;
const DOMAIN_LABEL_MAX: usize = 26;

/// Whole-string match; surrounding whitespace makes the address invalid.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if !(1..=LOCAL_MAX).contains(&local.len()) || !local.bytes().all(is_local_byte) {
        return false;
    }

    let mut labels = domain.split('.');
    let Some(head) = labels.next() else {
        return false;
    };
    if !is_label(head, DOMAIN_HEAD_MAX) {
        return false;
    }
    let mut tail = 0;
    for label in labels {
        if !is_label(label, DOMAIN_LABEL_MAX) {
            return false;
        }
        tail += 1;
    }
    tail > 0
}

/// The login button is enabled iff this holds.
pub fn login_enabled(email: &str, password: &str) -> bool {
    is_valid_email(email) && !password.is_empty()
}

fn is_local_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'.' | b'_' | b'%' | b'-')
}

fn is_label(label: &str, max: usize) -> bool {
    let b = label.as_bytes();
    match b.split_first() {
        Some((first, rest)) => {
            b.len() <= max
                && first.is_ascii_alphanumeric()
                && rest.iter().all(|c| c.is_ascii_alphanumeric() || *c == b'-')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enablement_examples() {
        assert!(login_enabled("a@b.com", "x"));
        assert!(!login_enabled("a@b", "x"));
        assert!(!login_enabled("a@b.com", ""));
        assert!(!login_enabled("", ""));
    }

    #[test]
    fn accepts_common_addresses() {
        for ok in [
            "user@example.com",
            "first.last+tag@mail.example.co.uk",
            "x_y%z-1@a-b.io",
            ".leading.dot@host.org",
            "UPPER@CASE.COM",
        ] {
            assert!(is_valid_email(ok), "{ok}");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "",
            "@b.com",
            "a@",
            "a@.com",
            "a@b.",
            "a@b..com",
            "a@-b.com",
            "a@b.-com",
            "a@b@c.com",
            "a b@c.com",
            " a@b.com",
            "a@b.com ",
            "a@b_c.com",
            "ü@b.com",
        ] {
            assert!(!is_valid_email(bad), "{bad}");
        }
    }

    #[test]
    fn length_limits() {
        let local = "a".repeat(256);
        assert!(is_valid_email(&format!("{local}@b.com")));
        assert!(!is_valid_email(&format!("{local}a@b.com")));

        let head = "h".repeat(65);
        assert!(is_valid_email(&format!("a@{head}.com")));
        assert!(!is_valid_email(&format!("a@{head}h.com")));

        let tld = "t".repeat(26);
        assert!(is_valid_email(&format!("a@b.{tld}")));
        assert!(!is_valid_email(&format!("a@b.{tld}t")));
    }

    #[test]
    fn password_only_needs_content() {
        assert!(login_enabled("a@b.com", " "));
        assert!(!login_enabled("not-an-email", "secret"));
    }
}
