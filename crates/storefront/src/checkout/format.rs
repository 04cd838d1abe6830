//! Input masks for the payment fields.
//!
//! All three are pure and idempotent: feeding a formatted value back in
//! returns it unchanged.

const CARD_DIGITS: usize = 16;
const EXPIRY_DIGITS: usize = 4;
const CVV_DIGITS: usize = 4;

fn digits(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// `"4111-1111 1111"` -> `"4111 1111 1111"`. At most 16 digits.
#[must_use]
pub fn format_card_number(raw: &str) -> String {
    let digits = digits(raw, CARD_DIGITS);
    let mut out = String::with_capacity(digits.len() + 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// `"1234"` -> `"12/34"`.
///
/// The slash appears once a third digit is typed, so `"12"` stays `"12"`.
#[must_use]
pub fn format_expiry(raw: &str) -> String {
    let digits = digits(raw, EXPIRY_DIGITS);
    match digits.split_at_checked(2) {
        Some((month, year)) if !year.is_empty() => format!("{month}/{year}"),
        _ => digits,
    }
}

/// Digits only, at most four.
#[must_use]
pub fn sanitize_cvv(raw: &str) -> String {
    digits(raw, CVV_DIGITS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_number_groups() {
        assert_eq!(format_card_number(""), "");
        assert_eq!(format_card_number("4111"), "4111");
        assert_eq!(format_card_number("41111"), "4111 1");
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
    }

    #[test]
    fn test_card_number_strips_and_truncates() {
        let formatted = format_card_number("4111-1111-1111-1111-2222 abc");
        assert_eq!(formatted, "4111 1111 1111 1111");
        assert!(formatted.len() <= 19);
    }

    #[test]
    fn test_card_number_shape_for_any_length() {
        let input = "9".repeat(40);
        for len in 0..=input.len() {
            let out = format_card_number(input.get(..len).unwrap_or_default());
            assert!(out.len() <= 19);
            assert!(!out.ends_with(' '));
            assert!(!out.contains("  "));
            assert!(out.chars().all(|c| c.is_ascii_digit() || c == ' '));
            assert_eq!(format_card_number(&out), out);
        }
    }

    #[test]
    fn test_expiry_mask() {
        assert_eq!(format_expiry("1234"), "12/34");
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("abc12"), "12");
        assert_eq!(format_expiry("123"), "12/3");
        assert_eq!(format_expiry("12/2030"), "12/20");
        assert_eq!(format_expiry(""), "");
    }

    #[test]
    fn test_expiry_is_idempotent() {
        for raw in ["1", "12", "123", "1234", "12345", "a1b2c3"] {
            let once = format_expiry(raw);
            assert_eq!(format_expiry(&once), once);
            assert!(once.len() <= 5);
        }
    }

    #[test]
    fn test_cvv() {
        assert_eq!(sanitize_cvv("12a3"), "123");
        assert_eq!(sanitize_cvv("123456"), "1234");
        assert_eq!(sanitize_cvv("abc"), "");
    }
}
