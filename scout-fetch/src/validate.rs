//! Phone number validity predicate
//!
//! Accepts North American numbers in the usual written forms:
//! `2345678901`, `234-567-8901`, `234.567.8901`, `(234) 567-8901`,
//! `+1 234 567 8901`, `1-234-567-8901`.

use crate::clients::Validator;
use crate::model::DetailRecord;

/// Validity predicate over [`DetailRecord::number`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneNumberValidator;

impl Validator for PhoneNumberValidator {
    fn is_valid(&self, record: &DetailRecord) -> bool {
        is_valid_phone_number(&record.number)
    }
}

/// True when `number` is a 10-digit NANP number, optionally prefixed by `1`/`+1`
pub fn is_valid_phone_number(number: &str) -> bool {
    let trimmed = number.trim();
    let (plus, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut digits = Vec::with_capacity(11);
    // Digit offsets at which '(' and ')' appeared
    let mut open_at = None;
    let mut close_at = None;

    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c as u8 - b'0'),
            ' ' | '-' | '.' => {}
            '(' if open_at.is_none() => open_at = Some(digits.len()),
            ')' if close_at.is_none() && open_at.is_some() => close_at = Some(digits.len()),
            _ => return false,
        }
    }

    let national = match digits.len() {
        10 if !plus => &digits[..],
        11 if digits[0] == 1 => &digits[1..],
        _ => return false,
    };
    let offset = digits.len() - national.len();

    match (open_at, close_at) {
        (None, None) => {}
        (Some(open), Some(close)) if open == offset && close == offset + 3 => {}
        _ => return false,
    }

    // Area code and exchange start with 2-9
    national[0] >= 2 && national[3] >= 2
}
