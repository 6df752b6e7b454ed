//! Amount cell parsing with column-semantic sign rules

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use super::columns::ColumnKeywords;

/// Parse a raw amount cell from `column` into a signed decimal
///
/// Handles `$1,234.56`, `(50.00)`, `€10` and friends. Inflow columns
/// (credit, not debit) come out negative; debit columns never come out
/// negative. Column semantics are applied after parenthesis negation.
pub fn parse_amount_value(raw: &str, column: &str, keywords: &ColumnKeywords) -> Option<Decimal> {
    let s = raw.trim();

    // (100.00) -> -100.00
    let (parenthesized, s) = match s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };

    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '£' | '€'))
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if matches!(cleaned.as_str(), "" | "-" | "." | "-.") {
        return None;
    }

    let mut amount = parse_decimal(&cleaned)?;

    if parenthesized {
        amount = -amount.abs();
    }

    let credit = keywords.is_credit(column);
    let debit = keywords.is_debit(column);
    if credit && !debit {
        amount = -amount.abs();
    } else if debit && amount.is_sign_negative() {
        amount = amount.abs();
    }

    // -0.00 and 0.00 must fingerprint identically
    if amount.is_zero() {
        amount = Decimal::ZERO;
    }

    Some(amount)
}

/// Decimal parsing tolerant of a bare leading or trailing dot (".5", "5.")
///
/// Values wider than `Decimal`'s 96-bit mantissa still read as numbers and
/// saturate at `Decimal::MAX` / `Decimal::MIN`.
fn parse_decimal(s: &str) -> Option<Decimal> {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let mut normalized = String::with_capacity(s.len() + 2);
    normalized.push_str(sign);
    if digits.starts_with('.') {
        normalized.push('0');
    }
    normalized.push_str(digits);
    if digits.ends_with('.') {
        normalized.push('0');
    }
    Decimal::from_str(&normalized).ok().or_else(|| saturate(&normalized))
}

fn saturate(s: &str) -> Option<Decimal> {
    let value: f64 = s.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).or(Some(if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }))
}
