//! Display formatting for card numbers, amounts and percentages

use serde_json::Value;

/// Placeholder for a missing or unusable card identifier
pub const UNKNOWN_CARD: &str = "Unknown Card";
const CARD_MASK: &str = "**** **** ****";

/// Reduce a card identifier to its last four characters behind a fixed mask.
///
/// Strings and numbers are accepted; anything else (absent, null, empty,
/// structured) renders as [`UNKNOWN_CARD`].
pub fn mask_card_number(card: Option<&Value>) -> String {
    let text = match card {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return UNKNOWN_CARD.to_string(),
    };

    let chars: Vec<char> = text.chars().collect();
    let last_four: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{CARD_MASK} {last_four}")
}

/// en-US dollar amount with two decimals; unusable input renders as `$0.00`
pub fn format_currency(amount: Option<&Value>) -> String {
    let value = amount
        .and_then(numeric_value)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    format_usd(value)
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `-$1,234.50` style rendering of a finite amount
pub fn format_usd(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Insert a comma every three digits from the right
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Fraud share with two decimals, e.g. `12.50%`
pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mask_card_number() {
        assert_eq!(
            mask_card_number(Some(&json!("4111111111111111"))),
            "**** **** **** 1111"
        );
        assert_eq!(mask_card_number(Some(&json!(5500005555555559u64))), "**** **** **** 5559");
        assert_eq!(mask_card_number(Some(&json!("42"))), "**** **** **** 42");
        assert_eq!(mask_card_number(Some(&Value::Null)), UNKNOWN_CARD);
        assert_eq!(mask_card_number(Some(&json!(""))), UNKNOWN_CARD);
        assert_eq!(mask_card_number(Some(&json!({"pan": "1"}))), UNKNOWN_CARD);
        assert_eq!(mask_card_number(None), UNKNOWN_CARD);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Some(&json!(1234.5))), "$1,234.50");
        assert_eq!(format_currency(Some(&json!("abc"))), "$0.00");
        assert_eq!(format_currency(Some(&json!(" 99.999 "))), "$100.00");
        assert_eq!(format_currency(Some(&json!(1_000_000))), "$1,000,000.00");
        assert_eq!(format_currency(Some(&json!(-12.3))), "-$12.30");
        assert_eq!(format_currency(Some(&json!("NaN"))), "$0.00");
        assert_eq!(format_currency(None), "$0.00");
        assert_eq!(format_currency(Some(&json!(0))), "$0.00");
        assert_eq!(format_currency(Some(&json!(-0.001))), "$0.00");
    }

    #[test]
    fn test_format_huge_amounts() {
        assert_eq!(format_usd(1e20), "$100,000,000,000,000,000,000.00");
        assert_eq!(format_usd(-123456789012.34), "-$123,456,789,012.34");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(12.5), "12.50%");
        assert_eq!(format_percentage(0.0), "0.00%");
    }
}
