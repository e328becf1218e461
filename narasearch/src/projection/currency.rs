//! Korean currency rendering for budget amounts.

const EOK: i64 = 100_000_000;
const MAN: i64 = 10_000;

/// Formats an integer with comma thousands separators.
#[must_use]
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Renders a raw budget amount in 억/만 units.
///
/// - blank input renders as `-`
/// - amounts of one 억 or more render as `{억}억`, followed by ` {만}만원` when
///   the 만 component is non-zero
/// - smaller amounts render in full as `{amount}원`
/// - anything that does not parse as a finite number is returned unchanged
///
/// ```
/// use narasearch::projection::format_budget_amount;
///
/// assert_eq!(format_budget_amount("150000000"), "1억 5,000만원");
/// assert_eq!(format_budget_amount("50000"), "50,000원");
/// assert_eq!(format_budget_amount(""), "-");
/// ```
#[must_use]
pub fn format_budget_amount(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "-".to_string();
    }

    let Ok(amount) = trimmed.replace(',', "").parse::<f64>() else {
        return raw.to_string();
    };
    if !amount.is_finite() {
        return raw.to_string();
    }

    #[allow(clippy::cast_possible_truncation)]
    let whole = amount.trunc() as i64;
    let eok = whole / EOK;
    let man = (whole % EOK) / MAN;

    if eok <= 0 {
        return format!("{}원", group_thousands(whole));
    }
    if man > 0 {
        format!("{eok}억 {}만원", group_thousands(man))
    } else {
        format!("{eok}억")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-50_000), "-50,000");
    }

    #[test]
    fn test_eok_and_man() {
        assert_eq!(format_budget_amount("150000000"), "1억 5,000만원");
        assert_eq!(format_budget_amount("1,234,567,890"), "12억 3,456만원");
    }

    #[test]
    fn test_whole_eok_omits_man() {
        assert_eq!(format_budget_amount("300000000"), "3억");
    }

    #[test]
    fn test_below_one_eok_renders_in_won() {
        assert_eq!(format_budget_amount("50000"), "50,000원");
        assert_eq!(format_budget_amount("99990000"), "99,990,000원");
        assert_eq!(format_budget_amount("0"), "0원");
    }

    #[test]
    fn test_fractional_amounts_truncate() {
        assert_eq!(format_budget_amount("150000000.7"), "1억 5,000만원");
        assert_eq!(format_budget_amount("1234.5"), "1,234원");
    }

    #[test]
    fn test_blank_is_dash() {
        assert_eq!(format_budget_amount(""), "-");
        assert_eq!(format_budget_amount("   "), "-");
    }

    #[test]
    fn test_unparseable_is_echoed() {
        assert_eq!(format_budget_amount("미정"), "미정");
        assert_eq!(format_budget_amount("NaN"), "NaN");
        assert_eq!(format_budget_amount("inf"), "inf");
    }
}
