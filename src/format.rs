//! Currency and quantity formatting.

/// Format a monetary value: `"$12.35"`, always two decimals, round half
/// away from zero. Absent or non-finite values print as `"$0.00"`.
pub fn currency(value: Option<f64>) -> String {
    let n = value.unwrap_or(0.0);
    if !n.is_finite() {
        return "$0.00".to_string();
    }
    let cents = (n.abs() * 100.0).round();
    let sign = if n < 0.0 && cents > 0.0 { "-" } else { "" };
    format!("{}${:.2}", sign, cents / 100.0)
}

/// Format a quantity: blank when absent or zero, plain integers with no
/// decimal point, fractional values as-is.
pub fn quantity(value: Option<f64>) -> String {
    match value {
        Some(q) if q.is_finite() && q != 0.0 => {
            if q.fract() == 0.0 {
                format!("{}", q as i64)
            } else {
                q.to_string()
            }
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_absent_is_zero() {
        assert_eq!(currency(None), "$0.00");
    }

    #[test]
    fn currency_nan_is_zero() {
        assert_eq!(currency(Some(f64::NAN)), "$0.00");
    }

    #[test]
    fn currency_zero() {
        assert_eq!(currency(Some(0.0)), "$0.00");
    }

    #[test]
    fn currency_rounds_half_away_from_zero() {
        assert_eq!(currency(Some(12.345)), "$12.35");
        assert_eq!(currency(Some(2.675)), "$2.68");
    }

    #[test]
    fn currency_two_decimals() {
        assert_eq!(currency(Some(10.0)), "$10.00");
        assert_eq!(currency(Some(0.1)), "$0.10");
        assert_eq!(currency(Some(1234.5)), "$1234.50");
    }

    #[test]
    fn currency_negative() {
        assert_eq!(currency(Some(-7.5)), "-$7.50");
        assert_eq!(currency(Some(-0.001)), "$0.00");
    }

    #[test]
    fn quantity_blank_on_zero() {
        assert_eq!(quantity(None), "");
        assert_eq!(quantity(Some(0.0)), "");
    }

    #[test]
    fn quantity_integer_has_no_decimal_point() {
        assert_eq!(quantity(Some(3.0)), "3");
        assert_eq!(quantity(Some(40.0)), "40");
    }

    #[test]
    fn quantity_fractional_prints_as_given() {
        assert_eq!(quantity(Some(1.5)), "1.5");
    }
}
