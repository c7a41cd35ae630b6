/// Extract a short type name from the full module path.
///
/// Given `"my_crate::some_module::MyType"`, returns `"MyType"`.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

/// Round to a whole number and group thousands with dots: `-1234.6` →
/// `"-1.235"`.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `|part| / whole × 100`, with an empty whole counted as 1.
pub fn ratio_pct(part: f64, whole: f64) -> f64 {
    let whole = if whole == 0.0 { 1.0 } else { whole };
    part.abs() / whole * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names() {
        assert_eq!(short_type_name("a::b::TopRiskSelector"), "TopRiskSelector");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn thousands_use_dots() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1234.0), "1.234");
        assert_eq!(format_thousands(-1234567.6), "-1.234.568");
        assert_eq!(format_thousands(-0.3), "0");
    }

    #[test]
    fn ratio_guards_zero() {
        assert!((ratio_pct(-50.0, 1000.0) - 5.0).abs() < 1e-9);
        assert!((ratio_pct(3.0, 0.0) - 300.0).abs() < 1e-9);
    }
}
