/// Format large numbers as abbreviated strings (1,500 as 1.5K, 2,300,000 as 2.3M)
///
/// Used for axis tick labels and table cells so magnitudes read the same
/// everywhere. Values under one thousand are printed as plain decimals.
pub fn format_large_number(num: f64) -> String {
    let magnitude = num.abs();
    if magnitude >= 1_000_000_000.0 {
        format!("{:.1}B", num / 1_000_000_000.0)
    } else if magnitude >= 1_000_000.0 {
        format!("{:.1}M", num / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}K", num / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Format a percentage with two decimals and a sign
pub fn format_percent(pct: f64) -> String {
    format!("{:+.2}%", pct)
}
