//! Display formatters for values interpolated into insight copy.
//!
//! Selectors keep their own rounding and sign glyph, so each function is
//! named after what it renders rather than shared across panels.

/// Unicode minus sign used by the growth formatters.
pub const MINUS: char = '\u{2212}';

/// Wrap a value in the emphasis markup consumers render verbatim.
pub fn strong(value: impl AsRef<str>) -> String {
    format!("<strong>{}</strong>", value.as_ref())
}

/// Abbreviate a volume: `999`, `1.5K`, `2.3M`, `4.0B`.
///
/// One decimal is always kept for K/M/B (`1.0K`, not `1K`). A value that
/// rounds up to the next band is shown in that band (`999_960 -> "1.0M"`).
pub fn abbr(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let abs = value.abs();
    if abs.round() < 1e3 {
        return format!("{}", value.round() as i64);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let tenths = |scaled: f64| (scaled * 10.0).round() / 10.0;
    let mut mantissa = tenths(abs / 1e3);
    let mut suffix = "K";
    for (scale, next) in [(1e6, "M"), (1e9, "B")] {
        if mantissa < 1e3 {
            break;
        }
        mantissa = tenths(abs / scale);
        suffix = next;
    }
    format!("{}{:.1}{}", sign, mantissa, suffix)
}

/// Render a decimal share as a percentage with one decimal, dropping a
/// trailing `.0` (`0.125 -> "12.5%"`, `0.05 -> "5%"`).
pub fn share_pct(share: f64) -> String {
    format!("{}%", trim_zero(&format!("{:.1}", share * 100.0)))
}

/// Whole percentage points without a sign (`0.137 -> "14pp"`).
///
/// Input is a decimal lead; the caller phrases the direction in words.
pub fn whole_pp(lead: f64) -> String {
    let rounded = (lead.abs() * 100.0).round() as i64;
    format!("{}pp", rounded)
}

/// Signed percentage points with one decimal and a unicode minus
/// (`6.24 -> "+6.2pp"`, `-7.5 -> "−7.5pp"`). Zero renders as `0pp`.
pub fn signed_pp(points: f64) -> String {
    let magnitude = format!("{:.1}", points.abs());
    if is_zero_text(&magnitude) {
        return "0pp".to_string();
    }
    let sign = if points > 0.0 { '+' } else { MINUS };
    format!("{}{}pp", sign, magnitude)
}

/// Signed share delta with one decimal and ASCII signs
/// (`1.44 -> "+1.4pp"`, `-2.0 -> "-2.0pp"`). Zero renders as `0.0pp`.
pub fn share_delta_pp(points: f64) -> String {
    let magnitude = format!("{:.1}", points.abs());
    if is_zero_text(&magnitude) {
        return "0.0pp".to_string();
    }
    let sign = if points > 0.0 { '+' } else { '-' };
    format!("{}{}pp", sign, magnitude)
}

/// Signed growth rate from a decimal (`0.042 -> "+4.2%"`,
/// `-0.031 -> "−3.1%"`). Zero renders as `0.0%`.
pub fn growth_pct(rate: f64) -> String {
    let magnitude = format!("{:.1}", (rate * 100.0).abs());
    if is_zero_text(&magnitude) {
        return "0.0%".to_string();
    }
    let sign = if rate > 0.0 { '+' } else { MINUS };
    format!("{}{}%", sign, magnitude)
}

/// English ordinal: `1st`, `2nd`, `3rd`, `11th`, `22nd`.
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

fn trim_zero(text: &str) -> &str {
    text.strip_suffix(".0").unwrap_or(text)
}

fn is_zero_text(text: &str) -> bool {
    text.chars().all(|c| c == '0' || c == '.')
}
