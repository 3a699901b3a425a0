//! Wire encodings for option values
//!
//! Gotenberg parses form values with Go's standard library, so booleans,
//! decimals and durations are written in the shapes Go accepts.

use std::time::Duration;

/// Encode a boolean as `true` / `false`
pub(crate) fn bool_value(value: bool) -> String {
    value.to_string()
}

/// Encode a decimal with six fractional digits (`8.270000`)
pub(crate) fn decimal(value: f64) -> String {
    format!("{:.6}", value)
}

/// Encode a timeout in seconds with two fractional digits (`5.00`)
pub(crate) fn seconds(value: f64) -> String {
    format!("{:.2}", value)
}

/// Encode a duration in Go duration syntax (`1.5s`, `500ms`, `1m30s`)
pub(crate) fn go_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", fraction(nanos, 1_000));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", fraction(nanos, 1_000_000));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs_nanos =
        u128::from(total_secs % 60) * 1_000_000_000 + u128::from(duration.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&format!("{}s", fraction(secs_nanos, 1_000_000_000)));
    out
}

/// Render `value / unit` as a decimal without trailing zeros
fn fraction(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let rest = value % unit;
    if rest == 0 {
        return whole.to_string();
    }

    let width = unit.to_string().len() - 1;
    let digits = format!("{:0width$}", rest, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
