/// Format seconds as `MM:SS.mmm`. Milliseconds are truncated, not rounded.
///
/// Negative and non-finite inputs render as `00:00.000`.
///
/// # Example
/// ```
/// use cl_report::time::format_time;
/// assert_eq!(format_time(0.6965), "00:00.696");
/// assert_eq!(format_time(83.25), "01:23.250");
/// ```
#[must_use]
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    // Work in whole milliseconds; the epsilon absorbs binary representation
    // error (e.g. 0.3 stored as 0.29999...).
    let total_ms = (seconds * 1000.0 + 1e-6).floor() as u64;
    let minutes = total_ms / 60_000;
    let secs = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;
    format!("{minutes:02}:{secs:02}.{millis:03}")
}

/// Parse `MM:SS.mmm` back into seconds.
///
/// # Example
/// ```
/// use cl_report::time::parse_time;
/// assert_eq!(parse_time("01:23.250"), Some(83.25));
/// assert_eq!(parse_time("1:2"), None);
/// ```
#[must_use]
pub fn parse_time(text: &str) -> Option<f64> {
    let (minutes, rest) = text.trim().split_once(':')?;
    let (secs, millis) = rest.split_once('.')?;
    if minutes.len() < 2 || secs.len() != 2 || millis.len() != 3 {
        return None;
    }
    let minutes: u64 = minutes.parse().ok()?;
    let secs: u64 = secs.parse().ok()?;
    let millis: u64 = millis.parse().ok()?;
    if secs >= 60 {
        return None;
    }
    Some((minutes * 60 + secs) as f64 + millis as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_and_large_values() {
        assert_eq!(format_time(0.0), "00:00.000");
        assert_eq!(format_time(59.9999), "00:59.999");
        assert_eq!(format_time(600.0), "10:00.000");
        assert_eq!(format_time(-3.0), "00:00.000");
        assert_eq!(format_time(f64::NAN), "00:00.000");
    }

    #[test]
    fn hop_multiples_format_stably() {
        let hop = 512.0 / 22050.0;
        assert_eq!(format_time(30.0 * hop), "00:00.696");
        assert_eq!(format_time(120.0 * hop), "00:02.786");
        assert_eq!(format_time(0.3), "00:00.300");
    }

    #[test]
    fn parse_inverts_format() {
        for t in [0.0, 0.696, 12.5, 125.007] {
            let back = parse_time(&format_time(t)).unwrap();
            assert!((back - t).abs() < 1e-9, "{t} -> {back}");
        }
        assert!(parse_time("00:61.000").is_none());
        assert!(parse_time("ab:cd.efg").is_none());
    }
}
