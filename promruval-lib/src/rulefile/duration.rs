//! Prometheus duration notation (`1h30m`, `5m`, `2w`, ...)

use crate::Result;
use core::time::Duration;
use ohno::{app_err, bail};
use regex::Regex;
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)y)?(?:(\d+)w)?(?:(\d+)d)?(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?(?:(\d+)ms)?$")
        .expect("invalid regex")
});

/// Seconds per unit, in the order the units appear in the pattern. Milliseconds are handled separately.
const UNIT_SECONDS: [u64; 6] = [365 * 24 * 3600, 7 * 24 * 3600, 24 * 3600, 3600, 60, 1];

/// Parse a duration written in Prometheus notation.
///
/// Units must appear from largest to smallest and at most once each. The
/// single value `0` is accepted as zero.
pub fn parse_duration(text: &str) -> Result<Duration> {
    let text = text.trim();
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    if text.is_empty() {
        bail!("empty duration string");
    }

    let captures = DURATION_RE
        .captures(text)
        .ok_or_else(|| app_err!("not a valid duration string: '{text}'"))?;

    let mut total = Duration::ZERO;
    for (index, unit_seconds) in UNIT_SECONDS.iter().enumerate() {
        if let Some(m) = captures.get(index + 1) {
            let value: u64 = m.as_str().parse().map_err(|e| app_err!("duration '{text}' is out of range: {e}"))?;
            let seconds = value
                .checked_mul(*unit_seconds)
                .ok_or_else(|| app_err!("duration '{text}' is out of range"))?;
            total = total
                .checked_add(Duration::from_secs(seconds))
                .ok_or_else(|| app_err!("duration '{text}' is out of range"))?;
        }
    }

    if let Some(m) = captures.get(UNIT_SECONDS.len() + 1) {
        let millis: u64 = m.as_str().parse().map_err(|e| app_err!("duration '{text}' is out of range: {e}"))?;
        total = total
            .checked_add(Duration::from_millis(millis))
            .ok_or_else(|| app_err!("duration '{text}' is out of range"))?;
    }

    Ok(total)
}

/// Format a duration back into Prometheus notation, largest units first.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let mut millis = duration.as_millis();
    if millis == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    for (unit, unit_seconds) in ["y", "w", "d", "h", "m", "s"].iter().zip(UNIT_SECONDS) {
        let unit_millis = u128::from(unit_seconds) * 1000;
        let count = millis / unit_millis;
        if count > 0 {
            out.push_str(&format!("{count}{unit}"));
            millis %= unit_millis;
        }
    }

    if millis > 0 {
        out.push_str(&format!("{millis}ms"));
    }

    out
}
