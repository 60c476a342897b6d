// src/types.rs

use std::time::Duration;

use clap::ValueEnum;

/// Exit status reported for a job that was terminated on timeout.
pub const TIMEOUT_EXIT_CODE: i32 = 1;

/// Exit status for wrapper-level failures (usage, setup, busy lock).
pub const WRAPPER_ERROR_EXIT_CODE: i32 = 1;

/// Which primitive backs overlap protection.
///
/// - `Flock`: advisory `flock(2)` on `<jobdir>/pid` (default).
/// - `Directory`: atomic `mkdir` of `<jobdir>/lock.d`, for filesystems where
///   `flock` is unavailable or unreliable (some network mounts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LockBackendKind {
    #[default]
    Flock,
    Directory,
}

/// Parse a duration such as `30s`, `5m`, `1h30m` or `250ms`.
///
/// A bare `0` is accepted and means "disabled". Any other number must carry
/// a unit, so `--timeout 5` is rejected instead of silently meaning 5ns.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = Duration::ZERO;
    let mut rest = s;

    while !rest.is_empty() {
        // Find the boundary between digits and suffix.
        let idx = rest
            .chars()
            .position(|c| !c.is_ascii_digit())
            .ok_or_else(|| format!("duration '{}' missing unit suffix", s))?;
        if idx == 0 {
            return Err(format!("invalid duration '{}': expected a number", s));
        }

        let (num_part, tail) = rest.split_at(idx);
        let value: u64 = num_part
            .parse()
            .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;

        let unit_len = tail
            .chars()
            .position(|c| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);

        let segment = match unit {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(60 * 60)),
            _ => {
                return Err(format!(
                    "unsupported duration unit '{}'; expected ms, s, m, or h",
                    unit
                ));
            }
        };

        total = total.saturating_add(segment);
        rest = next;
    }

    Ok(total)
}
