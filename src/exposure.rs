use std::{fmt, str::FromStr, time::Duration};

use thiserror::Error;

pub const MIN_EXPOSURE_MS: u64 = 100;
pub const MAX_EXPOSURE_MS: u64 = 1000;
pub const DEFAULT_EXPOSURE_MS: u64 = 200;
pub const EXPOSURE_STEP_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExposureError {
    #[error("exposure duration must be a finite number of seconds")]
    NotFinite,
    #[error("exposure duration {0}s is outside 0.1..=1.0 seconds")]
    OutOfRange(f64),
    #[error("invalid exposure duration '{0}'")]
    Parse(String),
}

/// How long a glyph stays on screen. Stored in whole milliseconds on the
/// 50ms grid between 100ms and 1000ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExposureDuration {
    millis: u64,
}

impl ExposureDuration {
    /// Accepts seconds in 0.1..=1.0 and snaps to the nearest step
    pub fn try_from_secs(secs: f64) -> Result<Self, ExposureError> {
        if !secs.is_finite() {
            return Err(ExposureError::NotFinite);
        }

        // tolerate float noise such as 0.30000000000000004
        let millis = (secs * 1000.0).round();
        if millis < MIN_EXPOSURE_MS as f64 || millis > MAX_EXPOSURE_MS as f64 {
            return Err(ExposureError::OutOfRange(secs));
        }

        let steps = (millis / EXPOSURE_STEP_MS as f64).round() as u64;
        Ok(Self {
            millis: (steps * EXPOSURE_STEP_MS).clamp(MIN_EXPOSURE_MS, MAX_EXPOSURE_MS),
        })
    }

    /// Like `try_from_secs` but pins out-of-range values to the nearest bound.
    /// Non-finite input falls back to the default.
    pub fn clamped_from_secs(secs: f64) -> Self {
        if !secs.is_finite() {
            return Self::default();
        }
        let clamped = secs.clamp(
            MIN_EXPOSURE_MS as f64 / 1000.0,
            MAX_EXPOSURE_MS as f64 / 1000.0,
        );
        Self::try_from_secs(clamped).unwrap_or_default()
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.millis as f64 / 1000.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }

    /// Position within the allowed range, 0.0 at the minimum and 1.0 at the maximum
    pub fn ratio(&self) -> f64 {
        (self.millis - MIN_EXPOSURE_MS) as f64 / (MAX_EXPOSURE_MS - MIN_EXPOSURE_MS) as f64
    }

    pub fn increase(&mut self) {
        self.millis = (self.millis + EXPOSURE_STEP_MS).min(MAX_EXPOSURE_MS);
    }

    pub fn decrease(&mut self) {
        self.millis = self
            .millis
            .saturating_sub(EXPOSURE_STEP_MS)
            .max(MIN_EXPOSURE_MS);
    }

    pub fn is_min(&self) -> bool {
        self.millis == MIN_EXPOSURE_MS
    }

    pub fn is_max(&self) -> bool {
        self.millis == MAX_EXPOSURE_MS
    }
}

impl Default for ExposureDuration {
    fn default() -> Self {
        Self {
            millis: DEFAULT_EXPOSURE_MS,
        }
    }
}

impl fmt::Display for ExposureDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}s", self.as_secs_f64())
    }
}

impl FromStr for ExposureDuration {
    type Err = ExposureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let secs = trimmed
            .strip_suffix('s')
            .unwrap_or(trimmed)
            .parse::<f64>()
            .map_err(|_| ExposureError::Parse(s.to_string()))?;
        Self::try_from_secs(secs)
    }
}

impl From<ExposureDuration> for Duration {
    fn from(d: ExposureDuration) -> Self {
        d.as_duration()
    }
}
