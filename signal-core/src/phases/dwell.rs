//! Dwell timing shared by firmware and host targets.
//!
//! Every automatic phase (Red, Yellow, Green) holds for [`AUTO_DWELL`];
//! every symbol of an operator override holds for [`MANUAL_DWELL`].
//! Operators may also give a dwell as an `HHMMSS` clock time.

use core::fmt;
use core::time::Duration;

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// Hold time for each phase of the automatic bounce.
pub const AUTO_DWELL: Duration = Duration::from_millis(1_000);
/// Hold time for each symbol of an override sequence.
pub const MANUAL_DWELL: Duration = Duration::from_millis(1_000);

/// Characters in an `HHMMSS` clock time.
pub const CLOCK_TIME_LEN: usize = 6;

/// Which dwell applies to the phase currently on the fixture.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DwellClass {
    Auto,
    Manual,
}

/// Errors raised while building a [`DwellConfig`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A dwell of zero would spin the cycle driver.
    ZeroDwell(DwellClass),
    /// Duration literal was not `<n>ms` or `<n>s`.
    InvalidDuration,
    /// Clock time was not exactly [`CLOCK_TIME_LEN`] characters.
    TimeLength,
    /// Clock time held a non-digit or a field out of range.
    TimeValue,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroDwell(DwellClass::Auto) => f.write_str("auto dwell must be non-zero"),
            ConfigError::ZeroDwell(DwellClass::Manual) => {
                f.write_str("manual dwell must be non-zero")
            }
            ConfigError::InvalidDuration => f.write_str("expected duration like 250ms or 2s"),
            ConfigError::TimeLength => f.write_str("expected clock time as six digits HHMMSS"),
            ConfigError::TimeValue => {
                f.write_str("clock time needs hours 00-23 and minutes and seconds 00-59")
            }
        }
    }
}

/// Dwell durations used by the cycle driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DwellConfig {
    auto: Duration,
    manual: Duration,
}

impl DwellConfig {
    /// Creates a configuration, rejecting zero-length dwells.
    pub const fn new(auto: Duration, manual: Duration) -> Result<Self, ConfigError> {
        if auto.is_zero() {
            return Err(ConfigError::ZeroDwell(DwellClass::Auto));
        }
        if manual.is_zero() {
            return Err(ConfigError::ZeroDwell(DwellClass::Manual));
        }
        Ok(Self { auto, manual })
    }

    #[must_use]
    pub const fn auto(&self) -> Duration {
        self.auto
    }

    #[must_use]
    pub const fn manual(&self) -> Duration {
        self.manual
    }

    /// Returns the hold duration for the given class.
    #[must_use]
    pub const fn for_class(&self, class: DwellClass) -> Duration {
        match class {
            DwellClass::Auto => self.auto,
            DwellClass::Manual => self.manual,
        }
    }
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            auto: AUTO_DWELL,
            manual: MANUAL_DWELL,
        }
    }
}

/// Parses `250ms` / `2s` style literals.
///
/// # Errors
///
/// [`ConfigError::InvalidDuration`] for anything else.
pub fn parse_duration(text: &str) -> Result<Duration, ConfigError> {
    let text = text.trim();
    if let Some(rest) = text.strip_suffix("ms") {
        let millis = rest
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidDuration)?;
        Ok(Duration::from_millis(millis.into()))
    } else if let Some(rest) = text.strip_suffix('s') {
        let seconds = rest
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidDuration)?;
        Ok(Duration::from_secs(seconds.into()))
    } else {
        Err(ConfigError::InvalidDuration)
    }
}

fn two_digits(input: &mut &str) -> Result<u32, ErrMode<ContextError>> {
    take_while(2, |c: char| c.is_ascii_digit())
        .try_map(str::parse::<u32>)
        .parse_next(input)
}

/// Parses an `HHMMSS` clock time into the seconds since midnight it names.
///
/// # Errors
///
/// [`ConfigError::TimeLength`] unless the text is exactly six characters;
/// [`ConfigError::TimeValue`] for non-digits, hours above 23, or minutes or
/// seconds above 59.
pub fn parse_clock_time(text: &str) -> Result<Duration, ConfigError> {
    if text.chars().count() != CLOCK_TIME_LEN {
        return Err(ConfigError::TimeLength);
    }

    let mut input = text;
    let (hours, minutes, seconds) = (two_digits, two_digits, two_digits)
        .parse_next(&mut input)
        .map_err(|_| ConfigError::TimeValue)?;
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(ConfigError::TimeValue);
    }

    Ok(Duration::from_secs(u64::from(
        hours * 3_600 + minutes * 60 + seconds,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_one_second_dwells() {
        let config = DwellConfig::default();
        assert_eq!(config.auto(), Duration::from_secs(1));
        assert_eq!(config.for_class(DwellClass::Manual), MANUAL_DWELL);
    }

    #[test]
    fn zero_dwell_is_rejected() {
        assert_eq!(
            DwellConfig::new(Duration::ZERO, MANUAL_DWELL),
            Err(ConfigError::ZeroDwell(DwellClass::Auto))
        );
        assert_eq!(
            DwellConfig::new(AUTO_DWELL, Duration::ZERO),
            Err(ConfigError::ZeroDwell(DwellClass::Manual))
        );
    }

    #[test]
    fn parses_duration_literals() {
        assert_eq!(parse_duration("150ms"), Ok(Duration::from_millis(150)));
        assert_eq!(parse_duration("2s"), Ok(Duration::from_secs(2)));
        assert_eq!(parse_duration("2"), Err(ConfigError::InvalidDuration));
        assert_eq!(parse_duration("fast"), Err(ConfigError::InvalidDuration));
    }

    #[test]
    fn parses_clock_times() {
        assert_eq!(parse_clock_time("000000"), Ok(Duration::ZERO));
        assert_eq!(parse_clock_time("000130"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_clock_time("235959"), Ok(Duration::from_secs(86_399)));
    }

    #[test]
    fn clock_time_length_is_exact() {
        assert_eq!(parse_clock_time(""), Err(ConfigError::TimeLength));
        assert_eq!(parse_clock_time("12345"), Err(ConfigError::TimeLength));
        assert_eq!(parse_clock_time("1234567"), Err(ConfigError::TimeLength));
    }

    #[test]
    fn clock_time_fields_are_range_checked() {
        assert_eq!(parse_clock_time("240000"), Err(ConfigError::TimeValue));
        assert_eq!(parse_clock_time("236000"), Err(ConfigError::TimeValue));
        assert_eq!(parse_clock_time("235960"), Err(ConfigError::TimeValue));
        assert_eq!(parse_clock_time("23595x"), Err(ConfigError::TimeValue));
        assert_eq!(parse_clock_time("+12345"), Err(ConfigError::TimeValue));
    }
}
