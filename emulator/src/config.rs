use std::time::Duration;

use signal_core::phases::dwell::{parse_clock_time, parse_duration};
use signal_core::phases::{ConfigError, DwellConfig};

pub const USAGE: &str = "Usage: signal-emulator [--auto-dwell <250ms|2s|HHMMSS>] [--manual-dwell <250ms|2s|HHMMSS>]";

/// Builds the dwell configuration from command-line arguments.
pub fn parse_args<I>(args: I) -> Result<DwellConfig, String>
where
    I: IntoIterator<Item = String>,
{
    let defaults = DwellConfig::default();
    let mut auto = defaults.auto();
    let mut manual = defaults.manual();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg, None),
        };

        let target = match flag.as_str() {
            "--auto-dwell" => &mut auto,
            "--manual-dwell" => &mut manual,
            other => return Err(format!("Unknown argument `{other}`")),
        };

        let Some(value) = inline.or_else(|| args.next()) else {
            return Err(format!("Expected value after {flag}"));
        };
        *target = parse_dwell(&value).map_err(|err| format!("{flag}: {err}"))?;
    }

    DwellConfig::new(auto, manual).map_err(|err| err.to_string())
}

/// Unit-suffixed literals go to `parse_duration`; bare digits are a clock time.
fn parse_dwell(value: &str) -> Result<Duration, ConfigError> {
    if value.ends_with('s') {
        parse_duration(value)
    } else {
        parse_clock_time(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn defaults_without_arguments() {
        assert_eq!(parse_args(Vec::new()), Ok(DwellConfig::default()));
    }

    #[test]
    fn accepts_separate_and_inline_values() {
        let config =
            parse_args(args(&["--auto-dwell", "250ms", "--manual-dwell=2s"])).expect("valid");
        assert_eq!(config.auto(), Duration::from_millis(250));
        assert_eq!(config.manual(), Duration::from_secs(2));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            parse_args(args(&["--speed", "1s"])),
            Err("Unknown argument `--speed`".to_string())
        );
        assert_eq!(
            parse_args(args(&["--auto-dwell"])),
            Err("Expected value after --auto-dwell".to_string())
        );
        assert_eq!(
            parse_args(args(&["--auto-dwell", "0ms"])),
            Err("auto dwell must be non-zero".to_string())
        );
        assert!(parse_args(args(&["--manual-dwell", "soon"])).is_err());
    }

    #[test]
    fn accepts_clock_time_dwells() {
        let config =
            parse_args(args(&["--auto-dwell", "000130", "--manual-dwell=000005"])).expect("valid");
        assert_eq!(config.auto(), Duration::from_secs(90));
        assert_eq!(config.manual(), Duration::from_secs(5));

        assert_eq!(
            parse_args(args(&["--auto-dwell", "1234"])),
            Err(format!("--auto-dwell: {}", ConfigError::TimeLength))
        );
        assert_eq!(
            parse_args(args(&["--manual-dwell", "006000"])),
            Err(format!("--manual-dwell: {}", ConfigError::TimeValue))
        );
        assert_eq!(
            parse_args(args(&["--auto-dwell", "000000"])),
            Err("auto dwell must be non-zero".to_string())
        );
    }
}
