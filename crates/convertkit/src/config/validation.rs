//! Configuration validation.

use chrono::format::{Item, StrftimeItems};

use super::ConvertConfig;
use crate::error::{ConvertError, Result};

/// Validate the configuration.
pub fn validate(config: &ConvertConfig) -> Result<()> {
    if config.list_separator.is_empty() {
        return Err(ConvertError::Config(
            "list_separator must not be empty".into(),
        ));
    }

    for (key, formats) in [
        ("date_formats", &config.date_formats),
        ("time_formats", &config.time_formats),
        ("datetime_formats", &config.datetime_formats),
    ] {
        for format in formats {
            check_pattern(key, format)?;
        }
    }

    Ok(())
}

fn check_pattern(key: &str, format: &str) -> Result<()> {
    if format.trim().is_empty() {
        return Err(ConvertError::Config(format!("{} contains an empty pattern", key)));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConvertError::Config(format!(
            "{} contains an invalid pattern '{}'",
            key, format
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&ConvertConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_separator() {
        let config = ConvertConfig {
            list_separator: String::new(),
            ..Default::default()
        };
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("list_separator"));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = ConvertConfig {
            datetime_formats: vec!["%Y-%m-%d %Q".to_string()],
            ..Default::default()
        };
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("datetime_formats"));
    }

    #[test]
    fn test_empty_pattern() {
        let config = ConvertConfig {
            date_formats: vec!["  ".to_string()],
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }
}
