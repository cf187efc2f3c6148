//! Tooltip timing configuration.
//!
//! Settings are fixed when a scheduler is built. They can be read from a
//! JSON settings file and adjusted through `HOVERTIP_*` environment variables.

use crate::error::HovertipError;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`TooltipConfig::initial_delay`].
pub const ENV_INITIAL_DELAY: &str = "HOVERTIP_INITIAL_DELAY_MS";
/// Environment variable overriding [`TooltipConfig::subsequent_delay`].
pub const ENV_SUBSEQUENT_DELAY: &str = "HOVERTIP_SUBSEQUENT_DELAY_MS";
/// Environment variable overriding [`TooltipConfig::cooldown`].
pub const ENV_COOLDOWN: &str = "HOVERTIP_COOLDOWN_MS";

/// Default settings file name inside the data directory.
pub const SETTINGS_FILE: &str = "tooltips.json";

/// What happens when the element that is already pending is entered again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReenterPolicy {
    /// Treat it as a fresh request: the due time is recomputed.
    #[default]
    ResetDue,
    /// Keep the due time of the request already pending.
    KeepDue,
}

/// Which visible tooltip a leave notification clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeavePolicy {
    /// Only a tooltip showing for the element being left.
    #[default]
    ShownElementOnly,
    /// Whatever tooltip is visible, regardless of its element.
    AnyVisible,
}

/// When the "last shown" timestamp advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShownRecording {
    /// Only when a tooltip is actually rendered.
    #[default]
    OnRender,
    /// Also whenever a request is armed, even if it is later cancelled.
    OnRequest,
}

/// Switches for the points where tooltip providers traditionally disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipBehavior {
    /// Re-entry of the pending element.
    pub reenter: ReenterPolicy,
    /// Synchronous clearing on leave.
    pub leave: LeavePolicy,
    /// Advancement of the last-shown timestamp.
    pub record_shown: ShownRecording,
}

/// Delay settings for a tooltip scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Delay before a tooltip appears when none was shown recently.
    #[serde(rename = "initial_delay_ms", with = "duration_ms")]
    pub initial_delay: Duration,
    /// Delay used while tooltips are being browsed in quick succession.
    #[serde(rename = "subsequent_delay_ms", with = "duration_ms")]
    pub subsequent_delay: Duration,
    /// How long after the last display the subsequent delay stays in effect.
    #[serde(rename = "cooldown_ms", with = "duration_ms")]
    pub cooldown: Duration,
    /// Behavior switches.
    pub behavior: TooltipBehavior,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(1000),
            subsequent_delay: Duration::from_millis(200),
            cooldown: Duration::from_millis(3000),
            behavior: TooltipBehavior::default(),
        }
    }
}

impl TooltipConfig {
    /// Create a configuration with the given delays and default behavior.
    pub fn new(initial_delay: Duration, subsequent_delay: Duration, cooldown: Duration) -> Self {
        Self { initial_delay, subsequent_delay, cooldown, behavior: TooltipBehavior::default() }
    }

    /// Set the behavior switches.
    pub fn with_behavior(mut self, behavior: TooltipBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, HovertipError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, HovertipError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            HovertipError::storage(
                format!("Failed to read tooltip settings '{}': {}", path.display(), e),
                Some("Check that the settings file exists and is readable"),
            )
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "Loaded tooltip settings");
        Ok(config)
    }

    /// Load a configuration from a JSON file, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, HovertipError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No tooltip settings file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply `HOVERTIP_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, HovertipError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, HovertipError> {
        if let Some(ms) = parse_override(&lookup, ENV_INITIAL_DELAY)? {
            self.initial_delay = ms;
        }
        if let Some(ms) = parse_override(&lookup, ENV_SUBSEQUENT_DELAY)? {
            self.subsequent_delay = ms;
        }
        if let Some(ms) = parse_override(&lookup, ENV_COOLDOWN)? {
            self.cooldown = ms;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the delays are consistent.
    pub fn validate(&self) -> Result<(), HovertipError> {
        if self.subsequent_delay > self.initial_delay {
            return Err(HovertipError::config_with_hint(
                format!(
                    "subsequent delay ({}ms) exceeds initial delay ({}ms)",
                    self.subsequent_delay.as_millis(),
                    self.initial_delay.as_millis()
                ),
                "The subsequent delay should be the shorter of the two",
            ));
        }
        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, HovertipError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn parse_override(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, HovertipError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let ms: u64 = raw.trim().parse().map_err(|_| {
        HovertipError::config_with_hint(
            format!("{key} must be a whole number of milliseconds, got '{raw}'"),
            format!("Unset {key} or give it a value like 500"),
        )
    })?;
    tracing::debug!(key, ms, "Applying tooltip delay override");
    Ok(Some(Duration::from_millis(ms)))
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = TooltipConfig::default();
        assert_eq!(config.initial_delay, Duration::from_millis(1000));
        assert_eq!(config.subsequent_delay, Duration::from_millis(200));
        assert_eq!(config.cooldown, Duration::from_millis(3000));
        assert_eq!(config.behavior.reenter, ReenterPolicy::ResetDue);
        assert_eq!(config.behavior.leave, LeavePolicy::ShownElementOnly);
        assert_eq!(config.behavior.record_shown, ShownRecording::OnRender);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TooltipConfig::from_json_str(
            r#"{ "initial_delay_ms": 700, "behavior": { "leave": "any_visible" } }"#,
        )
        .unwrap();
        assert_eq!(config.initial_delay, Duration::from_millis(700));
        assert_eq!(config.subsequent_delay, Duration::from_millis(200));
        assert_eq!(config.behavior.leave, LeavePolicy::AnyVisible);
        assert_eq!(config.behavior.reenter, ReenterPolicy::ResetDue);
    }

    #[test]
    fn test_inverted_delays_rejected() {
        let err = TooltipConfig::from_json_str(
            r#"{ "initial_delay_ms": 100, "subsequent_delay_ms": 400 }"#,
        )
        .unwrap_err();
        assert_eq!(err.category(), "Config");
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> =
            [(ENV_INITIAL_DELAY, "1500"), (ENV_COOLDOWN, " 5000 ")].into_iter().collect();
        let config = TooltipConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.initial_delay, Duration::from_millis(1500));
        assert_eq!(config.subsequent_delay, Duration::from_millis(200));
        assert_eq!(config.cooldown, Duration::from_millis(5000));
    }

    #[test]
    fn test_bad_override_is_config_error() {
        let result = TooltipConfig::default().with_overrides(|key| {
            (key == ENV_SUBSEQUENT_DELAY).then(|| "fast".to_string())
        });
        let err = result.unwrap_err();
        assert!(err.to_string().contains(ENV_SUBSEQUENT_DELAY));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        assert_eq!(TooltipConfig::load_or_default(&path).unwrap(), TooltipConfig::default());

        let custom = TooltipConfig::new(
            Duration::from_millis(800),
            Duration::from_millis(100),
            Duration::from_millis(2000),
        );
        std::fs::write(&path, custom.to_json().unwrap()).unwrap();

        assert_eq!(TooltipConfig::load(&path).unwrap(), custom);
    }

    #[test]
    fn test_missing_file_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = TooltipConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.category(), "Storage");
    }
}
