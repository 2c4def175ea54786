use std::{fs, ops::RangeInclusive, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, ConfigResult, EngineError},
    window::Size,
};

/// Everything needed to build an [`Engine`](crate::Engine) and the window hosting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub count: usize,
    pub hue_range: (f32, f32),
    pub point_size: f32,
    pub seed: Option<u64>,
    pub viewport: Size,
    pub window_title: String,
    pub target_frame_rate: f64,
    pub background: [f64; 3],
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl FieldConfig {
    pub const PRESETS: &'static [&'static str] = &["classic", "immersive"];

    pub fn new(count: usize, hue_range: RangeInclusive<f32>, point_size: f32) -> Self {
        Self {
            count,
            hue_range: hue_range.into_inner(),
            point_size,
            ..Default::default()
        }
    }

    /// Cyan to purple, larger points.
    pub fn classic() -> Self {
        Self {
            count: 1000,
            hue_range: (0.5, 0.8),
            point_size: 3.0,
            seed: None,
            viewport: Size {
                width: 1280,
                height: 720,
            },
            window_title: "particle-field".to_string(),
            target_frame_rate: 60.0,
            background: [0.047, 0.047, 0.047],
        }
    }

    /// Denser field, cyan through pink, smaller points.
    pub fn immersive() -> Self {
        Self {
            count: 1500,
            hue_range: (0.45, 0.85),
            point_size: 2.0,
            background: [0.039, 0.039, 0.039],
            ..Self::classic()
        }
    }

    pub fn preset(name: &str) -> ConfigResult<Self> {
        match name {
            "classic" => Ok(Self::classic()),
            "immersive" => Ok(Self::immersive()),
            _ => Err(ConfigError::UnknownPreset(name.to_string())),
        }
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Resolves a command-line argument: a preset name, else a JSON file path.
    pub fn from_arg(arg: &str) -> ConfigResult<Self> {
        if Self::PRESETS.contains(&arg) {
            Self::preset(arg)
        } else {
            Self::from_json_file(arg)
        }
    }

    pub fn hue_range(&self) -> RangeInclusive<f32> {
        self.hue_range.0..=self.hue_range.1
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.count == 0 {
            return Err(invalid("point count must be positive"));
        }

        let (start, end) = self.hue_range;
        if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&end) || start > end {
            return Err(invalid(format!(
                "hue range {}..={} must be a non-empty range within 0..=1",
                start, end
            )));
        }

        if !self.point_size.is_finite() || self.point_size <= 0.0 {
            return Err(invalid(format!(
                "point size {} must be positive",
                self.point_size
            )));
        }

        if self.viewport.is_empty() {
            return Err(invalid(format!(
                "viewport {}x{} has a zero dimension",
                self.viewport.width, self.viewport.height
            )));
        }

        if !self.target_frame_rate.is_finite() || self.target_frame_rate <= 0.0 {
            return Err(invalid(format!(
                "target frame rate {} must be positive",
                self.target_frame_rate
            )));
        }

        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> EngineError {
    EngineError::InvalidConfiguration(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for name in FieldConfig::PRESETS {
            let config = FieldConfig::preset(name).unwrap();
            assert_eq!(config.validate(), Ok(()));
        }
        assert_eq!(FieldConfig::immersive().count, 1500);
        assert_eq!(FieldConfig::immersive().hue_range, (0.45, 0.85));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(
            FieldConfig::preset("neon"),
            Err(ConfigError::UnknownPreset(name)) if name == "neon"
        ));
    }

    #[test]
    fn test_json_fills_defaults() {
        let config = FieldConfig::from_json_str(r#"{ "count": 42, "seed": 9 }"#).unwrap();
        assert_eq!(config.count, 42);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.hue_range, FieldConfig::classic().hue_range);
        assert_eq!(config.viewport, FieldConfig::classic().viewport);
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        assert!(matches!(
            FieldConfig::from_json_str(r#"{ "count": 0 }"#),
            Err(ConfigError::Invalid(EngineError::InvalidConfiguration(_)))
        ));
        assert!(matches!(
            FieldConfig::from_json_str(r#"{ "count": -3 }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            FieldConfig::from_json_str(r#"{ "hue_range": [0.9, 0.2] }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert!(FieldConfig::new(0, 0.5..=0.8, 3.0).validate().is_err());
        assert!(FieldConfig::new(10, 0.5..=1.5, 3.0).validate().is_err());
        assert!(FieldConfig::new(10, 0.5..=0.8, 0.0).validate().is_err());
        assert!(FieldConfig::new(10, 0.5..=0.8, f32::NAN).validate().is_err());
        assert!(FieldConfig::new(10, 0.5..=0.5, 2.0).validate().is_ok());

        let mut config = FieldConfig::new(10, 0.5..=0.8, 3.0);
        config.viewport.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            FieldConfig::from_arg("/nonexistent/particle-field.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
