/// Renderer configuration, loaded from TOML; every field has a default
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::animate::Ripple;
use crate::error::ConfigError;
use crate::projection::Vec2;
use crate::raster::{Palette, Rgba};

/// Offscreen canvas settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: usize,
    pub height: usize,
    /// Clear to fully transparent instead of opaque black.
    pub transparent: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            transparent: true,
        }
    }
}

/// Zoom, spin and redraw thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub initial_scale: f64,
    pub min_scale: f64,
    /// Scale change per scroll notch.
    pub zoom_step: f64,
    /// Radians added to the spin angle per tick while idle.
    pub spin_speed: f64,
    /// Tilt angle as a fraction of the spin angle.
    pub tilt_ratio: f64,
    /// Sphere center in canvas pixels.
    pub center: [f64; 2],
    pub scale_threshold: f64,
    pub angle_threshold: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_scale: 50.0,
            min_scale: 10.0,
            zoom_step: 10.0,
            spin_speed: 0.01,
            tilt_ratio: 0.8,
            center: [300.0, 300.0],
            scale_threshold: 0.1,
            angle_threshold: 0.01,
        }
    }
}

impl ViewConfig {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center[0], self.center[1])
    }
}

/// Vertex ripple parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase_step: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        let ripple = Ripple::default();
        Self {
            amplitude: ripple.amplitude,
            frequency: ripple.frequency,
            phase_step: ripple.phase_step,
        }
    }
}

impl AnimationConfig {
    pub fn ripple(&self) -> Ripple {
        Ripple::new(self.amplitude, self.frequency, self.phase_step)
    }
}

/// Face gradient and outline colors as `[r, g, b]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub from: [u8; 3],
    pub to: [u8; 3],
    pub outline: [u8; 3],
    pub face_phase_step: f64,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let palette = Palette::default();
        let rgb = |c: Rgba| [c.r, c.g, c.b];
        Self {
            from: rgb(palette.from),
            to: rgb(palette.to),
            outline: rgb(palette.outline),
            face_phase_step: palette.phase_step,
        }
    }
}

impl PaletteConfig {
    pub fn palette(&self) -> Palette {
        let rgba = |[r, g, b]: [u8; 3]| Rgba::opaque(r, g, b);
        Palette {
            from: rgba(self.from),
            to: rgba(self.to),
            outline: rgba(self.outline),
            phase_step: self.face_phase_step,
        }
    }
}

/// Host window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Target ticks per second.
    pub fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Fractal Sphere with Infinite Zoom".into(),
            fps: 60,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub canvas: CanvasConfig,
    pub view: ViewConfig,
    pub animation: AnimationConfig,
    pub palette: PaletteConfig,
    pub window: WindowConfig,
}

impl SphereConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SphereConfig = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Run all range checks, reporting every failure at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.canvas.width == 0 || self.canvas.height == 0 {
            errors.push(format!(
                "canvas size must be non-zero, got {}x{}",
                self.canvas.width, self.canvas.height
            ));
        }
        validate_positive(&mut errors, "view.initial_scale", self.view.initial_scale);
        validate_positive(&mut errors, "view.min_scale", self.view.min_scale);
        validate_positive(&mut errors, "view.zoom_step", self.view.zoom_step);
        validate_positive(&mut errors, "view.scale_threshold", self.view.scale_threshold);
        validate_positive(&mut errors, "view.angle_threshold", self.view.angle_threshold);
        if self.view.initial_scale < self.view.min_scale {
            errors.push(format!(
                "view.initial_scale ({}) must be >= view.min_scale ({})",
                self.view.initial_scale, self.view.min_scale
            ));
        }
        validate_finite(&mut errors, "view.center[0]", self.view.center[0]);
        validate_finite(&mut errors, "view.center[1]", self.view.center[1]);
        validate_finite(&mut errors, "view.spin_speed", self.view.spin_speed);
        validate_finite(&mut errors, "view.tilt_ratio", self.view.tilt_ratio);
        validate_range(&mut errors, "animation.amplitude", self.animation.amplitude, 0.0, 0.5);
        validate_finite(&mut errors, "animation.frequency", self.animation.frequency);
        validate_finite(&mut errors, "animation.phase_step", self.animation.phase_step);
        validate_finite(&mut errors, "palette.face_phase_step", self.palette.face_phase_step);
        if !(1..=240).contains(&self.window.fps) {
            errors.push(format!("window.fps must be between 1 and 240, got {}", self.window.fps));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationError(errors.join("; ")))
        }
    }
}

fn validate_finite(errors: &mut Vec<String>, name: &str, value: f64) {
    if !value.is_finite() {
        errors.push(format!("{name} must be finite, got {value}"));
    }
}

fn validate_positive(errors: &mut Vec<String>, name: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(format!("{name} must be > 0, got {value}"));
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if !(min..=max).contains(&value) {
        errors.push(format!("{name} must be between {min} and {max}, got {value}"));
    }
}

/// Load config from a TOML file.
pub fn load_from_path(path: &Path) -> Result<SphereConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config = SphereConfig::from_toml(&content)?;
    info!("loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_stock_sphere() {
        let config = SphereConfig::default();
        assert_eq!((config.canvas.width, config.canvas.height), (600, 600));
        assert_eq!(config.view.initial_scale, 50.0);
        assert_eq!(config.view.center(), Vec2::new(300.0, 300.0));
        assert_eq!(config.animation.ripple(), Ripple::default());
        assert_eq!(config.palette.palette(), Palette::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(SphereConfig::from_toml("").unwrap(), SphereConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SphereConfig::from_toml(
            r#"
            [view]
            initial_scale = 150.0

            [palette]
            from = [255, 0, 0]
            "#,
        )
        .unwrap();
        assert_eq!(config.view.initial_scale, 150.0);
        assert_eq!(config.view.min_scale, 10.0);
        assert_eq!(config.palette.palette().from, Rgba::opaque(255, 0, 0));
        assert_eq!(config.palette.to, [147, 112, 219]);
    }

    #[test]
    fn invalid_values_are_all_reported() {
        let err = SphereConfig::from_toml(
            r#"
            [canvas]
            width = 0

            [view]
            min_scale = -1.0

            [window]
            fps = 0
            "#,
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(msg.contains("canvas size"));
        assert!(msg.contains("view.min_scale"));
        assert!(msg.contains("window.fps"));
    }

    #[test]
    fn non_finite_scale_is_rejected() {
        for value in ["inf", "nan", "-inf"] {
            let err = SphereConfig::from_toml(&format!("[view]\ninitial_scale = {value}"))
                .unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)), "{value}");
            assert!(err.to_string().contains("view.initial_scale"), "{value}");
        }
    }

    #[test]
    fn non_finite_center_is_rejected() {
        let err = SphereConfig::from_toml("[view]\ncenter = [nan, inf]").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("view.center[0]"));
        assert!(msg.contains("view.center[1]"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = SphereConfig::from_toml("[view\ninitial_scale = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[animation]\namplitude = 0.05").unwrap();
        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.animation.amplitude, 0.05);
        assert_eq!(config.animation.frequency, 1.0);
    }
}
