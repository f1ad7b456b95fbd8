// Rig tuning parameters with TOML preset support.
//
// Every sub-struct uses #[serde(default)] so a partial file (e.g. only a
// [pitch] table) keeps defaults for everything else. Angles are in degrees,
// distances in world units, speeds and rates per second.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::RigError;
use super::rig::MapBounds;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RigConfig {
    pub movement: MovementConfig,
    pub smoothing: SmoothingConfig,
    pub zoom: ZoomConfig,
    pub pitch: PitchConfig,
    pub probe: ProbeConfig,
    pub map: MapConfig,
    /// Fixed physics tick length in seconds.
    pub physics_step: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            smoothing: SmoothingConfig::default(),
            zoom: ZoomConfig::default(),
            pitch: PitchConfig::default(),
            probe: ProbeConfig::default(),
            map: MapConfig::default(),
            physics_step: 0.02,
        }
    }
}

impl RigConfig {
    /// Parse a TOML document. Missing fields use defaults. Does not validate.
    pub fn from_toml_str(text: &str) -> Result<Self, RigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, RigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        log::info!("Loaded rig config from {}", path.display());
        Ok(config)
    }

    /// Save as pretty-printed TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), RigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the preconditions the tick functions rely on.
    ///
    /// The core itself never calls this: a rig built from an unchecked config
    /// runs, it just produces whatever the numbers imply. Comparisons are
    /// written so NaN fails them.
    pub fn validate(&self) -> Result<(), RigError> {
        let invalid = |msg: String| Err(RigError::InvalidConfig(msg));

        let finite = [
            ("zoom.min_distance", self.zoom.min_distance),
            ("zoom.max_distance", self.zoom.max_distance),
            ("pitch.min_angle", self.pitch.min_angle),
            ("pitch.max_angle", self.pitch.max_angle),
            ("probe.fan_angle", self.probe.fan_angle),
            ("probe.angle_delta", self.probe.angle_delta),
            ("probe.angle_margin", self.probe.angle_margin),
            ("probe.distance_margin", self.probe.distance_margin),
            ("probe.max_zoom_modifier", self.probe.max_zoom_modifier),
            ("probe.origin_forward", self.probe.origin_forward),
            ("probe.origin_height", self.probe.origin_height),
            ("probe.sky_height", self.probe.sky_height),
            ("map.follow_radius", self.map.follow_radius),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return invalid(format!("{name} must be finite, got {value}"));
            }
        }

        if !(self.zoom.min_distance <= self.zoom.max_distance) {
            return invalid(format!(
                "zoom.min_distance ({}) exceeds zoom.max_distance ({})",
                self.zoom.min_distance, self.zoom.max_distance
            ));
        }
        if !(0.0..=1.0).contains(&self.zoom.default_fraction) {
            return invalid(format!(
                "zoom.default_fraction ({}) must lie in [0, 1]",
                self.zoom.default_fraction
            ));
        }
        if !(self.pitch.min_angle <= self.pitch.max_angle) {
            return invalid(format!(
                "pitch.min_angle ({}) exceeds pitch.max_angle ({})",
                self.pitch.min_angle, self.pitch.max_angle
            ));
        }
        if !(self.map.width > 0.0 && self.map.width.is_finite())
            || !(self.map.height > 0.0 && self.map.height.is_finite())
        {
            return invalid(format!(
                "map bounds must be positive, got {} x {}",
                self.map.width, self.map.height
            ));
        }
        if !(self.physics_step > 0.0 && self.physics_step.is_finite()) {
            return invalid(format!("physics_step must be positive, got {}", self.physics_step));
        }

        let non_negative = [
            ("pitch.offset_step", self.pitch.offset_step),
            ("pitch.max_offset", self.pitch.max_offset),
            ("movement.move_speed", self.movement.move_speed),
            ("movement.rotation_speed", self.movement.rotation_speed),
            ("movement.zoom_speed", self.movement.zoom_speed),
            ("smoothing.position_rate", self.smoothing.position_rate),
            ("smoothing.yaw_rate", self.smoothing.yaw_rate),
            ("smoothing.pitch_rate", self.smoothing.pitch_rate),
            ("smoothing.zoom_rate", self.smoothing.zoom_rate),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return invalid(format!("{name} must be non-negative, got {value}"));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// Pan speed in world units per second at full axis deflection.
    pub move_speed: f32,
    /// Yaw speed in degrees per second at full axis deflection.
    pub rotation_speed: f32,
    /// Zoom-fraction change per second per scroll unit.
    pub zoom_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 100.0,
            rotation_speed: 100.0,
            zoom_speed: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Smoothing
// ---------------------------------------------------------------------------

/// Exponential-decay rates, one per pose channel. Higher = snappier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothingConfig {
    pub position_rate: f32,
    pub yaw_rate: f32,
    pub pitch_rate: f32,
    pub zoom_rate: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            position_rate: 10.0,
            yaw_rate: 10.0,
            pitch_rate: 10.0,
            zoom_rate: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Zoom
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
    /// Camera distance at zoom fraction 0.
    pub min_distance: f32,
    /// Camera distance at zoom fraction 1.
    pub max_distance: f32,
    /// Zoom fraction the rig starts with.
    pub default_fraction: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_distance: 10.0,
            max_distance: 20.0,
            default_fraction: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Pitch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PitchConfig {
    /// Base pitch at zoom fraction 0, degrees below the horizon.
    pub min_angle: f32,
    /// Base pitch at zoom fraction 1.
    pub max_angle: f32,
    /// Pitch-offset change per physics tick.
    pub offset_step: f32,
    /// Upper clamp of the pitch offset.
    pub max_offset: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            min_angle: 22.5,
            max_angle: 45.0,
            offset_step: 1.0,
            max_offset: 45.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Probe geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// Horizontal half-angle of the ray fan before zoom scaling.
    pub fan_angle: f32,
    /// How far below the direct band the lowered band sits.
    pub angle_delta: f32,
    /// Subtracted from both bands so rays graze slightly under the camera.
    pub angle_margin: f32,
    /// Extra probe length at zoom fraction 1.
    pub distance_margin: f32,
    /// Fan scale is `max_zoom_modifier - zoom_fraction`.
    pub max_zoom_modifier: f32,
    /// Probe origin offset along the rig's forward axis.
    pub origin_forward: f32,
    /// Probe origin offset above the anchor.
    pub origin_height: f32,
    /// Height the ground probe starts from.
    pub sky_height: f32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            fan_angle: 15.0,
            angle_delta: 5.0,
            angle_margin: 1.0,
            distance_margin: 2.0,
            max_zoom_modifier: 1.5,
            origin_forward: 0.5,
            origin_height: 0.5,
            sky_height: 1000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// Extent along X; the anchor is kept in [0, width].
    pub width: f32,
    /// Extent along Z; the anchor is kept in [0, height].
    pub height: f32,
    /// Max anchor distance from a follow target. 0 disables the clamp.
    pub follow_radius: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            follow_radius: 0.0,
        }
    }
}

impl MapConfig {
    pub fn bounds(&self) -> MapBounds {
        MapBounds::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RigConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RigConfig::from_toml_str(
            r#"
            physics_step = 0.01

            [pitch]
            max_offset = 30.0
            "#,
        )
        .unwrap();

        assert_eq!(config.physics_step, 0.01);
        assert_eq!(config.pitch.max_offset, 30.0);
        assert_eq!(config.pitch.min_angle, PitchConfig::default().min_angle);
        assert_eq!(config.zoom, ZoomConfig::default());
        assert_eq!(config.map, MapConfig::default());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = RigConfig::from_toml_str("[zoom\nmin_distance = ").unwrap_err();
        assert!(matches!(err, RigError::ConfigParse(_)));
    }

    #[test]
    fn test_inverted_distances_rejected() {
        let mut config = RigConfig::default();
        config.zoom.min_distance = 30.0;
        config.zoom.max_distance = 5.0;
        assert!(matches!(config.validate(), Err(RigError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_map_rejected() {
        let mut config = RigConfig::default();
        config.map.width = 0.0;
        assert!(matches!(config.validate(), Err(RigError::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut config = RigConfig::default();
        config.smoothing.pitch_rate = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("smoothing.pitch_rate"));
    }

    #[test]
    fn test_nan_rejected() {
        let config = RigConfig::from_toml_str("[map]\nwidth = nan").unwrap();
        assert!(config.map.width.is_nan());
        assert!(matches!(config.validate(), Err(RigError::InvalidConfig(_))));

        let config = RigConfig::from_toml_str("[pitch]\nmax_offset = nan").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pitch.max_offset"));

        let config = RigConfig::from_toml_str("physics_step = nan").unwrap();
        assert!(matches!(config.validate(), Err(RigError::InvalidConfig(_))));

        let config = RigConfig::from_toml_str("[zoom]\nmax_distance = inf").unwrap();
        assert!(matches!(config.validate(), Err(RigError::InvalidConfig(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("terrain_rig_cfg_{}", std::process::id()));
        let path = dir.join("presets").join("rig.toml");

        let mut config = RigConfig::default();
        config.movement.move_speed = 42.0;
        config.map.follow_radius = 12.5;
        config.save(&path).unwrap();

        let loaded = RigConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("terrain_rig_definitely_missing.toml");
        assert!(matches!(RigConfig::load(&path), Err(RigError::Io(_))));
    }
}
