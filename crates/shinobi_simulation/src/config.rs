//! Параметры Shinobi (designer-tunable, не вычисляются)
//!
//! Загружаются из JSON (`ShinobiConfig::load`) или берутся по умолчанию.
//! Валидация при создании агента, невалидный конфиг не доходит до FSM.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::ShinobiState;
use crate::error::{ShinobiError, ShinobiResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShinobiConfig {
    /// Радиус aggro (и радиус detection volume), метры
    pub chase_distance: f32,
    /// Скорость в Follow (m/s)
    pub follow_speed: f32,
    /// Скорость в Chase (m/s)
    pub chase_speed: f32,
    /// Количество попаданий до уничтожения
    pub health: u32,
    /// Внутренний trigger, запускающий Sweep (метры, ≤ chase_distance)
    pub sweep_radius: f32,
    /// Длительность Sweep (секунды)
    pub sweep_duration: f32,
    /// Пауза между шагами ZigZag (секунды, 3 шага)
    pub zigzag_step_delay: f32,
    /// Боковой вынос waypoint'ов ZigZag от линии agent → target
    pub zigzag_lateral_offset: f32,
    /// Насколько последний waypoint ZigZag проскакивает за цель
    pub zigzag_overshoot: f32,
    /// Ожидание в Idle перед повторной оценкой aggro (секунды)
    pub idle_reevaluate_delay: f32,
    /// Начальное состояние ("follow" по умолчанию)
    pub initial_state: String,
}

impl Default for ShinobiConfig {
    fn default() -> Self {
        Self {
            chase_distance: 7.75,
            follow_speed: 0.75,
            chase_speed: 3.0,
            health: 3,
            sweep_radius: 2.5,
            sweep_duration: 2.0,
            zigzag_step_delay: 0.15,
            zigzag_lateral_offset: 1.5,
            zigzag_overshoot: 1.0,
            idle_reevaluate_delay: 1.5,
            initial_state: ShinobiState::Follow.as_str().to_string(),
        }
    }
}

impl ShinobiConfig {
    pub fn from_json_str(json: &str) -> ShinobiResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ShinobiResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Радиус detection volume совпадает с chase_distance
    pub fn detection_radius(&self) -> f32 {
        self.chase_distance
    }

    pub fn initial_state(&self) -> ShinobiResult<ShinobiState> {
        self.initial_state.parse()
    }

    pub fn validate(&self) -> ShinobiResult<()> {
        require_positive("chase_distance", self.chase_distance)?;
        require_positive("follow_speed", self.follow_speed)?;
        require_positive("chase_speed", self.chase_speed)?;
        require_positive("sweep_radius", self.sweep_radius)?;
        require_positive("sweep_duration", self.sweep_duration)?;
        require_positive("zigzag_step_delay", self.zigzag_step_delay)?;
        require_positive("idle_reevaluate_delay", self.idle_reevaluate_delay)?;
        require_non_negative("zigzag_lateral_offset", self.zigzag_lateral_offset)?;
        require_non_negative("zigzag_overshoot", self.zigzag_overshoot)?;

        if self.health == 0 {
            return Err(ShinobiError::InvalidConfig {
                field: "health",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.sweep_radius > self.chase_distance {
            return Err(ShinobiError::InvalidConfig {
                field: "sweep_radius",
                reason: format!(
                    "{} exceeds chase_distance {}",
                    self.sweep_radius, self.chase_distance
                ),
            });
        }

        self.initial_state()?;
        Ok(())
    }
}

fn require_positive(field: &'static str, value: f32) -> ShinobiResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ShinobiError::InvalidConfig {
            field,
            reason: format!("must be finite and > 0, got {}", value),
        })
    }
}

fn require_non_negative(field: &'static str, value: f32) -> ShinobiResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ShinobiError::InvalidConfig {
            field,
            reason: format!("must be finite and >= 0, got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ShinobiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chase_distance, 7.75);
        assert_eq!(config.follow_speed, 0.75);
        assert_eq!(config.chase_speed, 3.0);
        assert_eq!(config.health, 3);
        assert_eq!(config.sweep_duration, 2.0);
        assert_eq!(config.zigzag_step_delay, 0.15);
        assert_eq!(config.idle_reevaluate_delay, 1.5);
        assert_eq!(config.detection_radius(), 7.75);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ShinobiConfig::from_json_str(r#"{ "chase_distance": 10.0, "health": 5 }"#)
            .expect("valid config");
        assert_eq!(config.chase_distance, 10.0);
        assert_eq!(config.health, 5);
        assert_eq!(config.chase_speed, 3.0); // default
    }

    #[test]
    fn test_unknown_initial_state_rejected() {
        let result = ShinobiConfig::from_json_str(r#"{ "initial_state": "patrol" }"#);
        assert!(matches!(result, Err(ShinobiError::UnknownState(name)) if name == "patrol"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = ShinobiConfig {
            chase_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ShinobiError::InvalidConfig { field: "chase_speed", .. })
        ));

        let config = ShinobiConfig {
            health: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ShinobiError::InvalidConfig { field: "health", .. })
        ));

        let config = ShinobiConfig {
            sweep_radius: 20.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ShinobiError::InvalidConfig { field: "sweep_radius", .. })
        ));

        let config = ShinobiConfig {
            follow_speed: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = ShinobiConfig::from_json_str("{ chase_distance: ");
        assert!(matches!(result, Err(ShinobiError::ConfigParse(_))));
    }
}
