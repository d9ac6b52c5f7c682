//! Agent context: общее read/write состояние одного Shinobi

use bevy::prelude::*;

use crate::components::Health;
use crate::config::ShinobiConfig;

/// Контекст агента, эксклюзивно принадлежит одному экземпляру
///
/// `transitions_enabled`: единственный источник правды для
/// "могут ли внешние события (trigger enter/exit) запрашивать переходы".
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub position: Vec3,
    pub target_position: Vec3,
    pub health: Health,
    pub config: ShinobiConfig,
    /// Цель внутри detection volume (radius = chase_distance)
    pub in_trigger_volume: bool,
    /// Цель внутри sweep radius
    pub in_sweep_volume: bool,
    pub transitions_enabled: bool,
    /// Текущий waypoint ZigZag. Executor читает его, а не `position`,
    /// которую sync перезаписывает из Transform каждый тик.
    pub pending_teleport: Option<Vec3>,
}

impl AgentContext {
    pub fn new(config: ShinobiConfig, position: Vec3, target_position: Vec3) -> Self {
        Self {
            position,
            target_position,
            health: Health::new(config.health),
            config,
            in_trigger_volume: false,
            in_sweep_volume: false,
            transitions_enabled: true,
            pending_teleport: None,
        }
    }

    /// Прямое расстояние agent ↔ target (3D)
    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target_position)
    }

    /// Включительно: ровно на границе уже aggro range
    pub fn is_target_in_chase_range(&self) -> bool {
        self.distance_to_target() <= self.config.chase_distance
    }
}
