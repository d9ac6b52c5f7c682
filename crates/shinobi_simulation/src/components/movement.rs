//! Movement компоненты: motion intent для внешнего executor'а

use bevy::prelude::*;

/// Команда движения (high-level intent)
///
/// Архитектура:
/// - FSM Shinobi пишет MovementCommand каждый тик
/// - Executor (NavigationAgent в движке / headless kinematic система) читает и исполняет
/// - Pathfinding: целиком на стороне executor'а
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum MovementCommand {
    /// Стоять на месте (Idle, Sweep, уничтожен)
    Idle,
    /// Двигаться к позиции со скоростью (Follow/Chase: позиция цели обновляется каждый тик)
    MoveToPosition { target: Vec3, speed: f32 },
    /// Мгновенно переместиться (шаги ZigZag, без навигации)
    Teleport { position: Vec3 },
}

impl Default for MovementCommand {
    fn default() -> Self {
        Self::Idle
    }
}

impl MovementCommand {
    /// Желаемая скорость (0 для Idle/Teleport)
    pub fn speed(&self) -> f32 {
        match self {
            MovementCommand::MoveToPosition { speed, .. } => *speed,
            MovementCommand::Idle | MovementCommand::Teleport { .. } => 0.0,
        }
    }
}
