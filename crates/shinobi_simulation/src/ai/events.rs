//! AI Events: вход от trigger системы / боёвки, выход для lifecycle владельца
//!
//! Движок (или headless эмуляция) → DetectionEvent → FSM Shinobi
//! Боёвка → DamageIntent → ShinobiDamaged / ShinobiDestroyed

use bevy::prelude::*;

/// События trigger volumes Shinobi
///
/// Движок отправляет когда цель пересекает:
/// - detection volume (sphere, radius = chase_distance)
/// - sweep radius (внутренняя sphere)
///
/// Применяются только пока `transitions_enabled` (кроме учёта containment флагов).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionEvent {
    TargetEntered { observer: Entity },
    TargetExited { observer: Entity },
    SweepRadiusEntered { observer: Entity },
    SweepRadiusExited { observer: Entity },
}

impl DetectionEvent {
    pub fn observer(&self) -> Entity {
        match self {
            DetectionEvent::TargetEntered { observer }
            | DetectionEvent::TargetExited { observer }
            | DetectionEvent::SweepRadiusEntered { observer }
            | DetectionEvent::SweepRadiusExited { observer } => *observer,
        }
    }
}

/// Запрос урона по Shinobi (попадание игрока)
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageIntent {
    pub target: Entity,
    pub amount: u32,
}

impl DamageIntent {
    /// Одно попадание
    pub fn hit(target: Entity) -> Self {
        Self { target, amount: 1 }
    }
}

/// Событие: Shinobi получил урон и выжил
#[derive(Event, Debug, Clone, Copy)]
pub struct ShinobiDamaged {
    pub entity: Entity,
    pub remaining: u32,
}

/// Событие: Shinobi уничтожен (ровно одно на агента), entity деспавнится
#[derive(Event, Debug, Clone, Copy)]
pub struct ShinobiDestroyed {
    pub entity: Entity,
}
