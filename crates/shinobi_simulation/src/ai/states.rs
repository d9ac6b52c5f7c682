//! Behavior states Shinobi
//!
//! Состояния: stateless стратегии, всё изменяемое лежит в AgentContext.
//! Поэтому enum без payload и сравнение по тегу: `set_state(X)` в X ловится через `==`.
//!
//! ```text
//! Follow ──enter volume──▶ Chase | ZigZag (coin flip)
//! ZigZag ──3 × 0.15s──▶ Idle ──1.5s──▶ DecideAggro
//! Sweep  ──2.0s──▶ Idle
//! любое ──exit volume──▶ Follow
//! ```

use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;

use crate::ai::context::AgentContext;
use crate::ai::scheduler::{Scheduler, SequenceCompletion, SequenceHandle, SequenceStep};
use crate::components::MovementCommand;
use crate::config::ShinobiConfig;
use crate::error::ShinobiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum ShinobiState {
    /// Медленно следует за целью (начальное)
    #[default]
    Follow,
    /// Преследует цель на chase_speed
    Chase,
    /// Три телепорта вокруг/сквозь цель, затем Idle
    ZigZag,
    /// Пауза, затем повторная оценка aggro
    Idle,
    /// Удар по площади: внешние переходы заблокированы на время sweep
    Sweep,
}

impl ShinobiState {
    pub const ALL: [ShinobiState; 5] = [
        ShinobiState::Follow,
        ShinobiState::Chase,
        ShinobiState::ZigZag,
        ShinobiState::Idle,
        ShinobiState::Sweep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShinobiState::Follow => "follow",
            ShinobiState::Chase => "chase",
            ShinobiState::ZigZag => "zigzag",
            ShinobiState::Idle => "idle",
            ShinobiState::Sweep => "sweep",
        }
    }

    pub fn is_aggressive(&self) -> bool {
        matches!(self, ShinobiState::Chase | ShinobiState::ZigZag | ShinobiState::Sweep)
    }

    /// Entry hook. Возвращает handle последовательности, которой владеет состояние.
    pub fn on_enter(
        self,
        context: &mut AgentContext,
        scheduler: &mut Scheduler,
    ) -> Option<SequenceHandle> {
        match self {
            ShinobiState::Follow | ShinobiState::Chase => None,

            ShinobiState::ZigZag => {
                let delay = context.config.zigzag_step_delay;
                let [first, second, third] =
                    zigzag_waypoints(context.position, context.target_position, &context.config);

                // Первый рывок сразу на входе, остальные по таймеру
                context.position = first;
                context.pending_teleport = Some(first);

                let steps = [
                    SequenceStep::wait(delay),
                    SequenceStep::teleport(second, delay),
                    SequenceStep::teleport(third, delay),
                ];
                Some(scheduler.schedule(steps, SequenceCompletion::EnterIdle))
            }

            ShinobiState::Sweep => {
                crate::log("🌀 Shinobi: SWEEPING (external transitions masked)");
                context.transitions_enabled = false;
                Some(scheduler.schedule(
                    [SequenceStep::wait(context.config.sweep_duration)],
                    SequenceCompletion::FinishSweep,
                ))
            }

            ShinobiState::Idle => Some(scheduler.schedule(
                [SequenceStep::wait(context.config.idle_reevaluate_delay)],
                SequenceCompletion::DecideAggro,
            )),
        }
    }

    /// Exit hook: снимает собственную последовательность до entry следующего состояния
    pub fn on_exit(
        self,
        context: &mut AgentContext,
        scheduler: &mut Scheduler,
        owned: Option<SequenceHandle>,
    ) {
        if let Some(handle) = owned {
            if scheduler.cancel(handle) {
                crate::log(&format!(
                    "Shinobi: {} interrupted, pending sequence {:?} cancelled",
                    self, handle
                ));
            }
        }

        match self {
            // Прерванный Sweep не должен оставить агента глухим навсегда
            ShinobiState::Sweep => context.transitions_enabled = true,
            ShinobiState::ZigZag => context.pending_teleport = None,
            _ => {}
        }
    }

    /// Per-tick update: motion intent для executor'а
    pub fn update(self, context: &AgentContext) -> MovementCommand {
        match self {
            ShinobiState::Follow => MovementCommand::MoveToPosition {
                target: context.target_position,
                speed: context.config.follow_speed,
            },
            ShinobiState::Chase => MovementCommand::MoveToPosition {
                target: context.target_position,
                speed: context.config.chase_speed,
            },
            ShinobiState::ZigZag => MovementCommand::Teleport {
                position: context.pending_teleport.unwrap_or(context.position),
            },
            ShinobiState::Idle | ShinobiState::Sweep => MovementCommand::Idle,
        }
    }
}

impl fmt::Display for ShinobiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShinobiState {
    type Err = ShinobiError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase().replace(['_', '-'], "");
        ShinobiState::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| ShinobiError::UnknownState(name.to_string()))
    }
}

/// Три waypoint'а ZigZag: зиг влево, заг вправо, проскок сквозь цель
///
/// Считаются в горизонтальной плоскости (Y сохраняется от агента для p1/p2).
/// Если агент стоит ровно на цели: направление по умолчанию +Z.
pub fn zigzag_waypoints(position: Vec3, target: Vec3, config: &ShinobiConfig) -> [Vec3; 3] {
    let flat = Vec3::new(target.x - position.x, 0.0, target.z - position.z);
    let distance = flat.length();
    let forward = if distance > f32::EPSILON {
        flat / distance
    } else {
        Vec3::Z
    };
    let lateral = Vec3::Y.cross(forward) * config.zigzag_lateral_offset;

    [
        position + forward * (distance / 3.0) + lateral,
        position + forward * (distance * 2.0 / 3.0) - lateral,
        Vec3::new(target.x, position.y, target.z) + forward * config.zigzag_overshoot,
    ]
}
