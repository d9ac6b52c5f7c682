//! Shinobi systems (FixedUpdate, выполняются цепочкой)
//!
//! 1. sync_shinobi_positions: Transform агента и цели → контекст FSM
//! 2. emulate_detection_volumes: headless замена physics triggers
//! 3. handle_detection_events: DetectionEvent → FSM
//! 4. apply_damage_intents: DamageIntent → Health → destroy/despawn
//! 5. tick_shinobi_agents: scheduler + update → MovementCommand
//! 6. execute_movement_commands: headless kinematic executor

use bevy::prelude::*;

use crate::ai::agent::{DamageOutcome, Shinobi};
use crate::ai::events::{DamageIntent, DetectionEvent, ShinobiDamaged, ShinobiDestroyed};
use crate::components::{Health, MovementCommand};
use crate::DeterministicRng;

/// Цель, за которой следит конкретный Shinobi
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShinobiTarget(pub Entity);

/// Resource-флаг: эмулировать trigger volumes по расстоянию (нет физики)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct TriggerEmulation;

/// Resource-флаг: исполнять MovementCommand прямо по Transform (нет навигации)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct HeadlessExecutor;

/// Компоненты для spawn одного Shinobi
pub fn shinobi_bundle(shinobi: Shinobi, target: Entity) -> impl Bundle {
    let position = shinobi.context().position;
    let health = shinobi.health();
    let command = shinobi.movement_command();

    (
        Transform::from_translation(position),
        ShinobiTarget(target),
        health,
        command,
        shinobi,
    )
}

/// Система: Transform → AgentContext (позиция агента и живая позиция цели)
pub fn sync_shinobi_positions(
    mut agents: Query<(&mut Shinobi, &Transform, &ShinobiTarget)>,
    targets: Query<&Transform, Without<Shinobi>>,
) {
    for (mut shinobi, transform, target) in agents.iter_mut() {
        if shinobi.is_destroyed() {
            continue;
        }

        shinobi.set_position(transform.translation);

        // Цель деспавнилась: оставляем последнюю известную позицию
        if let Ok(target_transform) = targets.get(target.0) {
            shinobi.set_target_position(target_transform.translation);
        }
    }
}

/// Система: эмуляция detection volume и sweep radius по расстоянию
///
/// Событие шлём только на ПЕРЕХОДЕ внутрь/наружу (сравнение с containment флагами контекста).
/// Sweep radius проверяется раньше detection volume.
pub fn emulate_detection_volumes(
    agents: Query<(Entity, &Shinobi)>,
    mut detection_events: EventWriter<DetectionEvent>,
) {
    for (observer, shinobi) in agents.iter() {
        if shinobi.is_destroyed() {
            continue;
        }

        let context = shinobi.context();
        let distance = context.distance_to_target();

        // Внутренний радиус первым: оба пересечения за тик → Sweep без броска
        let in_sweep = distance <= context.config.sweep_radius;
        if in_sweep != context.in_sweep_volume {
            detection_events.write(if in_sweep {
                DetectionEvent::SweepRadiusEntered { observer }
            } else {
                DetectionEvent::SweepRadiusExited { observer }
            });
        }

        let in_detection = distance <= context.config.detection_radius();
        if in_detection != context.in_trigger_volume {
            detection_events.write(if in_detection {
                DetectionEvent::TargetEntered { observer }
            } else {
                DetectionEvent::TargetExited { observer }
            });
        }
    }
}

/// Система: DetectionEvent → trigger hooks Shinobi
pub fn handle_detection_events(
    mut detection_events: EventReader<DetectionEvent>,
    mut agents: Query<&mut Shinobi>,
    mut rng: ResMut<DeterministicRng>,
) {
    for event in detection_events.read() {
        let Ok(mut shinobi) = agents.get_mut(event.observer()) else {
            continue;
        };

        match event {
            DetectionEvent::TargetEntered { .. } => {
                shinobi.on_target_enter_detection_volume(&mut *rng);
            }
            DetectionEvent::TargetExited { .. } => {
                shinobi.on_target_exit_detection_volume();
            }
            DetectionEvent::SweepRadiusEntered { .. } => {
                shinobi.on_target_enter_sweep_radius();
            }
            DetectionEvent::SweepRadiusExited { .. } => {
                shinobi.on_target_exit_sweep_radius();
            }
        }
    }
}

/// Система: DamageIntent → Health
///
/// Destroyed приходит из агента ровно один раз → ShinobiDestroyed + despawn.
/// Повторные попадания по уже уничтоженному (в том же тике): игнор.
pub fn apply_damage_intents(
    mut commands: Commands,
    mut intents: EventReader<DamageIntent>,
    mut agents: Query<(&mut Shinobi, Option<&mut Health>)>,
    mut damaged_events: EventWriter<ShinobiDamaged>,
    mut destroyed_events: EventWriter<ShinobiDestroyed>,
) {
    for intent in intents.read() {
        let Ok((mut shinobi, health_mirror)) = agents.get_mut(intent.target) else {
            continue;
        };

        let outcome = shinobi.apply_damage(intent.amount);
        if let Some(mut health) = health_mirror {
            *health = shinobi.health();
        }

        match outcome {
            DamageOutcome::Damaged { remaining } => {
                damaged_events.write(ShinobiDamaged {
                    entity: intent.target,
                    remaining,
                });
            }
            DamageOutcome::Destroyed => {
                crate::log_info(&format!("💀 Shinobi {:?} destroyed → despawn", intent.target));
                destroyed_events.write(ShinobiDestroyed {
                    entity: intent.target,
                });
                commands.entity(intent.target).despawn();
            }
            DamageOutcome::AlreadyDestroyed => {}
        }
    }
}

/// Система: tick FSM + scheduler, запись MovementCommand
pub fn tick_shinobi_agents(
    mut agents: Query<(&mut Shinobi, &mut MovementCommand)>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut shinobi, mut command) in agents.iter_mut() {
        let next = shinobi.tick(delta, &mut *rng);

        // Пишем только при изменении: иначе Changed<MovementCommand> спамит
        if *command != next {
            *command = next;
        }
    }
}

/// Система: headless executor (MovementCommand → Transform)
///
/// В движке это делает NavigationAgent; здесь прямолинейно, без коллизий.
pub fn execute_movement_commands(
    mut agents: Query<(&MovementCommand, &mut Transform), With<Shinobi>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (command, mut transform) in agents.iter_mut() {
        match *command {
            MovementCommand::Idle => {}
            MovementCommand::Teleport { position } => {
                transform.translation = position;
            }
            MovementCommand::MoveToPosition { target, speed } => {
                let offset = target - transform.translation;
                let step = speed * delta;
                let distance = offset.length();

                if distance <= step {
                    transform.translation = target;
                } else {
                    transform.translation += offset / distance * step;
                }
            }
        }
    }
}
