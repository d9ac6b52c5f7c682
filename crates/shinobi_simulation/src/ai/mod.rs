//! AI decision-making module
//!
//! Shinobi FSM: Follow / Chase / ZigZag / Idle / Sweep + cooperative scheduler
//! вместо корутин. Ядро (agent, state_machine, policy, scheduler) не знает про ECS :
//! Bevy только хостит его через ShinobiPlugin.

use bevy::prelude::*;

pub mod agent;
pub mod context;
pub mod events;
pub mod policy;
pub mod scheduler;
pub mod state_machine;
pub mod states;
pub mod systems;

#[cfg(test)]
mod scheduler_tests;

// Re-export основных типов
pub use agent::{DamageOutcome, Shinobi};
pub use context::AgentContext;
pub use events::{DamageIntent, DetectionEvent, ShinobiDamaged, ShinobiDestroyed};
pub use policy::{decide_aggro, trigger_aggro, AggroRoll, ScriptedRolls};
pub use scheduler::{ScheduledEvent, Scheduler, SequenceCompletion, SequenceHandle, SequenceStep};
pub use state_machine::StateMachine;
pub use states::{zigzag_waypoints, ShinobiState};
pub use systems::{shinobi_bundle, HeadlessExecutor, ShinobiTarget, TriggerEmulation};

/// Shinobi Plugin
///
/// Регистрирует системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. sync_shinobi_positions: позиции из Transform
/// 2. emulate_detection_volumes: только с TriggerEmulation (headless)
/// 3. handle_detection_events: enter/exit → FSM
/// 4. apply_damage_intents: урон, destroy + despawn
/// 5. tick_shinobi_agents: scheduler + MovementCommand
/// 6. execute_movement_commands: только с HeadlessExecutor
pub struct ShinobiPlugin {
    /// Генерировать DetectionEvent по расстоянию (нет physics triggers)
    pub emulate_triggers: bool,
    /// Двигать Transform по MovementCommand (нет NavigationAgent)
    pub headless_executor: bool,
}

impl Default for ShinobiPlugin {
    fn default() -> Self {
        Self {
            emulate_triggers: true,
            headless_executor: true,
        }
    }
}

impl Plugin for ShinobiPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DetectionEvent>()
            .add_event::<DamageIntent>()
            .add_event::<ShinobiDamaged>()
            .add_event::<ShinobiDestroyed>();

        if !app.world().contains_resource::<crate::DeterministicRng>() {
            app.insert_resource(crate::DeterministicRng::new(42));
        }
        if self.emulate_triggers {
            app.init_resource::<TriggerEmulation>();
        }
        if self.headless_executor {
            app.init_resource::<HeadlessExecutor>();
        }

        app.add_systems(
            FixedUpdate,
            (
                systems::sync_shinobi_positions,
                systems::emulate_detection_volumes.run_if(resource_exists::<TriggerEmulation>),
                systems::handle_detection_events,
                systems::apply_damage_intents,
                systems::tick_shinobi_agents,
                systems::execute_movement_commands.run_if(resource_exists::<HeadlessExecutor>),
            )
                .chain(), // Последовательное выполнение для детерминизма
        );
    }
}
