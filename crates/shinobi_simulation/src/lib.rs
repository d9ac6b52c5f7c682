//! Shinobi Simulation Core
//!
//! Поведенческий контроллер одного врага (Shinobi) на Bevy 0.16 (strategic layer).
//!
//! HYBRID ARCHITECTURE:
//! - ECS/ядро = решения (FSM, aggro policy, scheduler, health)
//! - Движок = исполнение (физика, triggers, навигация, рендер)
//!
//! Ядро отдаёт MovementCommand и принимает геометрические факты
//! (позиции, trigger enter/exit).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod components;
pub mod config;
pub mod error;
pub mod logger;

// Re-export базовых типов для удобства
pub use ai::{
    AggroRoll, DamageIntent, DamageOutcome, DetectionEvent, ScriptedRolls, Shinobi,
    ShinobiDamaged, ShinobiDestroyed, ShinobiPlugin, ShinobiState, ShinobiTarget,
};
pub use components::*;
pub use config::ShinobiConfig;
pub use error::{ShinobiError, ShinobiResult};
pub use logger::{log, log_error, log_info, log_warning};

/// Частота simulation tick
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .add_plugins(ShinobiPlugin::default());
    }
}

/// Детерминистичный RNG resource (seeded): источник aggro coin flip
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl AggroRoll for DeterministicRng {
    fn roll_bit(&mut self) -> bool {
        self.rng.roll_bit()
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` = ровно один fixed tick (после первого).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )));

    app
}

/// Debug-дамп компонента `T` по всем entity, упорядоченный по Entity
///
/// Для `Shinobi` сюда попадает вся FSM: состояние, контекст (позиции, флаги,
/// health) и очередь scheduler'а. Два прогона с одним seed обязаны дать
/// одинаковые байты.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &T)>();
    let mut entries: Vec<(Entity, &T)> = query.iter(world).collect();
    entries.sort_by_key(|(entity, _)| *entity);

    entries
        .into_iter()
        .flat_map(|(entity, component)| format!("{}:{:?};", entity.index(), component).into_bytes())
        .collect()
}
