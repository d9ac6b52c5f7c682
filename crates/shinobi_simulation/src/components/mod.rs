//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: здоровье (Health)
//! - movement: motion intent для executor'а (MovementCommand)

pub mod actor;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
