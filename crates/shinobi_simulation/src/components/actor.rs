//! Базовые компоненты акторов: Health

use bevy::prelude::*;

/// Здоровье актора (в попаданиях)
///
/// Инвариант: 0 ≤ current ≤ max (unsigned + saturating_sub)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(3);
        assert_eq!(health.current, 3);

        health.take_damage(1);
        assert_eq!(health.current, 2);
        assert!(health.is_alive());

        health.take_damage(10); // Saturating sub
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());

        health.take_damage(1);
        assert_eq!(health.current, 0);
    }
}
