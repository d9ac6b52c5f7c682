//! Shinobi: внешний API одного агента
//!
//! Хост (Bevy система / движок / тест) дёргает явные методы вместо engine callbacks:
//! - `new` (Init), `tick` (каждый simulation frame)
//! - trigger события detection volume и sweep radius
//! - `apply_damage` → DamageOutcome (Destroyed ровно один раз)
//!
//! Наружу отдаём MovementCommand: исполняет его внешний executor.

use bevy::prelude::*;

use crate::ai::context::AgentContext;
use crate::ai::policy::{self, AggroRoll};
use crate::ai::state_machine::StateMachine;
use crate::ai::states::ShinobiState;
use crate::components::{Health, MovementCommand};
use crate::config::ShinobiConfig;
use crate::error::ShinobiResult;

/// Результат попадания по Shinobi
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Жив, осталось `remaining`
    Damaged { remaining: u32 },
    /// Здоровье дошло до 0: сигнал владельцу lifecycle (единственный)
    Destroyed,
    /// Уже уничтожен, ничего не произошло
    AlreadyDestroyed,
}

#[derive(Component, Debug, Clone)]
pub struct Shinobi {
    machine: StateMachine,
    command: MovementCommand,
    destroyed: bool,
}

impl Shinobi {
    /// Init: валидирует конфиг, стартует в `config.initial_state` (Follow по умолчанию)
    pub fn new(
        config: ShinobiConfig,
        position: Vec3,
        target_position: Vec3,
    ) -> ShinobiResult<Self> {
        config.validate()?;
        let initial = config.initial_state()?;

        let context = AgentContext::new(config, position, target_position);
        let machine = StateMachine::init(context, initial);
        let command = machine.update();

        Ok(Self {
            machine,
            command,
            destroyed: false,
        })
    }

    pub fn state(&self) -> ShinobiState {
        self.machine.state()
    }

    pub fn context(&self) -> &AgentContext {
        self.machine.context()
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn health(&self) -> Health {
        self.machine.context().health
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn transitions_enabled(&self) -> bool {
        self.machine.context().transitions_enabled
    }

    /// Motion intent последнего тика
    pub fn movement_command(&self) -> MovementCommand {
        self.command
    }

    /// Executor сообщил фактическую позицию агента
    pub fn set_position(&mut self, position: Vec3) {
        self.machine.context_mut().position = position;
    }

    /// Живое отслеживание цели (Follow/Chase читают её каждый тик)
    pub fn set_target_position(&mut self, target_position: Vec3) {
        self.machine.context_mut().target_position = target_position;
    }

    /// Принудительный SetState (не проходит через transitions_enabled)
    pub fn set_state(&mut self, next: ShinobiState) -> bool {
        if self.destroyed {
            return false;
        }
        let changed = self.machine.set_state(next);
        self.command = self.machine.update();
        changed
    }

    /// Один шаг симуляции: scheduler (completion'ы, телепорты), затем update активного состояния
    pub fn tick<R: AggroRoll + ?Sized>(&mut self, dt: f32, rng: &mut R) -> MovementCommand {
        if self.destroyed {
            return MovementCommand::Idle;
        }

        self.machine.advance_scheduler(dt, rng);
        self.command = self.machine.update();
        self.command
    }

    /// Цель вошла в detection volume (radius = chase_distance)
    pub fn on_target_enter_detection_volume<R: AggroRoll + ?Sized>(&mut self, rng: &mut R) {
        if self.destroyed {
            return;
        }
        self.machine.context_mut().in_trigger_volume = true;

        if !self.transitions_enabled() {
            crate::log("Shinobi: target entered detection volume while masked: ignored");
            return;
        }

        policy::trigger_aggro(&mut self.machine, rng);
        self.command = self.machine.update();
    }

    /// Цель покинула detection volume → Follow (если ещё не Follow и переходы разрешены)
    pub fn on_target_exit_detection_volume(&mut self) {
        if self.destroyed {
            return;
        }
        self.machine.context_mut().in_trigger_volume = false;

        if self.state() != ShinobiState::Follow && self.transitions_enabled() {
            self.machine.set_state(ShinobiState::Follow);
            self.command = self.machine.update();
        }
    }

    /// Цель вошла во внутренний sweep radius → Sweep
    ///
    /// Во время ZigZag игнорируется: собственные рывки агента проходят сквозь цель
    /// и пересекают sweep radius, рывок доигрывается до Idle.
    pub fn on_target_enter_sweep_radius(&mut self) {
        if self.destroyed {
            return;
        }
        self.machine.context_mut().in_sweep_volume = true;

        if self.state() == ShinobiState::ZigZag {
            crate::log("Shinobi: sweep radius entered mid-zigzag, dash continues");
            return;
        }

        if self.machine.request_transition(ShinobiState::Sweep) {
            self.command = self.machine.update();
        }
    }

    pub fn on_target_exit_sweep_radius(&mut self) {
        if self.destroyed {
            return;
        }
        self.machine.context_mut().in_sweep_volume = false;
    }

    /// Одно попадание (amount = 1)
    pub fn take_hit(&mut self) -> DamageOutcome {
        self.apply_damage(1)
    }

    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.destroyed {
            return DamageOutcome::AlreadyDestroyed;
        }

        let health = &mut self.machine.context_mut().health;
        health.take_damage(amount);
        let remaining = health.current;

        if remaining > 0 {
            crate::log(&format!("Shinobi: hit for {}, {} left", amount, remaining));
            return DamageOutcome::Damaged { remaining };
        }

        self.destroyed = true;
        self.machine.shutdown();
        self.command = MovementCommand::Idle;
        crate::log_info("💀 Shinobi destroyed");
        DamageOutcome::Destroyed
    }
}
