//! Aggro decision policy
//!
//! - `trigger_aggro`: coin flip Chase / ZigZag (кроме уже идущего ZigZag)
//! - `decide_aggro`: distance ≤ chase_distance → trigger_aggro, иначе Follow
//!
//! Guard в trigger_aggro намеренно только для ZigZag: Chase → Chase проваливается
//! в идемпотентный set_state, события во время Sweep режутся флагом выше.

use std::collections::VecDeque;

use rand::Rng;

use crate::ai::state_machine::StateMachine;
use crate::ai::states::ShinobiState;

/// Источник одного равномерного случайного бита
pub trait AggroRoll {
    fn roll_bit(&mut self) -> bool;
}

impl<R: Rng> AggroRoll for R {
    fn roll_bit(&mut self) -> bool {
        self.gen_bool(0.5)
    }
}

/// Заранее записанная последовательность бросков (replay, тесты)
///
/// Когда запись кончилась: возвращает `fallback`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    bits: VecDeque<bool>,
    fallback: bool,
    drawn: usize,
}

impl ScriptedRolls {
    pub fn new(bits: impl IntoIterator<Item = bool>) -> Self {
        Self {
            bits: bits.into_iter().collect(),
            fallback: false,
            drawn: 0,
        }
    }

    /// Всегда один и тот же бит
    pub fn always(bit: bool) -> Self {
        Self {
            bits: VecDeque::new(),
            fallback: bit,
            drawn: 0,
        }
    }

    /// Сколько бросков уже потрачено
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl AggroRoll for ScriptedRolls {
    fn roll_bit(&mut self) -> bool {
        self.drawn += 1;
        self.bits.pop_front().unwrap_or(self.fallback)
    }
}

/// Эскалация: bit=1 → Chase, bit=0 → ZigZag. В ZigZag no-op (не перебрасываем посреди рывка).
///
/// Возвращает состояние после вызова.
pub fn trigger_aggro<R: AggroRoll + ?Sized>(
    machine: &mut StateMachine,
    rng: &mut R,
) -> ShinobiState {
    if machine.state() == ShinobiState::ZigZag {
        return machine.state();
    }

    let next = if rng.roll_bit() {
        ShinobiState::Chase
    } else {
        ShinobiState::ZigZag
    };
    crate::log(&format!("🎲 Shinobi: aggro roll → {}", next));
    machine.set_state(next);
    machine.state()
}

/// Повторная оценка после Idle: в радиусе (включительно) aggro, иначе назад в Follow
pub fn decide_aggro<R: AggroRoll + ?Sized>(
    machine: &mut StateMachine,
    rng: &mut R,
) -> ShinobiState {
    let context = machine.context();
    let distance = context.distance_to_target();

    if context.is_target_in_chase_range() {
        crate::log(&format!(
            "Shinobi: decide aggro: target at {:.2} (≤ {:.2}), escalating",
            distance, context.config.chase_distance
        ));
        trigger_aggro(machine, rng)
    } else {
        crate::log(&format!(
            "Shinobi: decide aggro: target at {:.2} out of range, back to follow",
            distance
        ));
        machine.set_state(ShinobiState::Follow);
        machine.state()
    }
}
