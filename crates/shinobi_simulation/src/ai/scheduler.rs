//! Cooperative scheduler для отложенных/пошаговых действий
//!
//! Замена корутин: каждая последовательность это список шагов
//! (опциональная телепортация + задержка) и completion-тег.
//! Продвигается только явным `advance(dt)` раз в тик, никаких потоков.
//!
//! Completion это данные (tagged variant), а не замыкание. Решение что делать
//! принимает владелец (StateMachine), у которого есть доступ к контексту.

use std::collections::VecDeque;

use bevy::prelude::*;

/// Допуск на накопление ошибки f32 (3 × 0.15 должно закончиться ровно за три тика по 0.15)
pub const TIME_EPSILON: f32 = 1e-5;

/// Идентификатор запланированной последовательности
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceHandle(u64);

/// Шаг последовательности: позиция применяется в момент начала шага, затем ждём delay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceStep {
    pub position: Option<Vec3>,
    pub delay: f32,
}

impl SequenceStep {
    pub fn wait(delay: f32) -> Self {
        Self {
            position: None,
            delay,
        }
    }

    pub fn teleport(position: Vec3, delay: f32) -> Self {
        Self {
            position: Some(position),
            delay,
        }
    }
}

/// Что сделать когда последовательность отработала до конца
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceCompletion {
    /// ZigZag закончен → Idle
    EnterIdle,
    /// Sweep закончен → Idle + вернуть transitions_enabled
    FinishSweep,
    /// Idle подождал → DecideAggro
    DecideAggro,
}

/// Событие, выпущенное scheduler'ом за тик (в порядке наступления)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledEvent {
    ApplyPosition {
        handle: SequenceHandle,
        position: Vec3,
    },
    Completed {
        handle: SequenceHandle,
        completion: SequenceCompletion,
    },
}

#[derive(Debug, Clone)]
struct ScheduledSequence {
    handle: SequenceHandle,
    steps: VecDeque<SequenceStep>,
    /// Сколько осталось ждать на текущем шаге
    remaining: f32,
    /// Позиция текущего шага уже выпущена
    position_applied: bool,
    completion: SequenceCompletion,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    next_id: u64,
    sequences: Vec<ScheduledSequence>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Зарегистрировать последовательность. Отсчёт начинается со следующего `advance`.
    pub fn schedule(
        &mut self,
        steps: impl IntoIterator<Item = SequenceStep>,
        completion: SequenceCompletion,
    ) -> SequenceHandle {
        let handle = SequenceHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let steps: VecDeque<SequenceStep> = steps
            .into_iter()
            .map(|step| SequenceStep {
                delay: step.delay.max(0.0),
                ..step
            })
            .collect();
        let remaining = steps.front().map(|step| step.delay).unwrap_or(0.0);

        self.sequences.push(ScheduledSequence {
            handle,
            steps,
            remaining,
            position_applied: false,
            completion,
        });

        handle
    }

    /// Снять последовательность до завершения. Completion не сработает.
    ///
    /// Неизвестный/уже завершённый handle: no-op (`false`).
    pub fn cancel(&mut self, handle: SequenceHandle) -> bool {
        let before = self.sequences.len();
        self.sequences.retain(|sequence| sequence.handle != handle);
        self.sequences.len() != before
    }

    /// Сбросить всё (уничтожение агента)
    pub fn clear(&mut self) {
        self.sequences.clear();
    }

    pub fn is_pending(&self, handle: SequenceHandle) -> bool {
        self.sequences.iter().any(|sequence| sequence.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Продвинуть все активные последовательности на `dt`
    ///
    /// Остаток времени переносится на следующий шаг. Завершённые записи удаляются,
    /// `Completed` выпускается ровно один раз.
    pub fn advance(&mut self, dt: f32) -> Vec<ScheduledEvent> {
        let mut events = Vec::new();

        self.sequences.retain_mut(|sequence| {
            let finished = advance_sequence(sequence, dt.max(0.0), &mut events);
            !finished
        });

        events
    }
}

/// Возвращает true если последовательность завершилась
fn advance_sequence(
    sequence: &mut ScheduledSequence,
    mut budget: f32,
    events: &mut Vec<ScheduledEvent>,
) -> bool {
    loop {
        let Some(step) = sequence.steps.front() else {
            events.push(ScheduledEvent::Completed {
                handle: sequence.handle,
                completion: sequence.completion,
            });
            return true;
        };

        if !sequence.position_applied {
            if let Some(position) = step.position {
                events.push(ScheduledEvent::ApplyPosition {
                    handle: sequence.handle,
                    position,
                });
            }
            sequence.position_applied = true;
        }

        if budget + TIME_EPSILON < sequence.remaining {
            sequence.remaining -= budget;
            return false;
        }

        // Шаг завершён: переносим остаток на следующий
        budget = (budget - sequence.remaining).max(0.0);
        sequence.steps.pop_front();
        sequence.position_applied = false;
        sequence.remaining = sequence.steps.front().map(|step| step.delay).unwrap_or(0.0);
    }
}
