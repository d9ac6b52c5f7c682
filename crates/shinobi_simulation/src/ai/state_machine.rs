//! State machine Shinobi: текущее состояние + контекст + scheduler
//!
//! Единственная точка смены состояния: `set_state` (exit → replace → entry,
//! синхронно, до возврата управления).

use crate::ai::context::AgentContext;
use crate::ai::policy::{self, AggroRoll};
use crate::ai::scheduler::{ScheduledEvent, Scheduler, SequenceCompletion, SequenceHandle};
use crate::ai::states::ShinobiState;
use crate::components::MovementCommand;

#[derive(Debug, Clone)]
pub struct StateMachine {
    current: ShinobiState,
    context: AgentContext,
    scheduler: Scheduler,
    /// Последовательность текущего состояния (не больше одной)
    owned_sequence: Option<SequenceHandle>,
    /// Счётчик реально выполненных переходов (exit+entry)
    transition_count: u64,
}

impl StateMachine {
    /// Init: entry hook начального состояния вызывается ровно один раз
    pub fn init(context: AgentContext, initial: ShinobiState) -> Self {
        let mut machine = Self {
            current: initial,
            context,
            scheduler: Scheduler::new(),
            owned_sequence: None,
            transition_count: 0,
        };
        machine.owned_sequence = initial.on_enter(&mut machine.context, &mut machine.scheduler);
        crate::log(&format!("Shinobi: FSM initialized in {}", initial));
        machine
    }

    pub fn state(&self) -> ShinobiState {
        self.current
    }

    pub fn context(&self) -> &AgentContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut AgentContext {
        &mut self.context
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn owned_sequence(&self) -> Option<SequenceHandle> {
        self.owned_sequence
    }

    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    /// Per-tick update активного состояния
    pub fn update(&self) -> MovementCommand {
        self.current.update(&self.context)
    }

    /// Переход в `next`. Тот же тег: no-op (без exit/entry, без повторного scheduling).
    ///
    /// Возвращает true если переход выполнен.
    pub fn set_state(&mut self, next: ShinobiState) -> bool {
        if next == self.current {
            return false;
        }

        let previous = self.current;
        let owned = self.owned_sequence.take();
        previous.on_exit(&mut self.context, &mut self.scheduler, owned);

        self.current = next;
        self.transition_count += 1;
        crate::log(&format!("🥷 Shinobi: {} → {}", previous, next));

        self.owned_sequence = next.on_enter(&mut self.context, &mut self.scheduler);
        true
    }

    /// Переход по внешнему запросу: отбрасывается пока transitions_enabled == false
    pub fn request_transition(&mut self, next: ShinobiState) -> bool {
        if !self.context.transitions_enabled {
            crate::log(&format!(
                "Shinobi: transition {} → {} dropped (transitions masked)",
                self.current, next
            ));
            return false;
        }
        self.set_state(next)
    }

    /// Продвинуть scheduler и выполнить сработавшие completion'ы
    ///
    /// События чужих (уже отменённых/заменённых) последовательностей игнорируются.
    pub fn advance_scheduler<R: AggroRoll + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        for event in self.scheduler.advance(dt) {
            match event {
                ScheduledEvent::ApplyPosition { handle, position } => {
                    if self.owned_sequence == Some(handle) {
                        self.context.position = position;
                        self.context.pending_teleport = Some(position);
                    }
                }
                ScheduledEvent::Completed { handle, completion } => {
                    if self.owned_sequence != Some(handle) {
                        continue;
                    }
                    self.owned_sequence = None;
                    self.complete(completion, rng);
                }
            }
        }
    }

    /// Агент уничтожен: все запланированные действия снимаются
    pub fn shutdown(&mut self) {
        self.scheduler.clear();
        self.owned_sequence = None;
    }

    fn complete<R: AggroRoll + ?Sized>(&mut self, completion: SequenceCompletion, rng: &mut R) {
        match completion {
            SequenceCompletion::EnterIdle => {
                self.set_state(ShinobiState::Idle);
            }
            SequenceCompletion::FinishSweep => {
                self.set_state(ShinobiState::Idle);
                self.context.transitions_enabled = true;
            }
            SequenceCompletion::DecideAggro => {
                policy::decide_aggro(self, rng);
            }
        }
    }
}
