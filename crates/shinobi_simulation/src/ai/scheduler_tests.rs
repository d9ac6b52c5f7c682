//! Tests for cooperative scheduler.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use proptest::prelude::*;

    use super::super::scheduler::{
        ScheduledEvent, Scheduler, SequenceCompletion, SequenceStep,
    };

    fn completions(events: &[ScheduledEvent]) -> Vec<SequenceCompletion> {
        events
            .iter()
            .filter_map(|event| match event {
                ScheduledEvent::Completed { completion, .. } => Some(*completion),
                ScheduledEvent::ApplyPosition { .. } => None,
            })
            .collect()
    }

    fn positions(events: &[ScheduledEvent]) -> Vec<Vec3> {
        events
            .iter()
            .filter_map(|event| match event {
                ScheduledEvent::ApplyPosition { position, .. } => Some(*position),
                ScheduledEvent::Completed { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_single_delay_fires_once() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule([SequenceStep::wait(1.5)], SequenceCompletion::DecideAggro);

        assert!(completions(&scheduler.advance(1.0)).is_empty());
        assert_eq!(
            completions(&scheduler.advance(0.5)),
            vec![SequenceCompletion::DecideAggro]
        );
        assert!(scheduler.is_empty());

        // Больше не стреляет
        assert!(scheduler.advance(10.0).is_empty());
    }

    #[test]
    fn test_three_steps_of_0_15_finish_in_three_ticks() {
        let mut scheduler = Scheduler::new();
        let p1 = Vec3::new(1.0, 0.0, 0.0);
        let p2 = Vec3::new(2.0, 0.0, 0.0);
        let p3 = Vec3::new(3.0, 0.0, 0.0);
        scheduler.schedule(
            [
                SequenceStep::teleport(p1, 0.15),
                SequenceStep::teleport(p2, 0.15),
                SequenceStep::teleport(p3, 0.15),
            ],
            SequenceCompletion::EnterIdle,
        );

        let tick1 = scheduler.advance(0.15);
        assert_eq!(positions(&tick1), vec![p1, p2]);
        assert!(completions(&tick1).is_empty());

        let tick2 = scheduler.advance(0.15);
        assert_eq!(positions(&tick2), vec![p3]);
        assert!(completions(&tick2).is_empty());

        let tick3 = scheduler.advance(0.15);
        assert!(positions(&tick3).is_empty());
        assert_eq!(completions(&tick3), vec![SequenceCompletion::EnterIdle]);
    }

    #[test]
    fn test_zero_dt_applies_first_position_without_consuming_time() {
        let mut scheduler = Scheduler::new();
        let p1 = Vec3::new(0.0, 0.0, 4.0);
        scheduler.schedule([SequenceStep::teleport(p1, 0.15)], SequenceCompletion::EnterIdle);

        let events = scheduler.advance(0.0);
        assert_eq!(positions(&events), vec![p1]);
        assert!(completions(&events).is_empty());

        // Позиция не выпускается повторно
        let events = scheduler.advance(0.1);
        assert!(events.is_empty());
    }

    #[test]
    fn test_large_tick_carries_over_all_steps() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(
            [
                SequenceStep::teleport(Vec3::X, 0.15),
                SequenceStep::teleport(Vec3::Y, 0.15),
                SequenceStep::teleport(Vec3::Z, 0.15),
            ],
            SequenceCompletion::EnterIdle,
        );

        let events = scheduler.advance(1.0);
        assert_eq!(positions(&events), vec![Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(completions(&events), vec![SequenceCompletion::EnterIdle]);

        // Порядок: completion после последней позиции
        assert!(matches!(events.last(), Some(ScheduledEvent::Completed { .. })));
    }

    #[test]
    fn test_small_ticks_accumulate_within_epsilon() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(
            [
                SequenceStep::wait(0.15),
                SequenceStep::wait(0.15),
                SequenceStep::wait(0.15),
            ],
            SequenceCompletion::EnterIdle,
        );

        // 9 тиков по 0.05 = 0.45
        let mut fired_at = None;
        for tick in 1..=12 {
            if !completions(&scheduler.advance(0.05)).is_empty() {
                fired_at = Some(tick);
                break;
            }
        }
        assert_eq!(fired_at, Some(9));
    }

    #[test]
    fn test_cancel_prevents_completion() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule([SequenceStep::wait(2.0)], SequenceCompletion::FinishSweep);

        scheduler.advance(1.0);
        assert!(scheduler.is_pending(handle));
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.is_pending(handle));

        assert!(scheduler.advance(5.0).is_empty());
    }

    #[test]
    fn test_cancel_unknown_or_completed_is_noop() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule([SequenceStep::wait(0.1)], SequenceCompletion::EnterIdle);
        scheduler.advance(0.2);

        assert!(!scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
    }

    #[test]
    fn test_handles_are_unique_and_cancel_is_targeted() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule([SequenceStep::wait(1.0)], SequenceCompletion::EnterIdle);
        let second = scheduler.schedule([SequenceStep::wait(1.0)], SequenceCompletion::DecideAggro);
        assert_ne!(first, second);

        scheduler.cancel(first);
        let events = scheduler.advance(1.0);
        assert_eq!(
            events,
            vec![ScheduledEvent::Completed {
                handle: second,
                completion: SequenceCompletion::DecideAggro,
            }]
        );
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule([SequenceStep::wait(1.0)], SequenceCompletion::EnterIdle);
        scheduler.schedule([SequenceStep::wait(2.0)], SequenceCompletion::FinishSweep);
        assert_eq!(scheduler.len(), 2);

        scheduler.clear();
        assert!(scheduler.is_empty());
        assert!(scheduler.advance(10.0).is_empty());
    }

    proptest! {
        /// Completion ровно один раз и не раньше суммарной задержки
        #[test]
        fn prop_completion_fires_once_after_total_delay(
            delays in prop::collection::vec(0.01f32..1.0, 1..5),
            ticks in prop::collection::vec(0.01f32..0.5, 1..200),
        ) {
            let mut scheduler = Scheduler::new();
            let steps: Vec<SequenceStep> = delays
                .iter()
                .enumerate()
                .map(|(i, delay)| SequenceStep::teleport(Vec3::splat(i as f32), *delay))
                .collect();
            scheduler.schedule(steps, SequenceCompletion::EnterIdle);

            let total: f64 = delays.iter().map(|d| *d as f64).sum();
            let mut elapsed = 0.0f64;
            let mut fired = 0;
            let mut applied = Vec::new();

            for dt in &ticks {
                elapsed += *dt as f64;
                let events = scheduler.advance(*dt);
                applied.extend(positions(&events));
                let count = completions(&events).len();
                if count > 0 {
                    prop_assert!(elapsed + 1e-3 >= total, "fired early: {} < {}", elapsed, total);
                }
                fired += count;
            }

            prop_assert!(fired <= 1);
            if elapsed >= total + 1e-3 {
                prop_assert_eq!(fired, 1);
                let expected: Vec<Vec3> = (0..delays.len()).map(|i| Vec3::splat(i as f32)).collect();
                prop_assert_eq!(applied, expected);
            }
        }
    }
}
