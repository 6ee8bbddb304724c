//! Tests for the round schedule.

#[cfg(test)]
mod tests {
    use super::super::director::*;
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f32 = 1.0 / 60.0;

    fn directive(count: u32, cadence: f32, start_delay: f32) -> SpawnDirective {
        SpawnDirective {
            count,
            cadence,
            start_delay,
            points: vec![[100.0, 0.0]],
            ..Default::default()
        }
    }

    fn single_round(spawns: Vec<SpawnDirective>) -> RoundsConfig {
        RoundsConfig {
            rounds: vec![RoundConfig { spawns }],
            ..Default::default()
        }
    }

    /// Tick `ticks` times, tracking every requested spawn as a fresh entity.
    fn run(director: &mut RoundDirector, config: &RoundsConfig, ticks: usize, next_id: &mut u32) -> RoundTick {
        let mut total = RoundTick::default();
        for _ in 0..ticks {
            let step = director.tick(config, DT);
            for index in &step.spawns {
                director.track(Entity::from_raw(*next_id));
                *next_id += 1;
                total.spawns.push(*index);
            }
            total.events.extend(step.events);
        }
        total
    }

    #[test]
    fn test_nothing_happens_before_start() {
        let config = single_round(vec![directive(3, 0.0, 0.0)]);
        let mut director = RoundDirector::new();
        let step = director.tick(&config, DT);
        assert!(step.spawns.is_empty());
        assert!(step.events.is_empty());
        assert_eq!(director.phase(), RoundPhase::NotStarted);
        assert_eq!(director.current_round(), 0);
    }

    #[test]
    fn test_batch_spawns_after_delay() {
        let config = single_round(vec![directive(3, 0.0, 0.5)]);
        let mut director = RoundDirector::new();
        director.start_first_round();
        let mut ids = 1;

        let early = run(&mut director, &config, 25, &mut ids);
        assert_eq!(early.events, vec![RoundEvent::Started { round: 1 }]);
        assert!(early.spawns.is_empty());

        let later = run(&mut director, &config, 10, &mut ids);
        assert_eq!(later.spawns, vec![0, 0, 0]);
        assert_eq!(director.phase(), RoundPhase::Fighting);
        assert_eq!(director.remaining_enemies(), 3);
    }

    #[test]
    fn test_cadence_spreads_spawns() {
        assert_eq!(directive(3, 0.5, 0.0).due_by(0.0), 1);
        assert_eq!(directive(3, 0.5, 0.0).due_by(0.49), 1);
        assert_eq!(directive(3, 0.5, 0.0).due_by(0.5), 2);
        assert_eq!(directive(3, 0.5, 0.0).due_by(5.0), 3);
        assert_eq!(directive(3, 0.5, 1.0).due_by(0.9), 0);

        let config = single_round(vec![directive(3, 0.5, 0.0)]);
        let mut director = RoundDirector::new();
        director.start_first_round();
        let mut ids = 1;

        // ~0.25 s in: only the first enemy
        assert_eq!(run(&mut director, &config, 15, &mut ids).spawns.len(), 1);
        assert_eq!(director.phase(), RoundPhase::Spawning);
        // ~1.1 s in: all three
        assert_eq!(run(&mut director, &config, 51, &mut ids).spawns.len(), 2);
        assert_eq!(director.phase(), RoundPhase::Fighting);
    }

    #[test]
    fn test_clear_waits_for_all_enemies() {
        let config = single_round(vec![directive(2, 0.0, 0.0)]);
        let mut director = RoundDirector::new();
        director.start_first_round();
        let mut ids = 1;
        run(&mut director, &config, 2, &mut ids);

        let first = director.alive()[0];
        director.retain_alive(|enemy| enemy != first);
        let step = run(&mut director, &config, 5, &mut ids);
        assert!(step.events.is_empty());
        assert_eq!(director.remaining_enemies(), 1);

        director.retain_alive(|_| false);
        let step = run(&mut director, &config, 1, &mut ids);
        assert_eq!(step.events, vec![RoundEvent::Cleared { round: 1 }]);
        assert!(matches!(director.phase(), RoundPhase::Cleared { next_in: Some(_) }));
    }

    #[test]
    fn test_auto_advance_then_all_complete() {
        let mut config = single_round(vec![directive(1, 0.0, 0.0)]);
        config.rounds.push(RoundConfig {
            spawns: vec![directive(2, 0.0, 0.0)],
        });
        let mut director = RoundDirector::new();
        director.start_first_round();
        let mut ids = 1;

        run(&mut director, &config, 1, &mut ids);
        director.retain_alive(|_| false);
        let cleared = run(&mut director, &config, 1, &mut ids);
        assert_eq!(cleared.events, vec![RoundEvent::Cleared { round: 1 }]);

        // Default inter-round delay is 1 s
        let waiting = run(&mut director, &config, 50, &mut ids);
        assert!(waiting.events.is_empty());
        let second = run(&mut director, &config, 15, &mut ids);
        assert_eq!(second.events, vec![RoundEvent::Started { round: 2 }]);
        assert_eq!(second.spawns, vec![0, 0]);
        assert_eq!(director.current_round(), 2);

        director.retain_alive(|_| false);
        let done = run(&mut director, &config, 70, &mut ids);
        assert_eq!(
            done.events,
            vec![RoundEvent::Cleared { round: 2 }, RoundEvent::AllComplete]
        );
        assert_eq!(director.phase(), RoundPhase::Complete);

        // Complete is terminal
        assert!(run(&mut director, &config, 120, &mut ids).events.is_empty());
    }

    #[test]
    fn test_manual_advance_waits_for_host() {
        let mut config = single_round(vec![directive(1, 0.0, 0.0)]);
        config.auto_advance = false;
        config.rounds.push(RoundConfig {
            spawns: vec![directive(1, 0.0, 0.0)],
        });
        let mut director = RoundDirector::new();
        director.start_first_round();
        let mut ids = 1;

        run(&mut director, &config, 1, &mut ids);
        director.retain_alive(|_| false);
        run(&mut director, &config, 1, &mut ids);
        assert_eq!(director.phase(), RoundPhase::Cleared { next_in: None });
        assert!(run(&mut director, &config, 300, &mut ids).events.is_empty());

        director.start_next_round();
        let step = run(&mut director, &config, 1, &mut ids);
        assert_eq!(step.events, vec![RoundEvent::Started { round: 2 }]);
        assert_eq!(step.spawns, vec![0]);
    }

    #[test]
    fn test_spawn_position_sources() {
        let config = RoundsConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let pinned = directive(1, 0.0, 0.0);
        assert_eq!(
            choose_spawn_position(&pinned, &config, Vec2::ZERO, &mut rng),
            Vec2::new(100.0, 0.0)
        );

        let boxed = SpawnDirective {
            area: Some(SpawnArea {
                x: -50.0,
                y: 10.0,
                width: 100.0,
                height: 20.0,
            }),
            ..Default::default()
        };
        for _ in 0..50 {
            let position = choose_spawn_position(&boxed, &config, Vec2::ZERO, &mut rng);
            assert!((-50.0..=50.0).contains(&position.x));
            assert!((10.0..=30.0).contains(&position.y));
        }

        let around = SpawnDirective::default();
        let anchor = Vec2::new(40.0, -40.0);
        for _ in 0..50 {
            let distance = choose_spawn_position(&around, &config, anchor, &mut rng).distance(anchor);
            assert!(distance >= 200.0 - 1e-3 && distance <= 350.0 + 1e-3);
        }
    }
}
