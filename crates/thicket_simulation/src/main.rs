//! Headless Thicket arena
//!
//! Spawns a few trees, pickups and a turret-style player, lets the round
//! director send two waves, then runs fixed ticks and logs transitions, kills
//! and round signals.

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use thicket_simulation::arena::{spawn_ammo_crate, spawn_modifier_box, spawn_player, spawn_tree};
use thicket_simulation::rounds::{RoundConfig, SpawnArea};
use thicket_simulation::*;

const TICKS: usize = 1800;
const FIRE_EVERY: usize = 20;
const PUNCH_RANGE: f32 = 40.0;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    log_info(&format!("🌲 Starting Thicket headless arena (seed: {})", seed));

    let mut app = create_headless_app_with_config(seed, arena_config());
    let world = app.world_mut();

    for (x, y) in [(-120.0, -40.0), (-60.0, 90.0), (80.0, 60.0), (140.0, -100.0), (0.0, -150.0)] {
        spawn_tree(world, Vec2::new(x, y), 32.0);
    }
    let player = spawn_player(world, Vec2::ZERO, WeaponKind::AssaultRifle, [Element::Fire, Element::Lightning]);
    spawn_ammo_crate(world, Vec2::new(10.0, 10.0), WeaponKind::AssaultRifle, None);
    spawn_modifier_box(world, Vec2::new(-10.0, 0.0), None);
    world.resource_mut::<RoundDirector>().start_first_round();

    let mut transitions = EventCursor::<EnemyStateChanged>::default();
    let mut deaths = EventCursor::<EntityDied>::default();
    let mut rounds = EventCursor::<RoundEvent>::default();
    let mut pickups = EventCursor::<PickupCollected>::default();

    for tick in 0..TICKS {
        drive_player(app.world_mut(), player, tick);
        run_fixed_tick(&mut app);

        let world = app.world();
        for change in transitions.read(world.resource::<Events<EnemyStateChanged>>()) {
            log(&format!("tick {}: {:?} {:?} → {:?}", tick, change.entity, change.from, change.to));
        }
        for death in deaths.read(world.resource::<Events<EntityDied>>()) {
            log_info(&format!("tick {}: 💀 {:?} killed by {:?}", tick, death.entity, death.killer));
        }
        for collected in pickups.read(world.resource::<Events<PickupCollected>>()) {
            log(&format!("tick {}: {:?} collected {:?}", tick, collected.collector, collected.item));
        }
        let finished = rounds
            .read(world.resource::<Events<RoundEvent>>())
            .any(|event| *event == RoundEvent::AllComplete);

        if world.get::<Dead>(player).is_some() {
            log_info(&format!("tick {}: player down", tick));
            break;
        }
        if finished {
            log_info(&format!("tick {}: arena cleared", tick));
            break;
        }
    }

    let world = app.world();
    if let Some(health) = world.get::<Health>(player) {
        log_info(&format!("Player health: {}/{}", health.current(), health.max()));
    }
    log_info("Simulation complete!");
}

/// Two waves: a batch to the east, then a trickle from a box to the south-west.
fn arena_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.rounds.rounds = vec![
        RoundConfig {
            spawns: vec![SpawnDirective {
                count: 3,
                points: vec![[180.0, 0.0], [120.0, 160.0]],
                ..Default::default()
            }],
        },
        RoundConfig {
            spawns: vec![
                SpawnDirective {
                    count: 4,
                    cadence: 1.5,
                    start_delay: 0.5,
                    area: Some(SpawnArea {
                        x: -260.0,
                        y: -240.0,
                        width: 80.0,
                        height: 80.0,
                    }),
                    ..Default::default()
                },
                SpawnDirective::default(),
            ],
        },
    ];
    config
}

/// Stand-in for player input: grab nearby ammo, shoot at the nearest enemy,
/// punch when it is close.
fn drive_player(world: &mut World, player: Entity, tick: usize) {
    let Some(origin) = world.get::<WorldPosition>(player).map(|p| p.0) else {
        return;
    };
    if world.get::<Dead>(player).is_some() {
        return;
    }
    if tick % FIRE_EVERY == 0 {
        world.send_event(InteractIntent { actor: player });
    }

    let mut enemies = world.query_filtered::<&WorldPosition, (With<EnemyBrain>, Without<Dead>)>();
    let nearest = enemies
        .iter(world)
        .map(|position| position.0)
        .min_by(|a, b| origin.distance_squared(*a).total_cmp(&origin.distance_squared(*b)));
    let Some(target) = nearest else {
        return;
    };

    let aim = target - origin;
    if aim.length() < PUNCH_RANGE {
        if tick % FIRE_EVERY == 0 {
            let strike = MeleeStrike::punch(player, aim.normalize_or_zero(), &world.resource::<SimulationConfig>().combat);
            world.send_event(strike);
        }
        return;
    }

    let needs_reload = world
        .get::<WeaponStats>(player)
        .is_some_and(|weapon| weapon.current_ammo == 0);
    if needs_reload {
        world.send_event(ReloadIntent { shooter: player });
    } else if tick % FIRE_EVERY == 0 {
        world.send_event(WeaponFireIntent { shooter: player, aim });
    }
}
