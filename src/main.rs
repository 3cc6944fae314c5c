//! defercall demo entry point.
//!
//! Schedules one deferred call of every flavor into a play world, plus one
//! into an editor world, then runs a fixed-step loop and logs each firing:
//!
//! - a closure after one second, and another on the very next tick
//! - a by-name callback resolved through the play world's `CallbackStore`
//! - a method-style call on a spawned entity with a captured argument
//! - a repeating method call on a plain shared object until it reports done
//! - a per-tick functor that retires itself after a few frames
//! - a retriggerable reminder whose countdown is pushed back mid-run
//!
//! # Running
//!
//! ```sh
//! cargo run -- --run-for 8 --timestep 0.1
//! ```
//!
//! Settings can also come from an INI file, see
//! [`DemoConfig`](defercall::resources::democonfig::DemoConfig).

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;
use clap::Parser;

use defercall::resources::delaystore::{AUTO_SLOT, DelayStore};
use defercall::resources::democonfig::DemoConfig;
use defercall::resources::worldtime::WorldTime;
use defercall::schedule::{
    register_callback, run_on_tick, schedule_by_name, schedule_callable,
    schedule_callable_next_tick, schedule_member, schedule_raw_repeating,
};
use defercall::worlds::{WorldKind, Worlds};

/// Deferred call scheduling demo
#[derive(Parser)]
#[command(version, about = "Schedules one deferred call of every flavor and runs a fixed-step loop")]
struct Cli {
    /// Simulated seconds to run for.
    #[arg(long, value_name = "SECONDS")]
    run_for: Option<f32>,

    /// Fixed timestep in seconds.
    #[arg(long, value_name = "SECONDS")]
    timestep: Option<f32>,

    /// Time scale applied to the play world.
    #[arg(long, value_name = "FACTOR")]
    time_scale: Option<f32>,

    /// Path to an INI config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Component)]
struct Label(String);

struct Beacon {
    hits: u32,
}

impl Beacon {
    fn ping(&mut self, name: String) -> bool {
        self.hits += 1;
        log::info!("Beacon '{}' ping {} of 3", name, self.hits);
        self.hits >= 3
    }
}

/// By-name callback: greet the target entity. Always done after one firing.
fn announce(entity: In<Entity>, labels: Query<&Label>, time: Res<WorldTime>) -> bool {
    if let Ok(label) = labels.get(*entity) {
        log::info!("[{:.2}s] by-name callback reached '{}'", time.elapsed, label.0);
    }
    true
}

fn wave(world: &mut World, entity: Entity, greeting: String) {
    let elapsed = world.resource::<WorldTime>().elapsed;
    if let Some(label) = world.get::<Label>(entity) {
        log::info!("[{:.2}s] '{}' says: {}", elapsed, label.0, greeting);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DemoConfig::with_path(path.clone()),
        None => DemoConfig::new(),
    };
    config.load_from_file().ok(); // ignore errors, use defaults
    if let Some(run_for) = cli.run_for {
        config.run_for = run_for;
    }
    if let Some(timestep) = cli.timestep {
        config.timestep = timestep;
    }
    if let Some(time_scale) = cli.time_scale {
        config.time_scale = time_scale;
    }
    config.sanitize();

    log::info!(
        "Running for {}s of simulated time at {}s per step",
        config.run_for,
        config.timestep
    );

    let mut worlds = Worlds::new();
    worlds.add_world(WorldKind::Editor);

    let hero = {
        let play = worlds.add_world(WorldKind::Play);
        play.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
        play.insert_resource(config.clone());

        let hero = play.spawn(Label("hero".to_string())).id();
        register_callback(play, "announce", announce);

        // One action of each flavor.
        schedule_by_name(play, hero, AUTO_SLOT, "announce", 2.0, false);
        schedule_member(play, hero, AUTO_SLOT, 2.5, false, wave, "hello".to_string());
        schedule_callable_next_tick(play, |world| {
            let elapsed = world.resource::<WorldTime>().elapsed;
            log::info!("[{:.2}s] next-tick closure ran", elapsed);
        });
        run_on_tick(play, |world, dt| {
            let frame = world.resource::<WorldTime>().frame_count;
            log::info!("per-tick functor: frame {} (dt {:.2}s)", frame, dt);
            frame >= 3
        });
        hero
    };

    // Closure flavor through the facade: lands on the play world.
    worlds.schedule_callable(AUTO_SLOT, 1.0, false, |world| {
        let elapsed = world.resource::<WorldTime>().elapsed;
        log::info!("[{:.2}s] one-second closure ran", elapsed);
    });

    // Raw flavor: the scheduler holds only a weak handle to the beacon.
    let beacon = Arc::new(Mutex::new(Beacon { hits: 0 }));
    if let Some(play) = worlds.find_world(|kind, _| kind == WorldKind::Play) {
        schedule_raw_repeating(
            play,
            &beacon,
            AUTO_SLOT,
            1.5,
            false,
            Beacon::ping,
            "demo".to_string(),
        );
    }

    // A retriggerable reminder under a caller-chosen slot; pushed back below.
    const REMINDER_SLOT: i32 = 7;
    worlds.schedule_callable(REMINDER_SLOT, 3.0, true, |world| {
        let elapsed = world.resource::<WorldTime>().elapsed;
        log::info!("[{:.2}s] reminder fired", elapsed);
    });

    // Something for the editor world too, so every world visibly ticks.
    if let Some(editor) = worlds.find_world(|kind, _| kind == WorldKind::Editor) {
        schedule_callable(editor, AUTO_SLOT, 2.0, false, |world| {
            let elapsed = world.resource::<WorldTime>().elapsed;
            log::info!("[{:.2}s] editor-world closure ran", elapsed);
        });
    }

    let steps = (config.run_for / config.timestep).ceil() as u32;
    let mut retriggered = false;
    for _ in 0..steps {
        worlds.tick(config.timestep);

        let elapsed = worlds
            .find_world(|kind, _| kind == WorldKind::Play)
            .map_or(0.0, |world| world.resource::<WorldTime>().elapsed);
        if !retriggered && elapsed >= 1.0 {
            // Same slot, retriggerable: only the countdown restarts, so the
            // reminder now fires three seconds from here.
            worlds.schedule_callable(REMINDER_SLOT, 3.0, true, |_world| {
                log::info!("this message never appears, the original closure is kept");
            });
            log::info!("[{:.2}s] reminder reset to fire three seconds from now", elapsed);
            retriggered = true;
        }
    }

    let leftover = worlds
        .world_of(hero)
        .map_or(0, |world| world.resource::<DelayStore>().len());
    log::info!("Loop done, play world still holds {} pending call(s)", leftover);

    // Tearing a world down cancels its remaining actions without firing them.
    worlds.retain_worlds(|kind, _| kind == WorldKind::Editor);
    log::info!("Play world dropped, {} world(s) remain", worlds.len());
}
