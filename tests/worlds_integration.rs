//! Integration tests for the world pool: per-world resources, play-over-editor
//! preference, by-name routing, the shared frame loop, and teardown.

use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;

use defercall::resources::callbackstore::CallbackStore;
use defercall::resources::delaystore::{AUTO_SLOT, DelayStore, INVALID_SLOT};
use defercall::resources::worldtime::WorldTime;
use defercall::schedule::{register_callback, schedule_callable};
use defercall::worlds::{WorldKind, Worlds};

const EPSILON: f32 = 1e-6;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_counter() -> (Arc<Mutex<u32>>, impl FnMut(&mut World) + Send + Sync + 'static) {
    let counter = Arc::new(Mutex::new(0u32));
    let handle = counter.clone();
    let f = move |_world: &mut World| {
        *handle.lock().unwrap() += 1;
    };
    (counter, f)
}

#[derive(Component)]
struct Score(i32);

fn bump_score(entity: In<Entity>, mut scores: Query<&mut Score>) -> bool {
    if let Ok(mut score) = scores.get_mut(*entity) {
        score.0 += 1;
    }
    true
}

// =============================================================================
// World Pool Tests
// =============================================================================

#[test]
fn add_world_preconfigures_the_delay_resources() {
    let mut worlds = Worlds::new();
    assert!(worlds.is_empty());

    let world = worlds.add_world(WorldKind::Play);
    assert!(world.get_resource::<WorldTime>().is_some());
    assert!(world.get_resource::<DelayStore>().is_some());
    assert!(world.get_resource::<CallbackStore>().is_some());
    assert!(approx_eq(world.resource::<WorldTime>().time_scale, 1.0));
}

#[test]
fn scheduling_prefers_the_play_world() {
    let mut worlds = Worlds::new();
    worlds.add_world(WorldKind::Editor);
    worlds.add_world(WorldKind::Play);

    let (counter, f) = make_counter();
    let slot = worlds.schedule_callable(AUTO_SLOT, 0.5, false, f);
    assert!(slot >= 0);

    let play = worlds
        .find_world(|kind, _| kind == WorldKind::Play)
        .unwrap()
        .resource::<DelayStore>()
        .len();
    let editor = worlds
        .find_world(|kind, _| kind == WorldKind::Editor)
        .unwrap()
        .resource::<DelayStore>()
        .len();
    assert_eq!(play, 1);
    assert_eq!(editor, 0);

    worlds.tick(0.5);
    assert_eq!(*counter.lock().unwrap(), 1);
}

#[test]
fn scheduling_falls_back_to_the_editor_world() {
    let mut worlds = Worlds::new();
    worlds.add_world(WorldKind::Editor);

    let (counter, f) = make_counter();
    let slot = worlds.schedule_callable(AUTO_SLOT, 0.5, false, f);
    assert!(slot >= 0);

    worlds.tick(0.5);
    assert_eq!(*counter.lock().unwrap(), 1);
}

#[test]
fn scheduling_with_no_worlds_is_rejected() {
    let mut worlds = Worlds::new();

    let slot = worlds.schedule_callable(AUTO_SLOT, 1.0, false, |_world: &mut World| {});
    assert_eq!(slot, INVALID_SLOT);

    let slot = worlds.run_on_tick(|_world: &mut World, _dt: f32| true);
    assert_eq!(slot, INVALID_SLOT);
}

#[test]
fn by_name_routes_to_the_world_owning_the_target() {
    let mut worlds = Worlds::new();
    let hero = {
        let editor = worlds.add_world(WorldKind::Editor);
        register_callback(editor, "bump_score", bump_score);
        editor.spawn(Score(0)).id()
    };
    // A play world is present and normally preferred, but the target lives
    // in the editor world.
    worlds.add_world(WorldKind::Play);

    let slot = worlds.schedule_by_name(hero, AUTO_SLOT, "bump_score", 0.5, false);
    assert!(slot >= 0);
    worlds.tick(0.5);

    let editor = worlds
        .find_world(|kind, _| kind == WorldKind::Editor)
        .unwrap();
    assert_eq!(editor.get::<Score>(hero).unwrap().0, 1);
}

#[test]
fn facade_run_on_tick_uses_the_preferred_world() {
    let mut worlds = Worlds::new();
    worlds.add_world(WorldKind::Editor);
    worlds.add_world(WorldKind::Play);

    let deltas = Arc::new(Mutex::new(Vec::new()));
    {
        let deltas = deltas.clone();
        worlds.run_on_tick(move |_world, dt| {
            deltas.lock().unwrap().push(dt);
            true
        });
    }
    let play = worlds
        .find_world(|kind, _| kind == WorldKind::Play)
        .unwrap()
        .resource::<DelayStore>()
        .len();
    assert_eq!(play, 1);

    worlds.tick(0.25);
    assert_eq!(*deltas.lock().unwrap(), vec![0.25]);
}

#[test]
fn raw_facade_fires_on_the_preferred_world() {
    struct Beacon {
        hits: u32,
    }

    let mut worlds = Worlds::new();
    worlds.add_world(WorldKind::Play);

    let beacon = Arc::new(Mutex::new(Beacon { hits: 0 }));
    let slot = worlds.schedule_raw(
        &beacon,
        AUTO_SLOT,
        1.0,
        false,
        |beacon: &mut Beacon, _args: ()| {
            beacon.hits += 1;
        },
        (),
    );
    assert!(slot >= 0);

    worlds.tick(0.5);
    assert_eq!(beacon.lock().unwrap().hits, 0);
    worlds.tick(0.5);
    assert_eq!(beacon.lock().unwrap().hits, 1);
}

// =============================================================================
// Frame Loop Tests
// =============================================================================

#[test]
fn tick_advances_every_world() {
    let mut worlds = Worlds::new();
    worlds.add_world(WorldKind::Editor);
    worlds.add_world(WorldKind::Play);

    let (editor_counter, editor_f) = make_counter();
    {
        let editor = worlds
            .find_world(|kind, _| kind == WorldKind::Editor)
            .unwrap();
        schedule_callable(editor, AUTO_SLOT, 1.0, false, editor_f);
    }
    let (play_counter, play_f) = make_counter();
    worlds.schedule_callable(AUTO_SLOT, 1.5, false, play_f);

    for _ in 0..3 {
        worlds.tick(0.5);
    }

    assert_eq!(*editor_counter.lock().unwrap(), 1);
    assert_eq!(*play_counter.lock().unwrap(), 1);
    worlds.for_each_world(|_, world| {
        let time = world.resource::<WorldTime>();
        assert!(approx_eq(time.elapsed, 1.5));
        assert!(approx_eq(time.delta, 0.5));
        assert_eq!(time.frame_count, 3);
    });
}

#[test]
fn a_paused_world_still_delivers_zero_duration_calls() {
    let mut worlds = Worlds::new();
    {
        let world = worlds.add_world(WorldKind::Play);
        world.resource_mut::<WorldTime>().time_scale = 0.0;
    }

    let (timed, timed_f) = make_counter();
    worlds.schedule_callable(AUTO_SLOT, 1.0, false, timed_f);
    let (immediate, immediate_f) = make_counter();
    worlds.schedule_callable(AUTO_SLOT, 0.0, false, immediate_f);

    for _ in 0..5 {
        worlds.tick(0.5);
    }

    // Scaled time never advances, so the timed call stays pending while the
    // zero-duration call goes out on the first frame regardless.
    assert_eq!(*timed.lock().unwrap(), 0);
    assert_eq!(*immediate.lock().unwrap(), 1);

    let world = worlds.find_world(|_, _| true).unwrap();
    assert_eq!(world.resource::<DelayStore>().len(), 1);
    assert!(approx_eq(world.resource::<WorldTime>().elapsed, 0.0));
    assert_eq!(world.resource::<WorldTime>().frame_count, 5);
}

// =============================================================================
// Teardown Tests
// =============================================================================

#[test]
fn dropping_a_world_discards_its_pending_actions() {
    let mut worlds = Worlds::new();
    worlds.add_world(WorldKind::Editor);
    worlds.add_world(WorldKind::Play);

    let (counter, f) = make_counter();
    worlds.schedule_callable(AUTO_SLOT, 1.0, false, f);
    assert_eq!(worlds.len(), 2);

    // The play world goes away before the deadline.
    worlds.retain_worlds(|kind, _| kind == WorldKind::Editor);
    assert_eq!(worlds.len(), 1);

    for _ in 0..4 {
        worlds.tick(0.5);
    }
    assert_eq!(*counter.lock().unwrap(), 0);
}
