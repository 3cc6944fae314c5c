//! Bevy ECS Integration Tests
//!
//! These tests pin the bevy_ecs behaviors the delayed-call machinery leans
//! on, so breaking changes surface here first when upgrading bevy_ecs.
//!
//! # Test Categories
//!
//! 1. **World & Resources** - the delay and callback stores are plain resources
//! 2. **Entity Liveness** - owner and target checks go through `World::get_entity`
//! 3. **Registered Callbacks** - named callbacks are `SystemId<In<Entity>, bool>`
//! 4. **Exclusive Systems** - delivery runs as an `&mut World` system
//!
//! # Usage
//!
//! Run these tests after upgrading bevy_ecs to detect API changes:
//!
//! ```sh
//! cargo test --test bevy_ecs_integration
//! ```

use bevy_ecs::prelude::*;
use std::sync::{Arc, Mutex};

#[derive(Component, Debug, Clone, PartialEq)]
struct Hp(i32);

#[derive(Resource, Debug, Default)]
struct Hits(u32);

// =============================================================================
// CATEGORY 1: World & Resource Tests
// =============================================================================

#[test]
fn resources_insert_and_mutate() {
    let mut world = World::new();
    world.insert_resource(Hits(0));

    {
        let mut hits = world.resource_mut::<Hits>();
        hits.0 += 3;
    }

    assert_eq!(world.resource::<Hits>().0, 3);
}

#[test]
fn missing_resources_read_as_none() {
    let mut world = World::new();

    assert!(world.get_resource::<Hits>().is_none());
    world.insert_resource(Hits(1));
    assert!(world.get_resource::<Hits>().is_some());
}

// =============================================================================
// CATEGORY 2: Entity Liveness Tests
// =============================================================================

#[test]
fn despawned_entities_report_dead() {
    let mut world = World::new();

    let entity = world.spawn(Hp(100)).id();
    assert!(world.get_entity(entity).is_ok());

    world.despawn(entity);
    assert!(world.get_entity(entity).is_err());
}

#[test]
fn stale_handles_stay_dead_after_slot_reuse() {
    // Pending actions hold `Entity` values across frames; a despawned
    // owner must never come back to life when its index is reused.
    let mut world = World::new();

    let first = world.spawn(Hp(100)).id();
    world.despawn(first);

    let second = world.spawn(Hp(50)).id();
    assert!(world.get_entity(second).is_ok());
    assert!(world.get_entity(first).is_err());
}

// =============================================================================
// CATEGORY 3: Registered Callback Tests
// =============================================================================

fn heal_target(entity: In<Entity>, mut query: Query<&mut Hp>) -> bool {
    if let Ok(mut hp) = query.get_mut(*entity) {
        hp.0 += 50;
    }
    true
}

#[test]
fn callback_systems_take_an_entity_and_report_done() {
    let mut world = World::new();
    let entity = world.spawn(Hp(100)).id();

    let id = world.register_system(heal_target);
    let done = world.run_system_with(id, entity).unwrap();

    assert!(done);
    assert_eq!(world.get::<Hp>(entity).unwrap().0, 150);
}

#[test]
fn closure_callbacks_register_like_functions() {
    let mut world = World::new();
    let entity = world.spawn_empty().id();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let id = world.register_system(move |In(entity): In<Entity>| -> bool {
        seen_clone.lock().unwrap().push(entity);
        true
    });

    world.run_system_with(id, entity).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], entity);
}

#[test]
fn system_ids_are_copyable_handles() {
    // The callback store hands out `SystemId` by value; both copies must
    // drive the same underlying system.
    let mut world = World::new();
    let entity = world.spawn(Hp(0)).id();

    let id = world.register_system(heal_target);
    let copy = id;

    world.run_system_with(id, entity).unwrap();
    world.run_system_with(copy, entity).unwrap();

    assert_eq!(world.get::<Hp>(entity).unwrap().0, 100);
}

#[test]
fn running_a_despawned_callback_fails() {
    // Registered systems are stored as entities in bevy_ecs 0.18+; if the
    // system entity goes away the run reports an error instead of panicking.
    let mut world = World::new();
    let entity = world.spawn(Hp(100)).id();

    let id = world.register_system(heal_target);
    world.despawn(id.entity());

    assert!(world.run_system_with(id, entity).is_err());
    assert_eq!(world.get::<Hp>(entity).unwrap().0, 100);
}

// =============================================================================
// CATEGORY 4: Exclusive System Tests
// =============================================================================

fn pump(world: &mut World) {
    world.resource_mut::<Hits>().0 += 1;
}

#[test]
fn exclusive_systems_run_inside_a_schedule() {
    let mut world = World::new();
    world.insert_resource(Hits(0));

    let mut schedule = Schedule::default();
    schedule.add_systems(pump);

    schedule.run(&mut world);
    schedule.run(&mut world);

    assert_eq!(world.resource::<Hits>().0, 2);
}
