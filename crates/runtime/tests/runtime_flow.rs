//! End-to-end runtime tests: commands go through the handle, the worker owns
//! the state, and events come back over the bus.

use std::sync::Arc;
use std::time::Duration;

use tactics_content::{Heightmap, SpellTable, TerrainColumn};
use tactics_core::{
    ActorKind, ActorSpec, CommandError, DamageKind, FreezeCause, GridCell, ImpactTiming,
    ManualClock, MoveError, MoveOutcome, SpellDescriptor, SpellEffect, SpellId, SpellPattern,
    TimelineOutcome, WorldPoint,
};
use tactics_runtime::{
    CastingEvent, Event, MovementEvent, OracleManager, Runtime, RuntimeConfig, RuntimeError,
    Topic, TurnEvent,
};
use tokio::time::timeout;

const ARROW: SpellId = SpellId(7);

fn center(x: i32, z: i32) -> WorldPoint {
    WorldPoint::new(x as f32 * 2.0 + 1.0, 0.0, z as f32 * 2.0 + 1.0)
}

fn spells() -> SpellTable {
    [SpellDescriptor::new(ARROW, "Arrow", SpellPattern::SingleTarget)
        .with_range(6)
        .with_projectile_speed(4.0)
        .with_effect(SpellEffect::Damage {
            amount: 4,
            kind: DamageKind::Force,
        })]
    .into_iter()
    .collect()
}

fn heightmap() -> Heightmap {
    Heightmap::flat(GridCell::new(-10, -10), GridCell::new(10, 10), 0.0).with_column(
        GridCell::new(0, 1),
        TerrainColumn {
            floors: vec![3.0],
            fluid: Vec::new(),
        },
    )
}

async fn start(clock: Arc<ManualClock>) -> Runtime {
    let oracles = OracleManager::new(
        Arc::new(tactics_runtime::HeightmapTerrain::new(heightmap())),
        Arc::new(spells()),
    )
    .with_clock(clock);

    // Ticks are driven by hand so timeline assertions stay deterministic.
    let config = RuntimeConfig {
        tick_interval: Duration::from_secs(3600),
        game_seed: 42,
        ..Default::default()
    };

    Runtime::builder()
        .config(config)
        .oracles(oracles)
        .build()
        .await
        .expect("runtime should build")
}

async fn next(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Event {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("event should arrive")
        .expect("bus should stay open")
}

#[tokio::test]
async fn spawn_and_move_publish_movement_events() {
    let runtime = start(Arc::new(ManualClock::new())).await;
    let handle = runtime.handle();
    let mut movement = handle.subscribe(Topic::Movement);

    let hero = ActorSpec::new("Aria", ActorKind::Player);
    let aria = handle.spawn_actor(hero, center(0, 0)).await.unwrap();
    assert!(matches!(
        next(&mut movement).await,
        Event::Movement(MovementEvent::Spawned { actor, .. }) if actor == aria
    ));

    let outcome = handle.request_move(aria, center(1, 0)).await.unwrap();
    assert!(matches!(outcome, MoveOutcome::Moved { .. }));
    assert!(matches!(
        next(&mut movement).await,
        Event::Movement(MovementEvent::Moved { to, charged, .. })
            if to == GridCell::new(1, 0) && charged == 0.0
    ));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.occupancy.cell_of(aria), Some(GridCell::new(1, 0)));

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn cliff_freezes_until_the_actor_walks_back() {
    let runtime = start(Arc::new(ManualClock::new())).await;
    let handle = runtime.handle();
    let mut movement = handle.subscribe(Topic::Movement);

    let aria = handle
        .spawn_actor(ActorSpec::new("Aria", ActorKind::Player), center(0, 0))
        .await
        .unwrap();
    next(&mut movement).await;

    let err = handle.request_move(aria, center(0, 1)).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Command(CommandError::Move(MoveError::TooSteep { .. }))
    ));
    assert!(matches!(
        next(&mut movement).await,
        Event::Movement(MovementEvent::Rejected { code, frozen: Some(FreezeCause::Terrain(_)), .. })
            if code == "too_steep"
    ));

    let outcome = handle.request_move(aria, center(0, 0)).await.unwrap();
    assert_eq!(outcome, MoveOutcome::Unfrozen { cell: GridCell::ORIGIN });
}

#[tokio::test]
async fn combat_gates_moves_to_the_turn_holder() {
    let runtime = start(Arc::new(ManualClock::new())).await;
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);

    let aria = handle
        .spawn_actor(
            ActorSpec::new("Aria", ActorKind::Player).with_initiative_modifier(30),
            center(0, 0),
        )
        .await
        .unwrap();
    let goblin = handle
        .spawn_actor(ActorSpec::new("Goblin", ActorKind::Monster), center(4, 4))
        .await
        .unwrap();

    let order = handle.start_combat().await.unwrap();
    assert_eq!(order[0].actor, aria);
    assert!(matches!(next(&mut turns).await, Event::Turn(TurnEvent::CombatStarted { .. })));
    assert!(matches!(
        next(&mut turns).await,
        Event::Turn(TurnEvent::TurnStarted { actor, round: 1, .. }) if actor == aria
    ));

    let err = handle.request_move(goblin, center(3, 4)).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Command(CommandError::Move(MoveError::NotYourTurn))
    ));

    handle.request_move(aria, center(1, 1)).await.unwrap();
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.actor(aria).unwrap().budget().remaining, 4.5);

    let change = handle.advance_turn().await.unwrap();
    assert_eq!(change.actor, goblin);

    handle.end_combat().await.unwrap();
    assert!(matches!(
        next(&mut turns).await,
        Event::Turn(TurnEvent::TurnStarted { actor, .. }) if actor == goblin
    ));
    assert!(matches!(next(&mut turns).await, Event::Turn(TurnEvent::CombatEnded)));
}

#[tokio::test]
async fn projectile_lands_when_the_clock_catches_up() {
    let clock = Arc::new(ManualClock::new());
    let runtime = start(clock.clone()).await;
    let handle = runtime.handle();
    let mut casting = handle.subscribe(Topic::Casting);
    let mut overlay = handle.subscribe(Topic::Overlay);

    let aria = handle
        .spawn_actor(ActorSpec::new("Aria", ActorKind::Player), center(0, 0))
        .await
        .unwrap();
    let goblin = handle
        .spawn_actor(ActorSpec::new("Goblin", ActorKind::Monster), center(3, 0))
        .await
        .unwrap();

    let preview = handle.prepare_cast(aria, ARROW).await.unwrap();
    assert!(preview.frozen);
    assert!(matches!(next(&mut overlay).await, Event::Overlay(_)));

    let aimed = handle.request_move(aria, center(3, 0)).await.unwrap();
    assert_eq!(aimed, MoveOutcome::Aimed { aim: GridCell::new(3, 0) });

    let resolution = handle.finalize_cast(aria).await.unwrap();
    assert_eq!(
        resolution.impact,
        ImpactTiming::Scheduled {
            due: Duration::from_millis(1500)
        }
    );
    assert!(matches!(next(&mut casting).await, Event::Casting(CastingEvent::Prepared { .. })));
    assert!(matches!(
        next(&mut casting).await,
        Event::Casting(CastingEvent::Finalized { impact_at_ms: Some(1500), .. })
    ));

    assert!(handle.tick().await.unwrap().is_empty());

    clock.advance(Duration::from_millis(1500));
    let landed = handle.tick().await.unwrap();
    assert!(landed.iter().any(|outcome| matches!(
        outcome,
        TimelineOutcome::ProjectileLanded { caster, .. } if *caster == aria
    )));
    assert!(matches!(
        next(&mut casting).await,
        Event::Casting(CastingEvent::EffectApplied(effect)) if effect.target == goblin
    ));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.actor(goblin).unwrap().health().current, 6);
    assert!(!state.actor(aria).unwrap().is_frozen());
}

#[tokio::test]
async fn loads_oracles_from_a_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("spells.ron"),
        r#"[(id: SpellId(1), name: "Spark", pattern: SingleTarget, range: 3, area: 0)]"#,
    )
    .unwrap();
    std::fs::create_dir(dir.path().join("terrain")).unwrap();
    std::fs::write(
        dir.path().join("terrain").join("yard.ron"),
        "(min: (x: -2, z: -2), max: (x: 2, z: 2), default_floor: Some(0.0))",
    )
    .unwrap();

    let factory = tactics_content::ContentFactory::new(dir.path());
    let oracles = OracleManager::from_content(&factory, "yard").unwrap();
    assert_eq!(oracles.spells().len(), 1);

    let runtime = Runtime::builder().oracles(oracles).build().await.unwrap();
    let handle = runtime.handle();
    let aria = handle
        .spawn_actor(ActorSpec::new("Aria", ActorKind::Player), center(0, 0))
        .await
        .unwrap();

    handle.request_move(aria, center(1, 0)).await.unwrap();
    handle.request_move(aria, center(2, 0)).await.unwrap();

    // (3, 0) lies past the loaded bounds.
    let err = handle.request_move(aria, center(3, 0)).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Command(CommandError::Move(MoveError::ProbeUnavailable(_)))
    ));
}

#[tokio::test]
async fn build_requires_oracles() {
    assert!(matches!(
        Runtime::builder().build().await,
        Err(RuntimeError::MissingOracles)
    ));
}
