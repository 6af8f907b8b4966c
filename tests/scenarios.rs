use pose_catch::Tuning;
use pose_catch::sim::{EndReason, Engine, GameEvent, GamePhase, ItemKind, Zone};

fn manual_engine() -> Engine {
    let tuning = Tuning {
        autospawn: false,
        ..Default::default()
    };
    Engine::new(7, tuning).unwrap()
}

#[test]
fn three_missed_fruits_end_the_game() {
    let mut engine = manual_engine();
    engine.start(0);
    engine.drain_events();

    let mut ids = Vec::new();
    for i in 1..=3u64 {
        ids.push(engine.spawn_item(ItemKind::Apple, Zone::Left).unwrap());
        engine.frame(i * 4000);
    }

    let events = engine.drain_events();
    let removed: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ItemRemoved { item_id } => Some(*item_id),
            _ => None,
        })
        .collect();
    assert_eq!(removed, ids);

    let misses: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ScoreChanged { miss_count, .. } => Some(*miss_count),
            _ => None,
        })
        .collect();
    assert_eq!(misses, vec![1, 2, 3]);

    assert_eq!(engine.state().miss_count, 3);
    assert_eq!(engine.phase(), GamePhase::Ended);
    assert!(matches!(
        events.last(),
        Some(GameEvent::GameEnded {
            reason: EndReason::TooManyMisses,
            score: 0,
            ..
        })
    ));
}

#[test]
fn caught_fruit_in_left_lane() {
    let mut engine = manual_engine();
    engine.start(0);
    engine.on_pose_detected("LEFT");
    engine.spawn_item(ItemKind::GoldenApple, Zone::Left);
    engine.drain_events();

    engine.frame(4000);
    let events = engine.drain_events();
    assert!(events.contains(&GameEvent::ScoreChanged {
        score: 100,
        level: 1,
        miss_count: 0,
        max_misses: 3,
        combo: 1,
    }));
    assert_eq!(engine.state().fruits_caught, 1);
}

#[test]
fn five_catch_combo_earns_bonus() {
    let mut engine = manual_engine();
    engine.start(0);
    for i in 1..=5u64 {
        engine.spawn_item(ItemKind::GoldenApple, Zone::Center);
        engine.frame(i * 4000);
    }
    assert_eq!(engine.state().combo, 5);
    assert_eq!(engine.state().score, 5 * 100 + 50);
}

#[test]
fn bomb_is_fatal_even_with_clean_record() {
    let mut engine = manual_engine();
    engine.start(0);
    engine.on_pose_detected("RIGHT");
    engine.spawn_item(ItemKind::Bomb, Zone::Right);
    engine.frame(4000);

    assert_eq!(engine.phase(), GamePhase::Ended);
    assert_eq!(engine.state().miss_count, 0);
    let summary = engine.last_summary().unwrap();
    assert_eq!(summary.reason, EndReason::BombCaught);
}

#[test]
fn one_level_up_after_twenty_seconds() {
    let mut engine = manual_engine();
    engine.start(0);
    engine.drain_events();

    for t in (16..=20_000).step_by(16) {
        engine.frame(t);
    }
    engine.frame(20_000);

    assert_eq!(engine.state().level, 2);
    assert_eq!(
        engine.drain_events(),
        vec![GameEvent::ScoreChanged {
            score: 0,
            level: 2,
            miss_count: 0,
            max_misses: 3,
            combo: 0,
        }]
    );
}

#[test]
fn overrides_from_json() {
    let json = r#"{ "max_misses": 1, "autospawn": false }"#;
    let tuning = Tuning::from_json(json).unwrap();
    let mut engine = Engine::new(1, tuning).unwrap();
    engine.start(0);
    engine.spawn_item(ItemKind::Apple, Zone::Right);
    engine.frame(4000);
    assert_eq!(engine.phase(), GamePhase::Ended);
    let summary = engine.last_summary().unwrap();
    assert_eq!(summary.reason, EndReason::TooManyMisses);
}

#[test]
fn invalid_tuning_is_rejected_up_front() {
    let json = r#"{ "spawn_delay_min_ms": 2000, "spawn_delay_max_ms": 2000 }"#;
    let tuning: Tuning = serde_json::from_str(json).unwrap();
    assert!(Engine::new(1, tuning).is_err());
}

#[test]
fn observed_session_leaves_nothing_queued() {
    let mut engine = manual_engine();
    engine.subscribe(Box::new(|_: &GameEvent| {}));
    engine.start(0);
    for i in 1..=50u64 {
        engine.spawn_item(ItemKind::Apple, Zone::Center);
        engine.frame(i * 4000);
    }
    assert!(engine.is_active());
    assert!(engine.drain_events().is_empty());
}
