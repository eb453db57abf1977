use combat_content::ContentFactory;
use combat_core::{
    Action, ActionPattern, CardDefinition, Catalog, CombatEvent, DeckPiles, Dice,
    EncounterState, EnemyDefinition, Outcome, Phase, PlayError, PlayerProfile, SetupError,
    StatusEffectEntry, StatusKind,
};
use runtime::{
    ActionProvider, AutoPlayProvider, EncounterSnapshot, EndTurnProvider, Event, LifecycleEvent,
    PlayerChoice, Runtime, RuntimeConfig, RuntimeError, ScriptedProvider, Topic,
};
use tempfile::TempDir;

fn player(max_health: u32, deck: &[&str]) -> PlayerProfile {
    PlayerProfile {
        name: "Warden".into(),
        max_health,
        health: None,
        speed: 100,
        equipment: Vec::new(),
        deck: deck.iter().map(|id| id.to_string()).collect(),
    }
}

fn enemy(id: &str, max_health: u32, patterns: Vec<ActionPattern>) -> EnemyDefinition {
    EnemyDefinition {
        id: id.into(),
        name: id.into(),
        max_health,
        secondary_armor: 0,
        // Same speed as the player: no initiative bonus, player first.
        speed: 100,
        starting_effects: Vec::new(),
        patterns,
    }
}

fn cards() -> Vec<CardDefinition> {
    vec![
        CardDefinition::new("strike", 1, Action::offense("Strike", 6)),
        CardDefinition::new("defend", 1, Action::defense("Defend", 5)),
        CardDefinition::new("mend", 1, Action::heal("Mend", 8)),
    ]
}

fn catalog(player: PlayerProfile, enemies: Vec<EnemyDefinition>) -> Catalog {
    Catalog::new(cards(), enemies, player)
}

fn striker_vs(enemies: Vec<EnemyDefinition>) -> Catalog {
    catalog(player(50, &["strike"; 5]), enemies)
}

#[tokio::test]
async fn auto_play_defeats_a_weak_enemy() {
    let rat = enemy(
        "rat",
        10,
        vec![ActionPattern::pooled(Action::offense("Nibble", 1))],
    );

    let mut runtime = Runtime::builder()
        .catalog(striker_vs(vec![rat]))
        .enemy("rat")
        .seed(7)
        .player_provider(AutoPlayProvider)
        .build()
        .await
        .unwrap();

    let summary = runtime.run().await.unwrap();

    assert_eq!(summary.outcome, Some(Outcome::Victory));
    assert!(summary.enemy_health <= 0);
    assert!(summary.player_health > 0);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn passive_player_is_defeated() {
    let brute = enemy(
        "brute",
        40,
        vec![ActionPattern::pooled(Action::offense("Club", 10))],
    );

    let mut runtime = Runtime::builder()
        .catalog(catalog(player(30, &["strike"; 5]), vec![brute]))
        .enemy("brute")
        .player_provider(EndTurnProvider)
        .build()
        .await
        .unwrap();

    let summary = runtime.run().await.unwrap();

    assert_eq!(summary.outcome, Some(Outcome::Defeat));
    assert_eq!(summary.enemy_health, 40);
    assert!(summary.player_health <= 0);
}

#[tokio::test]
async fn illegal_play_is_rejected_and_published() {
    let dummy = enemy(
        "dummy",
        100,
        vec![ActionPattern::pooled(Action::defense("Brace", 1))],
    );
    let runtime = Runtime::builder()
        .catalog(striker_vs(vec![dummy]))
        .enemy("dummy")
        .build()
        .await
        .unwrap();

    let handle = runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);

    handle.start().await.unwrap();
    let before = handle.snapshot().await.unwrap();

    let err = handle.play_card(99).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Play(PlayError::InvalidHandIndex { index: 99, .. })
    ));

    let after = handle.snapshot().await.unwrap();
    assert_eq!(before, after);

    assert!(matches!(
        lifecycle.recv().await.unwrap(),
        Event::Lifecycle(LifecycleEvent::EncounterStarted { .. })
    ));
    assert!(matches!(
        lifecycle.recv().await.unwrap(),
        Event::Lifecycle(LifecycleEvent::PlayRejected { .. })
    ));
}

#[tokio::test]
async fn commands_before_start_are_rejected() {
    let dummy = enemy(
        "dummy",
        100,
        vec![ActionPattern::pooled(Action::defense("Brace", 1))],
    );
    let runtime = Runtime::builder()
        .catalog(striker_vs(vec![dummy]))
        .enemy("dummy")
        .build()
        .await
        .unwrap();

    let err = runtime.handle().end_turn().await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Play(PlayError::WrongPhase(Phase::NotStarted))
    ));
}

#[tokio::test]
async fn combat_events_follow_engine_order() {
    let dummy = enemy(
        "dummy",
        100,
        vec![ActionPattern::pooled(Action::defense("Brace", 1))],
    );
    let runtime = Runtime::builder()
        .catalog(striker_vs(vec![dummy]))
        .enemy("dummy")
        .build()
        .await
        .unwrap();

    let handle = runtime.handle();
    let mut combat = handle.subscribe(Topic::Combat);
    handle.start().await.unwrap();

    let mut events = Vec::new();
    while let Ok(Event::Combat(event)) = combat.try_recv() {
        events.push(event);
    }

    assert!(matches!(events[0], CombatEvent::RoundStarted { round: 1, .. }));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, CombatEvent::CardsDrawn { count: 5, .. }))
    );
}

#[tokio::test]
async fn concurrent_callers_are_served_one_at_a_time() {
    let dummy = enemy(
        "dummy",
        100,
        vec![ActionPattern::pooled(Action::defense("Brace", 1))],
    );
    let runtime = Runtime::builder()
        .catalog(striker_vs(vec![dummy]))
        .enemy("dummy")
        .build()
        .await
        .unwrap();

    let handle = runtime.handle();
    handle.start().await.unwrap();

    let tasks: Vec<_> = (0..3)
        .map(|_| {
            let handle = handle.clone();
            tokio::spawn(async move { handle.play_card(0).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.energy(), 0);
    assert_eq!(snapshot.hand().len(), 2);
    assert!(snapshot.playable.is_empty());
    assert_eq!(snapshot.state.enemy.health, 100 - 18);
}

#[tokio::test]
async fn same_seed_replays_identically() {
    let slime = enemy(
        "slime",
        45,
        vec![
            ActionPattern::pooled(Action::offense("Bite", 4)).weighted(0.5),
            ActionPattern::pooled(Action::offense("Lash", 2).with_hits(2)).weighted(0.3),
            ActionPattern::pooled(Action::defense("Harden", 4)).weighted(0.2),
        ],
    );

    let mut summaries = Vec::new();
    for _ in 0..2 {
        let mut runtime = Runtime::builder()
            .catalog(catalog(
                player(50, &["strike", "strike", "strike", "defend", "mend"]),
                vec![slime.clone()],
            ))
            .enemy("slime")
            .seed(42)
            .player_provider(AutoPlayProvider)
            .build()
            .await
            .unwrap();
        summaries.push(runtime.run().await.unwrap());
    }

    assert_eq!(summaries[0], summaries[1]);
    assert!(summaries[0].outcome.is_some());
}

#[tokio::test]
async fn unknown_enemy_fails_to_build() {
    let result = Runtime::builder()
        .catalog(striker_vs(Vec::new()))
        .enemy("dragon")
        .build()
        .await;

    assert!(matches!(
        result,
        Err(RuntimeError::Setup(SetupError::UnknownEnemy(id))) if id == "dragon"
    ));
}

#[tokio::test]
async fn step_requires_a_player_provider() {
    let dummy = enemy(
        "dummy",
        100,
        vec![ActionPattern::pooled(Action::defense("Brace", 1))],
    );
    let mut runtime = Runtime::builder()
        .catalog(striker_vs(vec![dummy]))
        .enemy("dummy")
        .build()
        .await
        .unwrap();

    assert!(matches!(
        runtime.step().await,
        Err(RuntimeError::ProviderNotSet)
    ));

    runtime.set_player_provider(EndTurnProvider);
    assert!(runtime.step().await.unwrap().is_none());
}

#[tokio::test]
async fn stalemates_hit_the_round_limit() {
    let turtle = enemy(
        "turtle",
        100,
        vec![ActionPattern::pooled(Action::defense("Withdraw", 3))],
    );

    let mut runtime = Runtime::builder()
        .config(RuntimeConfig {
            max_rounds: 3,
            ..RuntimeConfig::default()
        })
        .catalog(striker_vs(vec![turtle]))
        .enemy("turtle")
        .player_provider(EndTurnProvider)
        .build()
        .await
        .unwrap();

    assert!(matches!(
        runtime.run().await,
        Err(RuntimeError::RoundLimitExceeded { max_rounds: 3 })
    ));
}

#[tokio::test]
async fn scripted_provider_replays_choices() {
    let dummy = enemy(
        "dummy",
        100,
        vec![ActionPattern::pooled(Action::defense("Brace", 1))],
    );
    let mut runtime = Runtime::builder()
        .catalog(striker_vs(vec![dummy]))
        .enemy("dummy")
        .player_provider(ScriptedProvider::new([
            PlayerChoice::Play(0),
            PlayerChoice::Play(0),
            PlayerChoice::EndTurn,
        ]))
        .build()
        .await
        .unwrap();

    // start, two plays, end turn
    for _ in 0..4 {
        runtime.step().await.unwrap();
    }

    let snapshot = runtime.handle().snapshot().await.unwrap();
    assert_eq!(snapshot.state.turn.round, 2);
    assert_eq!(snapshot.state.enemy.health, 100 - 12);
}

#[tokio::test]
async fn journal_records_the_whole_encounter() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal.jsonl");
    let rat = enemy(
        "rat",
        10,
        vec![ActionPattern::pooled(Action::offense("Nibble", 1))],
    );

    let mut runtime = Runtime::builder()
        .catalog(striker_vs(vec![rat]))
        .enemy("rat")
        .journal(&path)
        .player_provider(AutoPlayProvider)
        .build()
        .await
        .unwrap();
    runtime.run().await.unwrap();
    runtime.shutdown().await.unwrap();

    let events: Vec<Event> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(events.iter().any(|e| matches!(
        e,
        Event::Lifecycle(LifecycleEvent::EncounterStarted { .. })
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        Event::Lifecycle(LifecycleEvent::EncounterFinished { summary })
            if summary.outcome == Some(Outcome::Victory)
    )));
}

#[tokio::test]
async fn bundled_content_plays_to_an_outcome() {
    let bundle = ContentFactory::bundled().load_bundle().unwrap();
    let enemies = bundle.catalog.enemy_ids();

    for enemy_id in enemies {
        let mut runtime = Runtime::builder()
            .content(bundle.clone())
            .enemy(enemy_id.clone())
            .seed(2024)
            .player_provider(AutoPlayProvider)
            .build()
            .await
            .unwrap();

        let summary = runtime.run().await.unwrap();
        assert!(summary.outcome.is_some(), "{enemy_id} did not finish");
    }
}

fn snapshot_with_hand(player_health: u32, hand: Vec<CardDefinition>) -> EncounterSnapshot {
    let count = hand.len();
    let mut deck = DeckPiles::stacked(hand.into_iter().rev().collect());
    deck.draw(count, &mut Dice::seeded(1));

    let player = player(40, &[]).to_combatant().with_health(player_health);
    let enemy = enemy("dummy", 30, Vec::new()).to_combatant();
    let mut state = EncounterState::new(1, player, enemy, deck);
    state.turn.phase = Phase::PlayerPhase;
    state.turn.energy = 3;

    EncounterSnapshot {
        enemy: "dummy".into(),
        playable: (0..count).collect(),
        state,
    }
}

#[tokio::test]
async fn auto_play_prefers_damage_at_full_health() {
    let snapshot = snapshot_with_hand(40, cards());
    let choice = AutoPlayProvider.choose(&snapshot).await.unwrap();
    assert_eq!(choice, PlayerChoice::Play(0));
}

#[tokio::test]
async fn auto_play_heals_and_cleanses_when_hurt() {
    let cleanse = CardDefinition::new("purge", 1, Action::heal("Purge", 8).with_cleanse());
    let mut snapshot = snapshot_with_hand(10, vec![cards()[0].clone(), cleanse]);
    snapshot.state.player.status = snapshot
        .state
        .player
        .status
        .with_applied(&StatusEffectEntry::timed(StatusKind::Poison, 3, 0));

    let choice = AutoPlayProvider.choose(&snapshot).await.unwrap();
    assert_eq!(choice, PlayerChoice::Play(1));
}

#[tokio::test]
async fn auto_play_ends_turn_without_playable_cards() {
    let mut snapshot = snapshot_with_hand(40, cards());
    snapshot.playable.clear();
    let choice = AutoPlayProvider.choose(&snapshot).await.unwrap();
    assert_eq!(choice, PlayerChoice::EndTurn);
}
