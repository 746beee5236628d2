//! Runtime integration tests: command submission, narration, checkpoints and lore.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use game_content::{ContentBundle, builtin};
use game_core::state::{Encounter, Shrine, ShrineCost, ShrineKind, ShrineState};
use game_core::{
    CharacterClass, CombatAction, Command, EnemyTemplate, EntityId, GameState, NarrationContext,
    OutcomeKind, Player, Tier,
};
use runtime::{
    CommandProvider, Event, FileCheckpointRepository, GameStateEvent, Intent, LoreEvent,
    LoreRequest, NarrationError, NarrationEvent, NarrationProvider, NarrationResponse, Runtime,
    RuntimeConfig, RuntimeError, ScriptedNarrator, Topic,
};
use tokio::sync::broadcast;
use tokio::time::timeout;

fn content() -> ContentBundle {
    builtin::bundle().expect("builtin content")
}

fn template(id: &str) -> EnemyTemplate {
    content().template(id).cloned().expect("template exists")
}

/// Same template with a single hit point.
fn fragile(id: &str) -> EnemyTemplate {
    let mut template = template(id);
    template.max_health = 1;
    template
}

fn start_state() -> GameState {
    GameState::new(7, Player::new("Ash", CharacterClass::Warrior))
}

async fn build(narrator: impl NarrationProvider + 'static) -> Runtime {
    Runtime::builder()
        .content(content())
        .initial_state(start_state())
        .narrator(narrator)
        .build()
        .await
        .expect("runtime builds")
}

async fn next_event(rx: &mut broadcast::Receiver<Event>) -> Event {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("event within timeout")
        .expect("channel open")
}

/// Narrator that never answers in time.
struct StalledNarrator;

#[async_trait]
impl NarrationProvider for StalledNarrator {
    async fn narrate(
        &self,
        _context: &NarrationContext,
    ) -> Result<NarrationResponse, NarrationError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(NarrationResponse::text("too late"))
    }

    async fn lore(&self, _request: &LoreRequest) -> Result<String, NarrationError> {
        Err(NarrationError::Unavailable("offline".into()))
    }
}

#[tokio::test]
async fn submitted_command_is_committed_then_narrated() {
    let runtime = build(ScriptedNarrator::new([r#"{"narration": "A goblin snarls."}"#])).await;
    let handle = runtime.handle();
    let mut game_rx = handle.subscribe(Topic::GameState);
    let mut narration_rx = handle.subscribe(Topic::Narration);

    let outcome = handle
        .submit(Command::Engage(template("goblin_scout")))
        .await
        .expect("submit");
    assert!(outcome.is_applied());

    match next_event(&mut game_rx).await {
        Event::GameState(GameStateEvent::CommandApplied { nonce, events, .. }) => {
            assert_eq!(nonce, 0);
            assert_eq!(events, outcome.events());
        }
        other => panic!("unexpected event: {other:?}"),
    }
    match next_event(&mut narration_rx).await {
        Event::Narration(NarrationEvent::Narrated { nonce, text, fallback }) => {
            assert_eq!(nonce, 1);
            assert_eq!(text, "A goblin snarls.");
            assert!(!fallback);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let state = handle.query_state().await.expect("state");
    assert_eq!(state.nonce, 1);
    assert_eq!(state.journal.last().expect("journal entry").text, "A goblin snarls.");

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn rejected_command_leaves_state_untouched() {
    let runtime = build(ScriptedNarrator::new(Vec::<String>::new())).await;
    let handle = runtime.handle();
    let mut game_rx = handle.subscribe(Topic::GameState);
    let mut narration_rx = handle.subscribe(Topic::Narration);
    let before = handle.query_state().await.expect("state");

    let outcome = handle
        .submit(Command::Combat(CombatAction::Attack))
        .await
        .expect("submit");
    assert!(!outcome.is_applied());

    assert!(matches!(
        next_event(&mut game_rx).await,
        Event::GameState(GameStateEvent::CommandRejected { nonce: 0, .. })
    ));
    assert!(narration_rx.try_recv().is_err());
    assert_eq!(handle.query_state().await.expect("state"), before);
}

#[tokio::test]
async fn failed_narration_falls_back() {
    let runtime = build(ScriptedNarrator::new(Vec::<String>::new())).await;
    let handle = runtime.handle();
    let mut narration_rx = handle.subscribe(Topic::Narration);

    let outcome = handle
        .submit(Command::Engage(template("goblin_scout")))
        .await
        .expect("submit");
    assert!(outcome.is_applied());

    match next_event(&mut narration_rx).await {
        Event::Narration(NarrationEvent::Narrated { text, fallback, .. }) => {
            assert!(fallback);
            assert_eq!(text, "Goblin Scout blocks the way.");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn slow_narration_does_not_hold_the_command() {
    let runtime = Runtime::builder()
        .content(content())
        .initial_state(start_state())
        .narrator(StalledNarrator)
        .config(RuntimeConfig {
            narration_timeout: Duration::from_millis(50),
            ..RuntimeConfig::default()
        })
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();

    let outcome = timeout(
        Duration::from_secs(2),
        handle.submit(Command::Engage(template("skeleton"))),
    )
    .await
    .expect("submit resolves despite stalled narrator")
    .expect("submit");
    assert!(outcome.is_applied());

    let state = handle.query_state().await.expect("state");
    assert_eq!(state.nonce, 1);
    assert_eq!(
        state.journal.last().expect("fallback line").text,
        "Skeleton blocks the way."
    );
}

#[tokio::test]
async fn checkpoint_restores_identical_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repository = Arc::new(FileCheckpointRepository::new(dir.path()).expect("repository"));
    let runtime = Runtime::builder()
        .content(content())
        .initial_state(start_state())
        .repository(repository)
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();

    handle
        .submit(Command::Engage(template("skeleton")))
        .await
        .expect("engage");
    handle
        .submit(Command::Combat(CombatAction::Attack))
        .await
        .expect("attack");

    let saved = handle.query_state().await.expect("state");
    let checkpoint = handle.checkpoint("mid-fight").await.expect("checkpoint");
    assert_eq!(checkpoint.nonce, saved.nonce);
    assert_eq!(checkpoint.digest, hex_digest(&saved));

    handle
        .submit(Command::Combat(CombatAction::Attack))
        .await
        .expect("attack");
    assert_ne!(handle.query_state().await.expect("state"), saved);

    let restored = handle.restore("mid-fight").await.expect("restore");
    assert_eq!(restored, saved);
    assert_eq!(handle.query_state().await.expect("state"), saved);
    assert_eq!(handle.list_checkpoints().await.expect("labels"), vec!["mid-fight"]);

    assert!(matches!(
        handle.restore("nowhere").await,
        Err(RuntimeError::CheckpointNotFound(label)) if label == "nowhere"
    ));
}

fn hex_digest(state: &GameState) -> String {
    state
        .digest()
        .expect("digest")
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[tokio::test]
async fn lore_for_a_departed_enemy_is_cancelled() {
    let narrator =
        ScriptedNarrator::new(Vec::<String>::new()).with_lore_delay(Duration::from_millis(200));
    let runtime = build(narrator).await;
    let handle = runtime.handle();
    let mut lore_rx = handle.subscribe(Topic::Lore);

    handle
        .submit(Command::Engage(fragile("orc_brute")))
        .await
        .expect("engage brute");
    let outcome = handle
        .submit(Command::Combat(CombatAction::Attack))
        .await
        .expect("attack");
    assert!(outcome
        .events()
        .iter()
        .any(|e| matches!(e, game_core::GameEvent::Victory { .. })));
    handle
        .submit(Command::Engage(template("frost_wraith")))
        .await
        .expect("engage wraith");

    let first = match next_event(&mut lore_rx).await {
        Event::Lore(LoreEvent::Requested { enemy }) => enemy,
        other => panic!("unexpected event: {other:?}"),
    };
    assert!(matches!(
        next_event(&mut lore_rx).await,
        Event::Lore(LoreEvent::Cancelled { enemy }) if enemy == first
    ));
    let second: EntityId = match next_event(&mut lore_rx).await {
        Event::Lore(LoreEvent::Requested { enemy }) => enemy,
        other => panic!("unexpected event: {other:?}"),
    };
    assert_ne!(first, second);

    match next_event(&mut lore_rx).await {
        Event::Lore(LoreEvent::Attached { enemy, lore }) => {
            assert_eq!(enemy, second);
            assert_eq!(lore, "Frost Wraith has haunted floor 1 for an age.");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let state = handle.query_state().await.expect("state");
    let enemy = state.encounter.enemy().expect("wraith present");
    assert_eq!(enemy.lore.as_deref(), Some("Frost Wraith has haunted floor 1 for an age."));
}

#[tokio::test]
async fn lore_for_a_slain_enemy_is_discarded() {
    let narrator =
        ScriptedNarrator::new(Vec::<String>::new()).with_lore_delay(Duration::from_millis(100));
    let runtime = build(narrator).await;
    let handle = runtime.handle();
    let mut lore_rx = handle.subscribe(Topic::Lore);

    handle
        .submit(Command::Engage(fragile("orc_brute")))
        .await
        .expect("engage brute");
    handle
        .submit(Command::Combat(CombatAction::Attack))
        .await
        .expect("attack");

    let requested = match next_event(&mut lore_rx).await {
        Event::Lore(LoreEvent::Requested { enemy }) => enemy,
        other => panic!("unexpected event: {other:?}"),
    };
    assert!(matches!(
        next_event(&mut lore_rx).await,
        Event::Lore(LoreEvent::Discarded { enemy }) if enemy == requested
    ));

    let state = handle.query_state().await.expect("state");
    assert_eq!(state.encounter.enemy().expect("remains").lore, None);
}

/// Accepts a pending shrine once, then stops.
struct ShrineSeeker;

#[async_trait]
impl CommandProvider for ShrineSeeker {
    async fn decide(&self, state: &GameState, _available: &[Command]) -> runtime::Result<Intent> {
        Ok(match &state.encounter {
            Encounter::Shrine(shrine) if !shrine.resolved => Intent::AcceptShrine,
            _ => Intent::Stop,
        })
    }
}

#[tokio::test]
async fn step_consults_the_narrator_for_shrine_outcomes() {
    let mut state = start_state();
    state.encounter = Encounter::Shrine(ShrineState {
        shrine: Shrine {
            name: "Sunlit Altar".into(),
            kind: ShrineKind::Light,
            cost: ShrineCost::default(),
        },
        resolved: false,
    });

    let narrator = ScriptedNarrator::new([
        r#"{"narration": "Warm light pours over you.", "outcome": "blessing", "blessingTier": "minor"}"#,
        r#"{"narration": "The altar dims."}"#,
    ]);
    let mut runtime = Runtime::builder()
        .content(content())
        .initial_state(state)
        .narrator(narrator)
        .provider(ShrineSeeker)
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let mut game_rx = handle.subscribe(Topic::GameState);

    let outcome = runtime.step().await.expect("step").expect("submitted");
    assert!(outcome.is_applied());

    match next_event(&mut game_rx).await {
        Event::GameState(GameStateEvent::CommandApplied {
            command: Command::Shrine(game_core::ShrineAction::Accept(accepted)),
            ..
        }) => {
            assert_eq!(accepted.kind, OutcomeKind::Blessing);
            assert_eq!(accepted.blessing_tier, Some(Tier::Minor));
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let state = handle.query_state().await.expect("state");
    assert!(state.player.statuses.contains("blessing:minor"));
    assert_eq!(state.journal.last().expect("journal").text, "The altar dims.");

    assert!(runtime.step().await.expect("step").is_none());
}

#[tokio::test]
async fn step_without_provider_fails() {
    let mut runtime = build(ScriptedNarrator::new(Vec::<String>::new())).await;
    assert!(matches!(runtime.step().await, Err(RuntimeError::ProviderNotSet)));
}

#[tokio::test]
async fn builder_requires_content_and_state() {
    let missing_content = Runtime::builder().initial_state(start_state()).build().await;
    assert!(matches!(missing_content, Err(RuntimeError::MissingContent)));

    let missing_state = Runtime::builder().content(content()).build().await;
    assert!(matches!(missing_state, Err(RuntimeError::MissingInitialState)));
}

#[tokio::test]
async fn first_available_provider_drives_a_run() {
    let mut runtime = Runtime::builder()
        .content(content())
        .initial_state(start_state())
        .provider(runtime::FirstAvailableProvider)
        .build()
        .await
        .expect("runtime builds");

    let submitted = runtime.run(12).await.expect("run");
    let state = runtime.handle().query_state().await.expect("state");

    assert!(submitted <= 12);
    assert!(state.nonce <= submitted as u64);
    assert_eq!(state.journal.entries().len() as u64, state.nonce);
}
