//! End-to-end command scenarios driven through the public engine API.

use game_core::encounter::TrapOutcome;
use game_core::state::{
    Encounter, Rewards, Shrine, ShrineCost, ShrineKind, ShrineState, Trap, TrapKind, TrapState,
};
use game_core::stats::BaseStats;
use game_core::{
    Actor, CharacterClass, CombatAction, Command, DamageType, EnemyRank, EnemyTemplate, EntityId,
    GameConfig, GameEngine, GameEnv, GameEvent, GameState, NarrativeOutcome, PieceManifest, Player,
    RewardTier, ShrineAction, Tier, TrapAction, execute,
};

fn dummy(max_health: u32, attack: u32, defense: u32) -> EnemyTemplate {
    EnemyTemplate {
        id: "training_dummy".into(),
        name: "Training Dummy".into(),
        max_health,
        attack,
        defense,
        damage_type: DamageType::Physical,
        weakness: None,
        resistance: None,
        rank: EnemyRank::Normal,
        abilities: Vec::new(),
        rewards: Rewards {
            gold: RewardTier::Small,
            experience: 10,
        },
        loot: Vec::new(),
        weight: 1,
    }
}

struct Fixture {
    config: GameConfig,
    pieces: PieceManifest,
    bestiary: Vec<EnemyTemplate>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            config: GameConfig::default(),
            pieces: PieceManifest::default(),
            bestiary: vec![dummy(60, 8, 2)],
        }
    }

    fn env(&self) -> GameEnv<'_> {
        GameEnv::new(&self.config, &self.pieces, &self.bestiary)
    }
}

/// A 20 attack strike into 5 defense lands between 16 and 20 damage.
#[test]
fn basic_attack_damage_range() {
    let fx = Fixture::new();

    for seed in 0..50 {
        let mut player = Player::new("Bran", CharacterClass::Warrior);
        player.stats = BaseStats::new(100, 20, 5, 60);
        let mut state = GameState::new(seed, player);

        let mut engine = GameEngine::new(&mut state);
        engine
            .execute(fx.env(), &Command::Engage(dummy(500, 5, 5)))
            .expect("engage should succeed");
        let events = engine
            .execute(fx.env(), &Command::Combat(CombatAction::Attack))
            .expect("attack should succeed");

        let amount = events
            .iter()
            .find_map(|e| match e {
                GameEvent::Attack {
                    attacker, amount, critical, ..
                } if attacker.is_player() => {
                    assert!(!critical);
                    Some(*amount)
                }
                _ => None,
            })
            .expect("player attack event");
        assert!((16..=20).contains(&amount), "seed {seed}: {amount}");

        let enemy = state.encounter.enemy().expect("enemy present");
        assert_eq!(enemy.stats.health(), 500 - amount);
    }
}

/// A 30 health enemy survives the first strike and falls to the second.
#[test]
fn two_hits_win_the_fight() {
    let fx = Fixture::new();

    for seed in 0..20 {
        let mut player = Player::new("Bran", CharacterClass::Warrior);
        player.stats = BaseStats::new(100, 20, 5, 60);
        let mut state = GameState::new(seed, player);

        let mut engine = GameEngine::new(&mut state);
        engine
            .execute(fx.env(), &Command::Engage(dummy(30, 5, 5)))
            .expect("engage");
        let first = engine
            .execute(fx.env(), &Command::Combat(CombatAction::Attack))
            .expect("first attack");
        assert!(!first.iter().any(|e| matches!(e, GameEvent::Victory { .. })));
        let remaining = state.encounter.enemy().expect("enemy").stats.health();
        assert!((10..=14).contains(&remaining), "seed {seed}: {remaining}");

        let second = GameEngine::new(&mut state)
            .execute(fx.env(), &Command::Combat(CombatAction::Attack))
            .expect("second attack");
        assert!(second.iter().any(|e| matches!(e, GameEvent::Victory { .. })));
        assert!(
            second
                .iter()
                .any(|e| matches!(e, GameEvent::RewardsGranted { experience: 10, .. }))
        );
        assert_eq!(state.encounter.enemy().expect("enemy").stats.health(), 0);
    }
}

/// Accepting a major curse installs the curse with its table values.
#[test]
fn shrine_curse_applies_tier_modifiers() {
    let fx = Fixture::new();
    let mut state = GameState::new(9, Player::new("Wren", CharacterClass::Warrior));
    state.encounter = Encounter::Shrine(ShrineState {
        shrine: Shrine {
            name: "Weeping Altar".into(),
            kind: ShrineKind::Dark,
            cost: ShrineCost::default(),
        },
        resolved: false,
    });
    let before = state.player.effective_stats();

    let (next, outcome) = execute(
        &state,
        fx.env(),
        &Command::Shrine(ShrineAction::Accept(NarrativeOutcome::curse(Tier::Major))),
    );
    assert!(outcome.is_applied());

    let curse = next.player.statuses.get("curse:major").expect("curse applied");
    assert_eq!(curse.modifiers.attack, -6);
    assert_eq!(curse.modifiers.defense, -4);
    assert_eq!(curse.duration.remaining(), Some(5));

    let after = next.player.effective_stats();
    assert_eq!(after.attack, before.attack - 6);
    assert_eq!(after.defense, before.defense - 4);
    assert!(next.encounter.is_settled());
}

/// A dexterity 14 rogue against a difficulty 10 trap succeeds about 70% of the time.
#[test]
fn disarm_rate_tracks_chance() {
    let fx = Fixture::new();
    let mut base = GameState::new(4242, Player::new("Vex", CharacterClass::Rogue));
    base.encounter = Encounter::Trap(TrapState {
        trap: Trap {
            name: "Tripwire".into(),
            kind: TrapKind::Spikes,
            dc: 10,
            damage: 8,
            damage_type: DamageType::Physical,
            effect: None,
        },
        resolved: false,
    });
    assert_eq!(game_core::engine::disarm_chance(&base, &fx.env()), Some(70));

    let trials = 1000;
    let successes = (0..trials)
        .filter(|nonce| {
            let mut state = base.clone();
            state.nonce = *nonce;
            let (_, outcome) = execute(&state, fx.env(), &Command::Trap(TrapAction::Disarm));
            outcome.events().iter().any(|e| {
                matches!(
                    e,
                    GameEvent::TrapResolved {
                        outcome: TrapOutcome::Success,
                        ..
                    }
                )
            })
        })
        .count();

    let rate = successes as f64 / trials as f64;
    assert!((0.62..0.78).contains(&rate), "rate {rate}");
}

/// Snapshotting mid-fight and resuming replays exactly the same future.
#[test]
fn resumed_state_matches_uninterrupted_run() {
    let fx = Fixture::new();
    let mut state = GameState::new(2024, Player::new("Oren", CharacterClass::Mage));

    let opening = [
        Command::Engage(dummy(200, 6, 3)),
        Command::ActivateSustained("mana_shield".into()),
        Command::Combat(CombatAction::Attack),
        Command::Combat(CombatAction::Ability("fireball".into())),
    ];
    for command in &opening {
        let (next, outcome) = execute(&state, fx.env(), command);
        assert!(outcome.is_applied(), "{}", command.label());
        state = next;
    }

    let bytes = state.to_bytes().expect("encode");
    let mut resumed = GameState::from_bytes(&bytes).expect("decode");
    assert_eq!(resumed.digest().expect("digest"), state.digest().expect("digest"));
    assert_eq!(resumed.player.stats.resource_reserved(), 25);
    assert!(resumed.player.statuses.contains("sustained:mana_shield"));
    assert!(!resumed.player.statuses.is_empty());
    assert!(!resumed.player.combo.history().is_empty());
    assert!(
        resumed
            .player
            .sustained_ability("mana_shield")
            .expect("known")
            .active
    );

    let rest = [
        Command::SetStance(game_core::Stance::Aggressive),
        Command::Combat(CombatAction::Attack),
        Command::Combat(CombatAction::Ability("fireball".into())),
        Command::Combat(CombatAction::Attack),
        Command::Combat(CombatAction::Attack),
    ];
    for command in &rest {
        let (a, outcome_a) = execute(&state, fx.env(), command);
        let (b, outcome_b) = execute(&resumed, fx.env(), command);
        assert_eq!(outcome_a, outcome_b);
        state = a;
        resumed = b;
    }

    assert_eq!(state, resumed);
    assert_eq!(
        hex::encode(state.digest().expect("digest")),
        hex::encode(resumed.digest().expect("digest"))
    );
}

/// An empty pool at round end switches sustained abilities off and frees the reserve.
#[test]
fn starved_sustained_ability_deactivates() {
    let fx = Fixture::new();
    let mut state = GameState::new(31, Player::new("Iri", CharacterClass::Mage));

    {
        let mut engine = GameEngine::new(&mut state);
        engine
            .execute(fx.env(), &Command::Engage(dummy(500, 1, 0)))
            .expect("engage");
        engine
            .execute(fx.env(), &Command::ActivateSustained("mana_shield".into()))
            .expect("activate");
    }
    assert_eq!(state.player.stats.resource_reserved(), 25);

    let pool = state.player.stats.resource();
    state.player.stats.drain(pool);

    let events = GameEngine::new(&mut state)
        .execute(fx.env(), &Command::Combat(CombatAction::Attack))
        .expect("attack");

    assert!(events.contains(&GameEvent::SustainedDeactivated {
        ability: "mana_shield".into(),
        forced: true,
    }));
    assert_eq!(state.player.stats.resource_reserved(), 0);
    assert!(!state.player.statuses.contains("sustained:mana_shield"));
    assert!(
        !state
            .player
            .sustained_ability("mana_shield")
            .expect("known")
            .active
    );
}

/// Once the player is down, only queries remain.
#[test]
fn defeated_player_rejects_everything() {
    let fx = Fixture::new();
    let mut state = GameState::new(5, Player::new("Sol", CharacterClass::Cleric));
    state.player.stats.set_health(0);

    for command in [
        Command::Explore,
        Command::Combat(CombatAction::Attack),
        Command::SetStance(game_core::Stance::Defensive),
    ] {
        let (next, outcome) = execute(&state, fx.env(), &command);
        assert!(!outcome.is_applied(), "{}", command.label());
        assert_eq!(next, state);
    }
    assert!(game_core::engine::available_actions(&state, &fx.env()).is_empty());
    assert_eq!(EntityId::PLAYER, state.player.id());
}
