use std::fs;

use game_content::{ContentFactory, builtin};
use game_core::state::{Encounter, Shrine, ShrineCost, ShrineKind, ShrineState};
use game_core::{
    CharacterClass, Command, GameEvent, GameState, NarrativeOutcome, OutcomeKind, Player,
    ShrineAction, execute,
};

#[test]
fn loads_a_data_directory_written_from_builtin_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("pieces.ron"), builtin::PIECES_RON).expect("write pieces");
    fs::write(dir.path().join("bestiary.ron"), builtin::BESTIARY_RON).expect("write bestiary");
    fs::write(dir.path().join("config.toml"), "rooms_per_floor = 4\n").expect("write config");

    let bundle = ContentFactory::new(dir.path())
        .load_bundle()
        .expect("bundle loads");

    assert_eq!(bundle.config.rooms_per_floor, 4);
    assert_eq!(bundle.pieces.len(), builtin::bundle().expect("builtin").pieces.len());
    assert!(bundle.template("bone_lord").is_some());
}

#[test]
fn broken_bestiary_names_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("pieces.ron"), builtin::PIECES_RON).expect("write pieces");
    fs::write(dir.path().join("bestiary.ron"), "(enemies: [").expect("write bestiary");

    let err = ContentFactory::new(dir.path())
        .load_bundle()
        .expect_err("truncated bestiary");
    assert!(format!("{err:#}").contains("bestiary.ron"));
}

#[test]
fn loaded_pieces_drive_shrine_outcomes() {
    let bundle = builtin::bundle().expect("builtin");
    let mut state = GameState::new(17, Player::new("Tam", CharacterClass::Cleric));
    state.player.stats.take_damage(40);
    state.encounter = Encounter::Shrine(ShrineState {
        shrine: Shrine {
            name: "Moss Altar".into(),
            kind: ShrineKind::Nature,
            cost: ShrineCost::default(),
        },
        resolved: false,
    });

    let accept = |ids: &[&str]| {
        Command::Shrine(ShrineAction::Accept(
            NarrativeOutcome {
                kind: OutcomeKind::Mixed,
                ..NarrativeOutcome::default()
            }
            .with_pieces(ids.iter().copied()),
        ))
    };

    let (next, outcome) = execute(&state, bundle.env(), &accept(&["holy_light"]));
    assert!(outcome.is_applied());
    assert!(outcome.events().iter().any(|e| matches!(e, GameEvent::Healed { amount: 15, .. })));
    assert!(next.player.statuses.contains("blessing:minor"));

    let unknown = accept(&["holy_light", "no_such_piece"]);
    let (unchanged, outcome) = execute(&state, bundle.env(), &unknown);
    assert!(!outcome.is_applied());
    assert_eq!(unchanged, state);
}
