//! Saving, reloading and amending tournaments across store sessions.

use chrono::{NaiveDate, NaiveDateTime};
use swiss_arena::storage::{Storage, StorageError};
use swiss_core::{Category, Outcome, Participant};
use swiss_engine::{EngineError, PairingPolicy, Stage, Tournament, TournamentConfig};

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 3)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn open_tournament() -> Tournament {
    let config = TournamentConfig::parse(
        "May Rapid",
        "Brussels",
        "2025/05/03",
        "6",
        "",
        "rapid",
        "3",
        PairingPolicy::Relaxation,
    )
    .unwrap();
    let mut t = Tournament::new(config).unwrap();
    let dob = NaiveDate::from_ymd_opt(1980, 1, 1).unwrap();
    t.register(
        ["Ashe", "Birch", "Cedar", "Dogwood", "Elm", "Fir"]
            .into_iter()
            .zip(1..)
            .map(|(name, rank)| Participant::new(name, "P", dob, Category::Other, rank))
            .collect(),
    )
    .unwrap();
    t
}

#[test]
fn test_interrupted_tournament_resumes_from_store() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("arena.db");

    let mut original = open_tournament();
    original.open_round(at(9)).unwrap();
    original
        .record_outcomes(&[Outcome::Win, Outcome::Draw, Outcome::Loss])
        .unwrap();
    original.open_round(at(9)).unwrap();
    Storage::open(&db).unwrap().save_tournament(&original).unwrap();

    let storage = Storage::open(&db).unwrap();
    let mut resumed = storage.load_tournament("May Rapid").unwrap();
    assert_eq!(resumed.stage(), Stage::RoundOpen(2));
    assert_eq!(resumed.round(2).unwrap().pairings, original.round(2).unwrap().pairings);

    let outcomes = [Outcome::Draw, Outcome::Draw, Outcome::Win];
    resumed.record_outcomes(&outcomes).unwrap();
    original.record_outcomes(&outcomes).unwrap();
    for p in original.participants() {
        let again = resumed.participant(p.id()).unwrap();
        assert_eq!(again.score, p.score);
        assert_eq!(again.opponents, p.opponents);
    }

    storage.save_tournament(&resumed).unwrap();
    let reloaded = storage.load_tournament("May Rapid").unwrap();
    assert_eq!(reloaded.stage(), Stage::RoundScored(2));
    assert_eq!(reloaded.rounds(), resumed.rounds());
}

#[test]
fn test_amend_saved_tournament() {
    let storage = Storage::open(":memory:").unwrap();
    storage.save_tournament(&open_tournament()).unwrap();

    let mut t = storage.load_tournament("May Rapid").unwrap();
    assert!(t.set_description("spring rapid, second edition"));
    assert!(!t.set_description("   "));
    t.override_rank("Fir", 1).unwrap();
    assert!(matches!(
        t.override_rank("Oak", 2),
        Err(EngineError::UnknownParticipant(name)) if name == "Oak"
    ));
    storage.save_tournament(&t).unwrap();

    let amended = storage.load_tournament("May Rapid").unwrap();
    assert_eq!(amended.config().description, "spring rapid, second edition");
    assert_eq!(amended.participant("Fir").unwrap().rank, 1);
    assert_eq!(storage.snapshots().unwrap().len(), 2);
}

#[test]
fn test_finished_tournament_keeps_its_ranks_after_reload() {
    let storage = Storage::open(":memory:").unwrap();
    let mut t = open_tournament();
    for _ in 0..3 {
        t.open_round(at(9)).unwrap();
        t.record_outcomes(&[Outcome::Win, Outcome::Draw, Outcome::Loss])
            .unwrap();
    }
    t.finish().unwrap();
    storage.save_tournament(&t).unwrap();

    let mut reloaded = storage.load_tournament("May Rapid").unwrap();
    assert_eq!(reloaded.stage(), Stage::Final);
    let last = reloaded
        .participants()
        .iter()
        .max_by_key(|p| p.rank)
        .unwrap()
        .last_name
        .clone();
    assert!(matches!(
        reloaded.override_rank(&last, 1),
        Err(EngineError::InvalidStage { stage: Stage::Final, .. })
    ));
    assert!(reloaded.set_description("closed"));
    storage.save_tournament(&reloaded).unwrap();

    let again = storage.load_tournament("May Rapid").unwrap();
    assert_eq!(again.stage(), Stage::Final);
    assert_eq!(again.config().description, "closed");
    assert_eq!(again.participant(&last).unwrap().rank, 6);
}

#[test]
fn test_unknown_tournament_is_not_found() {
    let storage = Storage::open(":memory:").unwrap();
    assert!(matches!(
        storage.load_tournament("Nowhere"),
        Err(StorageError::NotFound(_))
    ));
}
