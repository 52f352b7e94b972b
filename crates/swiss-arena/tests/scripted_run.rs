//! End-to-end runs from a script into a database file and back out.

use std::collections::HashSet;
use swiss_arena::display::RecordingAnnouncer;
use swiss_arena::input::ScriptedInput;
use swiss_arena::json_output::write_json;
use swiss_arena::queries::{self, PlayerOrder};
use swiss_arena::runner::TournamentRunner;
use swiss_arena::storage::{players_table, Storage};
use swiss_engine::Stage;

const SCRIPT: &str = r#"
[tournament]
name = "Club Championship"
venue = "Utrecht"
date = "2025-01-18"
participants = 8
description = "winter club championship"
time_control = "Blitz"
rounds = 3
pairing = "backtracking"

[[players]]
last_name = "Giri"
first_name = "Anish"
date_of_birth = "1994/06/28"
category = "men"
rank = 1

[[players]]
last_name = "Van Foreest"
first_name = "Jorden"
date_of_birth = "1999/04/30"
category = "men"
rank = 2

[[players]]
last_name = "Warmerdam"
first_name = "Max"
date_of_birth = "2000/02/19"
category = "men"
rank = 3

[[players]]
last_name = "L'Ami"
first_name = "Erwin"
date_of_birth = "1985/04/25"
category = "men"
rank = 4

[[players]]
last_name = "Peng"
first_name = "Zhaoqin"
date_of_birth = "1968/05/08"
category = "women"
rank = 5

[[players]]
last_name = "Haast"
first_name = "Anne"
date_of_birth = "1993/02/14"
category = "women"
rank = 6

[[players]]
last_name = "Bosboom"
first_name = "Manuel"
date_of_birth = "1963/08/09"
category = "men"
rank = 7

[[players]]
last_name = "Ernst"
first_name = "Sipke"
date_of_birth = "1979/04/15"
category = "other"
rank = 8

[[rounds]]
results = ["W", "D", "L", "W"]

[[rounds]]
results = ["D", "W", "W", "L"]

[[rounds]]
results = ["W", "w", "d", "L"]
"#;

fn start() -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2025, 1, 18)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

#[test]
fn test_scripted_run_is_saved_and_queryable() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("arena.db");

    {
        let storage = Storage::open(&db_path).unwrap();
        let input: ScriptedInput = SCRIPT.parse().unwrap();
        let mut runner = TournamentRunner::new(input, RecordingAnnouncer::default(), start())
            .with_storage(&storage, true);

        let t = runner.run().expect("Run should complete");
        assert_eq!(t.stage(), Stage::Final);

        let announcer = runner.into_announcer();
        assert_eq!(announcer.rounds.len(), 3);
        assert_eq!(
            announcer.rounds[0],
            vec![
                "Giri will meet Peng",
                "Van Foreest will meet Haast",
                "Warmerdam will meet Bosboom",
                "L'Ami will meet Ernst",
            ]
        );
        assert_eq!(announcer.standings.len(), 8);
        assert!(announcer.standings[0].ends_with("is number 1"));
    }

    // Reopen the file as a later session would.
    let storage = Storage::open(&db_path).unwrap();
    let t = storage.load_tournament("Club Championship").unwrap();

    let total: f64 = t.participants().iter().map(|p| p.score).sum();
    assert_eq!(total, 12.0);

    let mut ranks: Vec<_> = t.participants().iter().map(|p| p.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=8).collect::<Vec<_>>());

    // Eight players over three rounds always leave a rematch-free pairing.
    for p in t.participants() {
        assert_eq!(p.opponents.len(), 3);
        let distinct: HashSet<_> = p.opponents.iter().collect();
        assert_eq!(distinct.len(), 3, "{} met someone twice", p.last_name);
    }

    let rounds = queries::rounds(&storage, "Club Championship").unwrap();
    let starts: Vec<_> = rounds.iter().map(|r| r.start.format("%H:%M").to_string()).collect();
    assert_eq!(starts, vec!["10:00", "10:05", "10:10"]);

    let matches = queries::matches(&storage, "Club Championship").unwrap();
    assert_eq!(matches.len(), 12);

    let by_rank = queries::tournament_players(&storage, "Club Championship", PlayerOrder::Ranking)
        .unwrap();
    assert!(by_rank
        .windows(2)
        .all(|w| w[0].score >= w[1].score));

    // Three rounds autosaved plus the final save.
    assert_eq!(storage.snapshots().unwrap().len(), 4);
}

#[test]
fn test_export_matches_store_layout() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::open(dir.path().join("arena.db")).unwrap();
    let input: ScriptedInput = SCRIPT.parse().unwrap();
    TournamentRunner::new(input, RecordingAnnouncer::default(), start())
        .with_storage(&storage, false)
        .run()
        .unwrap();

    let export = dir.path().join("out").join("arena.json");
    write_json(&export, &storage.dump().unwrap()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
    let record = &json["Club Championship"]["1"];
    assert_eq!(record["players_number"], "8");
    assert_eq!(record["time_control"], "blitz");
    assert_eq!(record["number_of_rounds"], "3");
    assert_eq!(record["pairing_policy"], "backtracking");
    assert_eq!(record["rounds"]["Round 3"]["matches"]["2"]["result"], "W");

    let players = json[players_table("Club Championship")]
        .as_object()
        .unwrap();
    assert_eq!(players.len(), 8);
    assert_eq!(players["1"]["ranking"], "1");
}
