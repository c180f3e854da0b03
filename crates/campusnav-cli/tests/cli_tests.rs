//! Integration tests for the `campusnav` binary.
//!
//! Each test seeds a fresh database through the library and drives the CLI
//! with `assert_cmd`.

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use campusnav_lib::{CampusStore, Edge, Location, Point};

struct TestEnv {
    _temp_dir: TempDir,
    db_path: PathBuf,
}

impl TestEnv {
    /// Seed a small campus: a direct walkway, a shaded detour past the
    /// library and a scenic detour through the rose garden.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("campus.db");
        let store = CampusStore::create(&db_path).expect("create database");

        for location in [
            Location::new(1, "Main Gate", Point::new(0.0, 0.0)),
            Location {
                has_shade: true,
                ..Location::new(2, "Library", Point::new(100.0, 0.0))
            },
            Location {
                scenic_level: 5,
                ..Location::new(3, "Rose Garden", Point::new(0.0, 90.0))
            },
            Location::new(4, "Cafeteria", Point::new(100.0, 90.0)),
            Location::new(5, "Observatory", Point::new(400.0, 400.0)),
        ] {
            store.insert_location(&location).expect("insert location");
        }
        for edge in [
            Edge {
                has_shade: true,
                ..Edge::new(1, 1, 2, 100.0, 2)
            },
            Edge {
                has_shade: true,
                ..Edge::new(2, 2, 4, 100.0, 2)
            },
            Edge {
                scenic_level: 5,
                ..Edge::new(3, 1, 3, 90.0, 2)
            },
            Edge {
                scenic_level: 5,
                ..Edge::new(4, 3, 4, 90.0, 2)
            },
            Edge::new(5, 1, 4, 150.0, 3),
        ] {
            store.insert_edge(&edge).expect("insert edge");
        }

        Self {
            _temp_dir: temp_dir,
            db_path,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("campusnav");
        cmd.env("RUST_LOG", "error")
            .env_remove("CAMPUSNAV_WEIGHT_SHORTEST")
            .env_remove("CAMPUSNAV_WEIGHT_SHADE")
            .env_remove("CAMPUSNAV_WEIGHT_SCENIC")
            .arg("--db")
            .arg(&self.db_path);
        cmd
    }

    fn path(&self) -> &Path {
        &self.db_path
    }
}

#[test]
fn init_creates_database() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("fresh.db");

    cargo_bin_cmd!("campusnav")
        .env("RUST_LOG", "error")
        .arg("--db")
        .arg(&db_path)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Campus database ready"));

    assert!(db_path.exists());
    assert!(CampusStore::open(&db_path).is_ok());
}

#[test]
fn route_by_name_prints_text_summary() {
    let env = TestEnv::new();
    env.cmd()
        .args(["route", "--from", "Main Gate", "--to", "cafeteria"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Route: Main Gate -> Cafeteria (1 hops, criterion: Shortest path)",
        ))
        .stdout(predicate::str::contains("Distance: 150.0 m, time: 3 min"));
}

#[test]
fn scenic_route_as_json() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--format", "json", "route", "--from", "1", "--to", "4"])
        .args(["--criterion", "most-scenic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"criterion\": \"SCENIC\""))
        .stdout(predicate::str::contains("\"name\": \"Rose Garden\""))
        .stdout(predicate::str::contains("\"average_scenic_level\": 5.0"));
}

#[test]
fn shade_override_from_environment_changes_route() {
    let env = TestEnv::new();
    env.cmd()
        .env("CAMPUSNAV_WEIGHT_SHADE", "0.5")
        .args(["route", "--from", "Main Gate", "--to", "Cafeteria"])
        .args(["--criterion", "shaded"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1: Library (2)"));
}

#[test]
fn unreachable_destination_reports_kind_and_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["route", "--from", "Main Gate", "--to", "Observatory"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Route failed [NO_ROUTE]"));
}

#[test]
fn same_endpoint_is_rejected() {
    let env = TestEnv::new();
    env.cmd()
        .args(["route", "--from", "Library", "--to", "2"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("SAME_ENDPOINT"));
}

#[test]
fn misspelled_location_suggests_alternatives() {
    let env = TestEnv::new();
    env.cmd()
        .args(["route", "--from", "Main Gate", "--to", "Cafetria"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean"))
        .stderr(predicate::str::contains("Cafeteria"));
}

#[test]
fn unknown_criterion_is_a_usage_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["route", "--from", "1", "--to", "4", "--criterion", "fastest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown criterion"));
}

#[test]
fn history_round_trip_and_recommendation() {
    let env = TestEnv::new();
    env.cmd()
        .args(["route", "--from", "Main Gate", "--to", "Cafeteria"])
        .args(["--criterion", "scenic", "--actor", "42"])
        .assert()
        .success();

    env.cmd()
        .args(["history", "--actor", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Main Gate (1) -> Cafeteria (4)"))
        .stdout(predicate::str::contains("Most scenic"));

    env.cmd()
        .args(["recommend", "--actor", "42", "--from", "Main Gate", "--to", "Cafeteria"])
        .assert()
        .success()
        .stdout(predicate::str::contains("criterion: Most scenic"))
        .stdout(predicate::str::contains("Rose Garden"));

    env.cmd()
        .args(["history", "--actor", "42", "--clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 history entries"));

    env.cmd()
        .args(["history", "--actor", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No navigation history."));
}

#[test]
fn recommend_without_history_says_so() {
    let env = TestEnv::new();
    env.cmd()
        .args(["recommend", "--actor", "8", "--from", "1", "--to", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No previous route"));
}

#[test]
fn nearby_lists_closest_first() {
    let env = TestEnv::new();
    env.cmd()
        .args(["nearby", "--from", "Main Gate", "--radius", "120"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)Rose Garden.*Library").unwrap())
        .stdout(predicate::str::contains("Cafeteria").not());
}

#[test]
fn database_path_can_come_from_environment() {
    let env = TestEnv::new();
    cargo_bin_cmd!("campusnav")
        .env("RUST_LOG", "error")
        .env("CAMPUSNAV_DB", env.path())
        .args(["route", "--from", "1", "--to", "4"])
        .assert()
        .success();
}

#[test]
fn missing_database_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    cargo_bin_cmd!("campusnav")
        .env("RUST_LOG", "error")
        .arg("--db")
        .arg(temp_dir.path().join("absent.db"))
        .args(["route", "--from", "1", "--to", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("campus database not found"));
}
