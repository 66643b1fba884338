use std::error::Error;
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn runplan(workdir: &Path) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("runplan")?;
    cmd.current_dir(workdir)
        .env("LC_ALL", "en_US.UTF-8")
        .env_remove("RUST_LOG")
        .args(["--config-dir", workdir.join("config").to_str().unwrap()]);
    Ok(cmd)
}

fn create_plan(workdir: &Path, name: &str, file: &str) -> Result<(), Box<dyn Error>> {
    runplan(workdir)?
        .args(["new", "--name", name, "--output", file])
        .assert()
        .success();
    Ok(())
}

#[test]
fn new_without_output_uses_plan_name() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    runplan(dir.path())?
        .args(["new", "--name", "Couch to 5k", "--remarks", "three runs a week"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Couchto5k.json"));

    let contents = fs::read_to_string(dir.path().join("Couchto5k.json"))?;
    assert!(contents.contains("\"name\": \"Couch to 5k\""));
    assert!(contents.contains("\"remarks\": \"three runs a week\""));
    Ok(())
}

#[test]
fn empty_plan_shows_placeholder() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    create_plan(dir.path(), "Spring", "spring.json")?;

    runplan(dir.path())?
        .args(["show", "spring.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Spring (0 entries)"))
        .stdout(predicate::str::contains("The running plan has no entries yet."));
    Ok(())
}

#[test]
fn added_entry_is_listed_with_units() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    create_plan(dir.path(), "Spring", "spring.json")?;

    runplan(dir.path())?
        .args([
            "entry", "add", "spring.json", "--week", "1", "--day", "1", "--unit", "30:L",
            "--unit", "5:G:cool down",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Week 1, Day 1"));

    runplan(dir.path())?
        .args(["show", "spring.json", "--units"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Spring (1 entry)"))
        .stdout(predicate::str::contains("Monday"))
        .stdout(predicate::str::contains("35 min"))
        .stdout(predicate::str::contains("30 min L, 5 min G"))
        .stdout(predicate::str::contains("Walking"));
    Ok(())
}

#[test]
fn duplicate_entry_is_not_added() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    create_plan(dir.path(), "Spring", "spring.json")?;
    let add = ["entry", "add", "spring.json", "--week", "2", "--day", "3", "--unit", "20:LS"];

    runplan(dir.path())?.args(add).assert().success();
    let before = fs::read_to_string(dir.path().join("spring.json"))?;
    runplan(dir.path())?
        .args(add)
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert_eq!(fs::read_to_string(dir.path().join("spring.json"))?, before);
    Ok(())
}

#[test]
fn stale_row_is_ignored() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    create_plan(dir.path(), "Spring", "spring.json")?;
    let before = fs::read_to_string(dir.path().join("spring.json"))?;

    runplan(dir.path())?
        .args(["entry", "edit", "spring.json", "3", "--week", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entry at row 3"));
    runplan(dir.path())?
        .args(["entry", "delete", "spring.json", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entry at row 0"));
    assert_eq!(fs::read_to_string(dir.path().join("spring.json"))?, before);
    Ok(())
}

#[test]
fn edit_and_delete_entries() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    create_plan(dir.path(), "Spring", "spring.json")?;
    for day in ["1", "3"] {
        runplan(dir.path())?
            .args(["entry", "add", "spring.json", "--day", day, "--unit", "30:L"])
            .assert()
            .success();
    }

    runplan(dir.path())?
        .args([
            "entry", "edit", "spring.json", "2", "--day", "5", "--remove-unit", "1", "--add-unit",
            "10:P",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Week 1, Day 5"));

    runplan(dir.path())?
        .args(["entry", "delete", "spring.json", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted Week 1, Day 1"));

    runplan(dir.path())?
        .args(["show", "spring.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Friday"))
        .stdout(predicate::str::contains("10 min P"))
        .stdout(predicate::str::contains("Monday").not());
    Ok(())
}

#[test]
fn new_over_existing_plan_requires_confirmation() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    create_plan(dir.path(), "Old", "plan.json")?;

    runplan(dir.path())?
        .args(["new", "--name", "Fresh", "--output", "plan.json"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept the existing running plan."))
        .stderr(predicate::str::contains("will be discarded"));
    assert!(fs::read_to_string(dir.path().join("plan.json"))?.contains("\"Old\""));

    runplan(dir.path())?
        .args(["--yes", "new", "--name", "Fresh", "--output", "plan.json"])
        .assert()
        .success();
    assert!(fs::read_to_string(dir.path().join("plan.json"))?.contains("\"Fresh\""));
    Ok(())
}

#[test]
fn broken_plan_reports_import_failure() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("broken.json"), "{ nope")?;

    runplan(dir.path())?
        .args(["show", "broken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be imported"));

    runplan(dir.path())?
        .args(["show", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist or cannot be read"));
    Ok(())
}

#[test]
fn invalid_unit_spec_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    create_plan(dir.path(), "Spring", "spring.json")?;

    runplan(dir.path())?
        .args(["entry", "add", "spring.json", "--unit", "ten:L"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid minutes"));
    runplan(dir.path())?
        .args(["entry", "add", "spring.json", "--unit", "10:X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown movement type 'X'"));
    Ok(())
}

#[test]
fn plan_edit_renames_and_keeps_entries() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    create_plan(dir.path(), "Spring", "spring.json")?;
    runplan(dir.path())?
        .args(["entry", "add", "spring.json", "--day", "4", "--unit", "40:L"])
        .assert()
        .success();

    runplan(dir.path())?
        .args([
            "plan", "edit", "spring.json", "--name", "Spring 10k", "--remarks", "build up",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated running plan Spring 10k"));

    runplan(dir.path())?
        .args(["show", "spring.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Spring 10k (1 entry)"))
        .stdout(predicate::str::contains("build up"))
        .stdout(predicate::str::contains("Thursday"));

    runplan(dir.path())?
        .args(["plan", "edit", "spring.json", "--name", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid plan"));
    Ok(())
}

#[test]
fn repeated_units_survive_an_entry_edit() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("intervals.json"),
        r#"{
  "name": "Intervals",
  "entries": [
    {
      "week": 1,
      "day": 2,
      "units": [
        { "duration": 5, "movement_type": "L" },
        { "duration": 2, "movement_type": "G" },
        { "duration": 5, "movement_type": "L" },
        { "duration": 2, "movement_type": "G" }
      ]
    }
  ]
}"#,
    )?;

    runplan(dir.path())?
        .args(["entry", "edit", "intervals.json", "1", "--remarks", "track"])
        .assert()
        .success();

    runplan(dir.path())?
        .args(["show", "intervals.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("14 min"))
        .stdout(predicate::str::contains("5 min L, 2 min G, 5 min L, 2 min G"));
    Ok(())
}

#[test]
fn new_overwrites_unreadable_destination() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("plan.json"), "{ not a plan")?;

    runplan(dir.path())?
        .args(["new", "--name", "Fresh", "--output", "plan.json"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created running plan"));
    assert!(fs::read_to_string(dir.path().join("plan.json"))?.contains("\"Fresh\""));
    Ok(())
}

#[test]
fn rust_log_overrides_default_level() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    runplan(dir.path())?
        .env("RUST_LOG", "debug")
        .arg("movements")
        .assert()
        .success()
        .stderr(predicate::str::contains("configuration resolved"));

    runplan(dir.path())?
        .arg("movements")
        .assert()
        .success()
        .stderr(predicate::str::contains("configuration resolved").not());
    Ok(())
}
