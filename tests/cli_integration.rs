#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        Self { dir }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("hubtasks").expect("binary");
        cmd.current_dir(self.dir.path())
            .env_remove("HUBTASKS_DIR")
            .env_remove("HUBTASKS_LOG")
            .env_remove("HUBTASKS_LOG_FORMAT");
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    /// Run at a pinned instant.
    fn at(&self, now: &str, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.extend(["--now", now]);
        self.run_ok(&a)
    }

    fn write_file(&self, filename: &str, content: &str) -> PathBuf {
        let p = self.dir.path().join(filename);
        fs::write(&p, content).expect("write file");
        p
    }

    fn load_settings_raw(&self, content: &str) -> Value {
        let p = self.write_file("_settings.json", content);
        let output = self
            .cmd()
            .args(["settings", "load", "--json"])
            .pipe_stdin(&p)
            .unwrap()
            .output()
            .expect("settings load");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn load_settings(&self, content: &str) -> Value {
        let v = self.load_settings_raw(content);
        assert_eq!(v["success"], true, "settings load failed: {v}");
        v
    }
}

fn hotel_settings_json() -> String {
    serde_json::json!({
        "departments": [
            {"name": "Housekeeping", "slug": "housekeeping"},
            {"name": "Maintenance", "slug": "maintenance", "color": "#0ea5e9"}
        ],
        "recurring_patterns": [
            {"name": "Weekly", "interval_type": "fixed", "interval_days": 7},
            {"name": "Ten days after", "interval_type": "dynamic", "interval_days": 10, "lead_time_days": 2}
        ],
        "task_states": [
            {"name": "Pending", "slug": "pending", "role": "pending", "sort_order": 0},
            {"name": "In progress", "slug": "in-progress", "checklist_started_state": true, "sort_order": 1},
            {"name": "Due", "slug": "due", "role": "due", "sort_order": 2},
            {"name": "Overdue", "slug": "overdue", "role": "overdue", "sort_order": 3},
            {"name": "Complete", "slug": "complete", "role": "complete", "is_complete_state": true, "sort_order": 4}
        ],
        "areas": [
            {"name": "Floor 1", "area_type": "floor"},
            {"name": "Room 101", "area_type": "room", "parent": "Floor 1"}
        ]
    })
    .to_string()
}

fn setup_hotel(env: &TestEnv) {
    env.run_ok(&["init"]);
    env.run_ok(&["location", "use", "1"]);
    env.load_settings(&hotel_settings_json());
}

fn board(env: &TestEnv, now: &str, extra: &[&str]) -> Vec<Value> {
    let mut args = vec!["instance", "list"];
    args.extend_from_slice(extra);
    env.at(now, &args)["data"]["instances"]
        .as_array()
        .unwrap()
        .clone()
}

fn str_of(v: &Value) -> String {
    v.as_str().unwrap().to_string()
}

// ─── init & location ───────────────────────────────────────────────

#[test]
fn test_init_creates_database() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    assert!(v["data"]["path"].as_str().unwrap().ends_with("hubtasks.db"));
    assert!(env.dir.path().join(".hubtasks/hubtasks.db").exists());
}

#[test]
fn test_commands_require_init() {
    let env = TestEnv::new();
    let v = env.run_err(&["task", "list", "--location", "1"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
}

#[test]
fn test_location_required() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["task", "list"]);
    assert_eq!(v["error"]["code"], "NO_LOCATION");

    env.run_ok(&["task", "list", "--location", "3"]);
    env.run_ok(&["location", "use", "3"]);
    let v = env.run_ok(&["location", "show"]);
    assert_eq!(v["data"]["active_location_id"], 3);
    env.run_ok(&["task", "list"]);
}

#[test]
fn test_corrupt_config_reported() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    fs::write(env.dir.path().join(".hubtasks/config.json"), "{\"active_location_id\": ").unwrap();

    let v = env.run_err(&["task", "list"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    assert!(v["error"]["message"].as_str().unwrap().contains("config.json"));

    // `location use` rewrites the file.
    env.run_ok(&["location", "use", "2"]);
    let v = env.run_ok(&["location", "show"]);
    assert_eq!(v["data"]["active_location_id"], 2);
}

#[test]
fn test_data_dir_found_from_subdirectory() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let sub = env.dir.path().join("reports/2024");
    fs::create_dir_all(&sub).unwrap();

    let output = env
        .cmd()
        .current_dir(&sub)
        .args(["state", "list", "--location", "1", "--json"])
        .output()
        .expect("run");
    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["success"], true, "{v}");
}

#[test]
fn test_invalid_now_rejected() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["sweep", "--now", "yesterday"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

// ─── settings ──────────────────────────────────────────────────────

#[test]
fn test_settings_load_and_show() {
    let env = TestEnv::new();
    setup_hotel(&env);

    let v = env.run_ok(&["state", "list"]);
    let states = v["data"]["states"].as_array().unwrap();
    assert_eq!(states.len(), 5);
    let started: Vec<_> = states
        .iter()
        .filter(|s| s["checklist_started_state"] == true)
        .collect();
    assert_eq!(started.len(), 1);

    let v = env.run_ok(&["pattern", "list"]);
    assert_eq!(v["data"]["patterns"].as_array().unwrap().len(), 2);

    let v = env.run_ok(&["settings", "show"]);
    let areas = v["data"]["areas"].as_array().unwrap();
    let room = areas.iter().find(|a| a["name"] == "Room 101").unwrap();
    assert_eq!(room["parent"], "Floor 1");
}

#[test]
fn test_settings_default_states() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.run_ok(&["location", "use", "9"]);
    env.load_settings(r#"{"departments": [{"name": "Front desk", "slug": "front-desk"}]}"#);

    let v = env.run_ok(&["state", "list"]);
    let roles: Vec<&str> = v["data"]["states"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["pending", "due", "overdue", "complete"]);
}

#[test]
fn test_settings_rejects_unknown_fields() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.run_ok(&["location", "use", "1"]);
    let v = env.load_settings_raw(r#"{"departments": [], "colour_scheme": "dark"}"#);
    assert_eq!(v["success"], false);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let v = env.run_ok(&["state", "list"]);
    assert!(v["data"]["states"].as_array().unwrap().is_empty());
}

#[test]
fn test_settings_rejects_duplicate_roles() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.run_ok(&["location", "use", "1"]);
    let v = env.load_settings_raw(
        r#"{"task_states": [
            {"name": "Pending", "slug": "pending", "role": "pending"},
            {"name": "Queued", "slug": "queued", "role": "pending"}
        ]}"#,
    );
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

// ─── tasks ─────────────────────────────────────────────────────────

#[test]
fn test_task_add_validates_pattern() {
    let env = TestEnv::new();
    setup_hotel(&env);

    let v = env.run_err(&["task", "add", "Clean vents", "--recurrence", "fixed"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let v = env.run_err(&[
        "task", "add", "Clean vents", "--recurrence", "fixed", "--pattern", "Ten days after",
    ]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let v = env.run_err(&["task", "add", "Clean vents", "--recurrence", "fixed", "--pattern", "Monthly"]);
    assert_eq!(v["error"]["code"], "PATTERN_NOT_FOUND");

    let v = env.run_err(&["task", "add", "Clean vents", "--recurrence", "hourly"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let v = env.run_err(&["task", "add", "Clean vents", "--department", "spa"]);
    assert_eq!(v["error"]["code"], "DEPARTMENT_NOT_FOUND");
}

#[test]
fn test_task_add_show_edit() {
    let env = TestEnv::new();
    setup_hotel(&env);

    let v = env.at(
        "2024-01-10",
        &[
            "task", "add", "Turn mattresses",
            "--recurrence", "fixed", "--pattern", "Weekly",
            "--department", "housekeeping", "--area", "Room 101",
            "--item", "Strip bed", "--item", "Rotate", "--item", "Remake",
            "--by", "manager",
        ],
    );
    let id = str_of(&v["data"]["task"]["id"]);
    // Fixed tasks wait for the sweep.
    assert!(v["data"]["first_instance"].is_null());

    let v = env.at("2024-01-10", &["task", "show", &id[..10]]);
    let task = &v["data"]["task"];
    assert_eq!(task["name"], "Turn mattresses");
    assert_eq!(task["pattern"]["name"], "Weekly");
    assert_eq!(task["checklist_items"].as_array().unwrap().len(), 3);
    assert_eq!(task["created_by"], "manager");
    assert_eq!(task["future_instances"], 0);

    env.run_ok(&["task", "edit", &id, "--name", "Rotate mattresses", "--require-photo", "true"]);
    let v = env.run_ok(&["task", "show", &id]);
    assert_eq!(v["data"]["task"]["name"], "Rotate mattresses");
    assert_eq!(v["data"]["task"]["require_completion_photo"], true);

    let v = env.run_err(&["task", "edit", &id, "--recurrence", "dynamic"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_checklist_templates() {
    let env = TestEnv::new();
    setup_hotel(&env);

    let v = env.run_ok(&[
        "template", "save", "Room turnover",
        "--item", "Strip beds", "--item", "Vacuum", "--item", "Restock minibar",
    ]);
    assert_eq!(v["data"]["created"], true);
    env.run_ok(&["template", "save", "Pool check", "--item", "Test chlorine"]);

    let v = env.run_ok(&["template", "list"]);
    let names: Vec<String> = v["data"]["templates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| str_of(&t["name"]))
        .collect();
    assert_eq!(names, vec!["Pool check", "Room turnover"]);

    let v = env.at(
        "2024-01-10",
        &["task", "add", "Turn room 101", "--area", "Room 101", "--template", "Room turnover"],
    );
    let id = str_of(&v["data"]["task"]["id"]);
    let v = env.run_ok(&["task", "show", &id]);
    assert_eq!(
        v["data"]["task"]["checklist_items"],
        serde_json::json!(["Strip beds", "Vacuum", "Restock minibar"])
    );

    env.run_ok(&["task", "edit", &id, "--template", "Pool check"]);
    // Deleting the template leaves the task's copy alone.
    env.run_ok(&["template", "delete", "Pool check"]);
    let v = env.run_ok(&["task", "show", &id]);
    assert_eq!(v["data"]["task"]["checklist_items"], serde_json::json!(["Test chlorine"]));

    let v = env.run_err(&["task", "add", "Check spa", "--template", "Pool check"]);
    assert_eq!(v["error"]["code"], "TEMPLATE_NOT_FOUND");
    let v = env.run_err(&["template", "show", "Pool check"]);
    assert_eq!(v["error"]["code"], "TEMPLATE_NOT_FOUND");

    env.cmd()
        .args(["task", "add", "Check spa", "--template", "Room turnover", "--item", "Extra"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_one_off_task_gets_instance_at_start() {
    let env = TestEnv::new();
    setup_hotel(&env);

    let v = env.at(
        "2024-01-10",
        &["task", "add", "Fix lobby door", "--start", "2024-01-15"],
    );
    assert_eq!(v["data"]["first_instance"]["due_date"], "2024-01-15");

    let entries = board(&env, "2024-01-10", &[]);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "pending");
}

#[test]
fn test_task_delete_removes_instances() {
    let env = TestEnv::new();
    setup_hotel(&env);
    let v = env.at("2024-01-10", &["task", "add", "Paint fence"]);
    let id = str_of(&v["data"]["task"]["id"]);

    let v = env.run_ok(&["task", "delete", &id]);
    assert_eq!(v["data"]["deleted"]["instances"], 1);
    assert!(board(&env, "2024-01-10", &["--show-completed"]).is_empty());

    let v = env.run_err(&["task", "show", &id]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

// ─── sweep ─────────────────────────────────────────────────────────

#[test]
fn test_sweep_generates_and_promotes() {
    let env = TestEnv::new();
    setup_hotel(&env);
    let v = env.at(
        "2024-01-10",
        &["task", "add", "Clean ice machine", "--recurrence", "fixed", "--pattern", "Weekly"],
    );
    let task_id = str_of(&v["data"]["task"]["id"]);

    let v = env.at("2024-01-10T06:00:00", &["sweep"]);
    assert_eq!(v["data"]["report"]["generated"], 1);

    let entries = board(&env, "2024-01-10", &[]);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["due_date"], "2024-01-10");
    assert_eq!(entries[0]["status"], "pending");
    assert_eq!(entries[0]["task_id"], task_id.as_str());

    // Idempotent within the day; the next pass promotes to due.
    let v = env.at("2024-01-10T07:00:00", &["sweep"]);
    assert_eq!(v["data"]["report"]["generated"], 0);
    assert_eq!(v["data"]["report"]["promoted_due"], 1);

    let v = env.at("2024-01-11", &["sweep"]);
    assert_eq!(v["data"]["report"]["promoted_overdue"], 1);
    assert_eq!(v["data"]["report"]["generated"], 0);

    let v = env.at("2024-01-17", &["sweep"]);
    assert_eq!(v["data"]["report"]["generated"], 1);

    let v = env.at("2024-01-17", &["task", "show", &task_id]);
    assert_eq!(v["data"]["task"]["future_instances"], 1);

    let v = env.at("2024-01-17", &["status"]);
    assert_eq!(v["data"]["active_tasks"], 1);
    assert_eq!(v["data"]["instances"]["total"], 2);
    assert_eq!(v["data"]["instances"]["overdue"], 1);
    assert_eq!(v["data"]["instances"]["due_today"], 1);
}

// ─── instances ─────────────────────────────────────────────────────

#[test]
fn test_dynamic_completion_carries_notes() {
    let env = TestEnv::new();
    setup_hotel(&env);
    let v = env.at(
        "2024-01-10",
        &[
            "task", "add", "Deep clean oven",
            "--recurrence", "dynamic", "--pattern", "Ten days after",
        ],
    );
    let first = str_of(&v["data"]["first_instance"]["id"]);

    env.run_ok(&["note", "add", &first, "Door seal worn", "--by", "ana"]);
    env.run_ok(&["note", "add", &first, "Used new degreaser", "--no-carry"]);

    let v = env.at(
        "2024-01-12T15:30:00",
        &["instance", "complete", &first, "--by", "maria"],
    );
    assert_eq!(v["data"]["completed"]["completed_by"], "maria");
    assert_eq!(v["data"]["next_instance"]["due_date"], "2024-01-22");
    assert_eq!(v["data"]["carried_notes"], 1);

    let next = str_of(&v["data"]["next_instance"]["id"]);
    let v = env.run_ok(&["note", "list", &next]);
    let notes = v["data"]["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["text"], "Door seal worn");
    assert_eq!(notes[0]["created_by"], "ana");
    assert_eq!(notes[0]["carry_forward"], true);

    let v = env.run_ok(&["note", "list", &first]);
    assert_eq!(v["data"]["notes"].as_array().unwrap().len(), 2);
}

#[test]
fn test_complete_twice_rejected() {
    let env = TestEnv::new();
    setup_hotel(&env);
    let v = env.at("2024-01-10", &["task", "add", "Replace bulbs"]);
    let id = str_of(&v["data"]["first_instance"]["id"]);

    env.at("2024-01-10T09:00:00", &["instance", "complete", &id]);
    let v = env.run_err(&["instance", "complete", &id, "--now", "2024-01-10T10:00:00"]);
    assert_eq!(v["error"]["code"], "INVALID_STATUS_TRANSITION");

    // Completed instances drop off the board unless asked for.
    assert!(board(&env, "2024-01-10", &[]).is_empty());
    assert_eq!(board(&env, "2024-01-10", &["--show-completed"]).len(), 1);
}

#[test]
fn test_completion_photo_required() {
    let env = TestEnv::new();
    setup_hotel(&env);
    let v = env.at("2024-01-10", &["task", "add", "Pool chemistry", "--require-photo"]);
    let id = str_of(&v["data"]["first_instance"]["id"]);

    let v = env.run_err(&["instance", "complete", &id]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let v = env.run_ok(&["instance", "complete", &id, "--photo", "https://cdn.test/pool.jpg"]);
    assert_eq!(v["data"]["completed"]["completion_photos"][0], "https://cdn.test/pool.jpg");
}

#[test]
fn test_checklist_moves_to_started_state() {
    let env = TestEnv::new();
    setup_hotel(&env);
    let v = env.at(
        "2024-01-10",
        &["task", "add", "Prepare suite", "--item", "Linen", "--item", "Minibar"],
    );
    let id = str_of(&v["data"]["first_instance"]["id"]);

    let v = env.run_err(&["instance", "check", &id, "2"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let v = env.run_ok(&["instance", "check", &id, "1"]);
    assert_eq!(v["data"]["status_changed_to"], "in-progress");
    assert_eq!(v["data"]["checklist"][1]["checked"], true);
    assert_eq!(v["data"]["checklist"][0]["checked"], false);

    let v = env.run_ok(&["instance", "show", &id]);
    assert_eq!(v["data"]["status"]["slug"], "in-progress");

    let v = env.run_ok(&["instance", "check", &id, "1", "--uncheck"]);
    assert!(v["data"]["status_changed_to"].is_null());
    assert_eq!(v["data"]["checklist"][1]["checked"], false);
}

#[test]
fn test_instance_status_changes() {
    let env = TestEnv::new();
    setup_hotel(&env);
    let v = env.at("2024-01-10", &["task", "add", "Repaint hallway"]);
    let id = str_of(&v["data"]["first_instance"]["id"]);

    let v = env.run_ok(&["instance", "status", &id, "in-progress"]);
    assert_eq!(v["data"]["from"], "pending");
    assert_eq!(v["data"]["to"], "in-progress");

    let v = env.run_err(&["instance", "status", &id, "complete"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let v = env.run_err(&["instance", "status", &id, "archived"]);
    assert_eq!(v["error"]["code"], "STATE_NOT_FOUND");
}

#[test]
fn test_board_filters_and_window() {
    let env = TestEnv::new();
    setup_hotel(&env);
    env.at(
        "2024-01-10",
        &["task", "add", "Unclog drain", "--department", "maintenance", "--area", "Room 101"],
    );
    env.at(
        "2024-01-10",
        &["task", "add", "Refresh towels", "--department", "housekeeping", "--start", "2024-01-20"],
    );
    env.at("2024-01-10", &["task", "add", "Spring clean", "--start", "2024-03-01"]);

    assert_eq!(board(&env, "2024-01-10", &[]).len(), 2);
    assert_eq!(board(&env, "2024-01-10", &["--no-future"]).len(), 1);

    let entries = board(&env, "2024-01-10", &["--department", "maintenance"]);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["task_name"], "Unclog drain");
    assert_eq!(entries[0]["area"], "Floor 1 / Room 101");

    let entries = board(&env, "2024-01-10", &["--search", "towel"]);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["department"], "Housekeeping");

    assert_eq!(board(&env, "2024-01-10", &["--area", "Floor 1"]).len(), 1);
    assert_eq!(board(&env, "2024-01-10", &["--status", "overdue"]).len(), 0);
}

#[test]
fn test_instances_scoped_to_location() {
    let env = TestEnv::new();
    setup_hotel(&env);
    let v = env.at("2024-01-10", &["task", "add", "Check boiler"]);
    let id = str_of(&v["data"]["first_instance"]["id"]);

    let v = env.run_err(&["instance", "show", &id, "--location", "2"]);
    assert_eq!(v["error"]["code"], "INSTANCE_NOT_FOUND");
}

// ─── bulk operations ───────────────────────────────────────────────

fn weekly_task_with_three_instances(env: &TestEnv) -> String {
    let v = env.at(
        "2024-01-10",
        &["task", "add", "Inspect fire doors", "--recurrence", "fixed", "--pattern", "Weekly"],
    );
    for day in ["2024-01-10", "2024-01-17", "2024-01-24"] {
        env.at(day, &["sweep"]);
    }
    str_of(&v["data"]["task"]["id"])
}

#[test]
fn test_future_reschedule() {
    let env = TestEnv::new();
    setup_hotel(&env);
    let task_id = weekly_task_with_three_instances(&env);

    let v = env.at("2024-01-09", &["task", "future", "count", &task_id]);
    assert_eq!(v["data"]["count"], 3);

    let v = env.at(
        "2024-01-09",
        &["task", "future", "reschedule", &task_id, "--interval", "14"],
    );
    assert_eq!(v["data"]["outcome"]["matched"], 3);
    assert_eq!(v["data"]["outcome"]["applied"], 3);
    assert_eq!(v["data"]["outcome"]["failed"], 0);

    let dates: Vec<String> = board(&env, "2024-01-09", &[])
        .iter()
        .map(|e| str_of(&e["due_date"]))
        .collect();
    assert_eq!(dates, vec!["2024-01-23", "2024-02-06"]);
    let late = board(&env, "2024-02-20", &["--no-future"]);
    assert_eq!(late.last().unwrap()["due_date"], "2024-02-20");
}

#[test]
fn test_future_clear_and_update() {
    let env = TestEnv::new();
    setup_hotel(&env);
    let v = env.at(
        "2024-01-10",
        &["task", "add", "Restock bar", "--item", "Spirits", "--item", "Mixers", "--start", "2024-01-12"],
    );
    let task_id = str_of(&v["data"]["task"]["id"]);
    let instance = str_of(&v["data"]["first_instance"]["id"]);
    env.run_ok(&["instance", "check", &instance, "0"]);

    let v = env.at("2024-01-10", &["task", "edit", &task_id, "--item", "Wine", "--update-future"]);
    assert_eq!(v["data"]["future_update"]["applied"], 1);
    let v = env.run_ok(&["instance", "show", &instance]);
    assert_eq!(v["data"]["checklist"][0]["checked"], false);

    let v = env.at("2024-01-10", &["task", "future", "update", &task_id]);
    assert_eq!(v["data"]["outcome"]["applied"], 0);

    let v = env.at("2024-01-10", &["task", "future", "clear", &task_id]);
    assert_eq!(v["data"]["outcome"]["applied"], 1);
    let v = env.run_err(&["instance", "show", &instance]);
    assert_eq!(v["error"]["code"], "INSTANCE_NOT_FOUND");
}

// ─── text output ───────────────────────────────────────────────────

#[test]
fn test_text_output() {
    let env = TestEnv::new();
    setup_hotel(&env);
    env.cmd()
        .args(["task", "add", "Polish brass", "--now", "2024-01-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task: Polish brass"));

    env.cmd()
        .args(["instance", "list", "--now", "2024-01-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[pending] Polish brass"));

    env.cmd()
        .args(["task", "show", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));
}
