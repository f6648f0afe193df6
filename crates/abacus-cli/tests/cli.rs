//! CLI command integration tests.
//! Each test uses a temp directory via ABACUS_DATA_DIR for full isolation.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn abacus_cmd(data_dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("abacus").unwrap();
    cmd.env("ABACUS_DATA_DIR", data_dir.path());
    cmd
}

#[test]
fn press_evaluates_left_to_right() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["press", "2", "+", "3", "*", "4", "="])
        .assert()
        .success()
        .stdout("20\n");
}

#[test]
fn press_accepts_x_for_multiply() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["press", "2", "+", "3", "x", "4", "="])
        .assert()
        .success()
        .stdout("20\n");
}

#[test]
fn press_division_by_zero_shows_error() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["press", "5", "/", "0", "="])
        .assert()
        .success()
        .stdout("Error\n");
}

#[test]
fn press_scientific_button() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["press", "16", "sqrt"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn press_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["press", "2", "?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse key"));
}

#[test]
fn history_persists_across_invocations() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["press", "7", "-", "2", "="])
        .assert()
        .success();

    abacus_cmd(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("7 - 2 = 5"));

    abacus_cmd(&dir)
        .args(["history", "--clear"])
        .assert()
        .success();

    abacus_cmd(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("(no history)"));
}

#[test]
fn profiles_are_isolated() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["press", "--profile", "work", "1", "+", "1", "="])
        .assert()
        .success();

    abacus_cmd(&dir)
        .args(["history", "--profile", "home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no history)"));

    abacus_cmd(&dir)
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("work"))
        .stdout(predicate::str::contains("home"));
}

#[test]
fn eval_respects_precedence_and_records_history() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["eval", "2 + 3 * 4"])
        .assert()
        .success()
        .stdout("14\n");

    abacus_cmd(&dir)
        .args(["history", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"expression\": \"2 + 3 * 4\""))
        .stdout(predicate::str::contains("\"result\": \"14\""));
}

#[test]
fn eval_reports_bad_expression() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["eval", "1 / 0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot evaluate"));
}

#[test]
fn memory_store_then_show() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["memory", "store", "42"])
        .assert()
        .success()
        .stdout("42\n");

    abacus_cmd(&dir)
        .args(["memory", "add", "-2"])
        .assert()
        .success()
        .stdout("40\n");

    abacus_cmd(&dir)
        .args(["memory", "show"])
        .assert()
        .success()
        .stdout("40\n");
}

#[test]
fn memory_overflow_keeps_history_and_register() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["press", "1", "+", "1", "="])
        .assert()
        .success();
    abacus_cmd(&dir)
        .args(["memory", "store", "1e308"])
        .assert()
        .success();

    for _ in 0..2 {
        abacus_cmd(&dir)
            .args(["memory", "add", "1e308"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("memory overflow"));
    }

    abacus_cmd(&dir)
        .args(["memory", "show"])
        .assert()
        .success()
        .stdout("1.0000000000e+308\n");
    abacus_cmd(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 + 1 = 2"));
}

#[test]
fn convert_length_and_temperature() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["convert", "1", "km", "m"])
        .assert()
        .success()
        .stdout("1 km = 1,000 m\n");

    abacus_cmd(&dir)
        .args(["convert", "100", "C", "F"])
        .assert()
        .success()
        .stdout(predicate::str::contains("= 212"));
}

#[test]
fn convert_rejects_mixed_categories() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["convert", "1", "km", "kg"])
        .assert()
        .failure();
}

#[test]
fn currency_uses_mock_rates() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["currency", "100", "USD", "EUR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100 USD = 85 EUR"));

    abacus_cmd(&dir)
        .args(["currency", "1", "USD", "XYZ"])
        .assert()
        .failure();
}

#[test]
fn date_diff_and_add() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["date", "diff", "2024-01-01", "2024-01-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total days:     30"))
        .stdout(predicate::str::contains("business days:  23"));

    abacus_cmd(&dir)
        .args(["date", "add", "2024-02-28", "2"])
        .assert()
        .success()
        .stdout("2024-03-01\n");

    abacus_cmd(&dir)
        .args(["date", "diff", "2024/01/01", "2024-01-31"])
        .assert()
        .failure();
}

#[test]
fn date_shift_out_of_range_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["date", "add", "2024-01-01", "9223372036854775807"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("panicked").not());

    abacus_cmd(&dir)
        .args(["date", "sub", "2024-01-01", "-9223372036854775808"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn solve_linear_equation() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["solve", "2x + 3 = 11"])
        .assert()
        .success()
        .stdout("x = 4\n");

    abacus_cmd(&dir)
        .args(["solve", "0x + 1 = 2"])
        .assert()
        .failure();
}

#[test]
fn plot_draws_axes() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["plot", "x^2", "--y-min", "-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*"))
        .stdout(predicate::str::contains("|"))
        .stdout(predicate::str::contains("y = x^2"));
}

#[test]
fn export_csv_writes_history() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["press", "6", "/", "3", "="])
        .assert()
        .success();

    let out = dir.path().join("history.csv");
    abacus_cmd(&dir)
        .args(["export", "csv"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("exported 1 entries"));

    let csv = std::fs::read_to_string(&out).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Expression,Result,Date,Time"));
    assert!(lines.next().unwrap().starts_with("\"6 ÷ 3\",\"2\","));
}

#[test]
fn theme_toggle_persists() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["theme", "--toggle"])
        .assert()
        .success()
        .stdout("theme: dark (dark)\n");

    abacus_cmd(&dir)
        .arg("theme")
        .assert()
        .success()
        .stdout("theme: dark (dark)\n");

    abacus_cmd(&dir)
        .args(["theme", "ocean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("theme: ocean"));
}

#[test]
fn custom_theme_can_be_defined_and_applied() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args([
            "theme",
            "--define",
            "sunset",
            "--colors",
            "#FF5733,#C70039,#900C3F,#581845,#2E0F1F,#FFFFFF",
            "--dark",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("defined theme 'sunset'"));

    abacus_cmd(&dir)
        .args(["theme", "sunset"])
        .assert()
        .success()
        .stdout("theme: sunset (dark)\n");

    abacus_cmd(&dir)
        .args(["theme", "--define", "bad", "--colors", "red,1,2,3,4,5"])
        .assert()
        .failure();
}

#[test]
fn mode_switch_persists() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["mode", "graph"])
        .assert()
        .success()
        .stdout("mode: graph\n");

    abacus_cmd(&dir)
        .args(["mode", "--scientific"])
        .assert()
        .success()
        .stdout("mode: graph (scientific panel)\n");
}

#[test]
fn state_export_then_import_into_other_profile() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["memory", "store", "12"])
        .assert()
        .success();

    let path = dir.path().join("state.json");
    abacus_cmd(&dir)
        .args(["state", "export"])
        .arg(&path)
        .assert()
        .success();

    abacus_cmd(&dir)
        .args(["state", "import", "--profile", "copy"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("memory 12"));

    abacus_cmd(&dir)
        .args(["memory", "show", "--profile", "copy"])
        .assert()
        .success()
        .stdout("12\n");
}

#[test]
fn stats_fresh_profile() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .args(["stats", "--profile", "test-stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("profile:    test-stats"))
        .stdout(predicate::str::contains("history:    0"))
        .stdout(predicate::str::contains("theme:      light"));
}

#[test]
fn repl_reads_lines_until_quit() {
    let dir = TempDir::new().unwrap();
    abacus_cmd(&dir)
        .arg("repl")
        .write_stdin("3 + 4\n=\nquit\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("7\n"))
        .stdout(predicate::str::contains("9").not());
}
