use assert_cmd::Command;
use predicates::str::contains;
use tempfile::{tempdir, TempDir};

const FULL_RUN: &str = "\
select userInfo
set firstName Ann
set lastName Lee
set age 30
submit
ok
set street \"1 Main St\"
set city Austin
set state 2
set zipCode 73301
submit
ok
set cardNumber 4111111111111111
set expiryDate 2030-01-31
set cvv 123
set cardholderName \"Ann Lee\"
submit
";

fn script_command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dynamic_form_cli").unwrap();
    cmd.env("DYNAMIC_FORM_CLI_SCRIPT", "1")
        .env("DYNAMIC_FORM_HOME", home.path())
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn script_mode_completes_a_submission_and_exports_it() {
    let home = tempdir().unwrap();
    let export = home.path().join("rows.json");
    let input = format!("{FULL_RUN}table\nexport {}\nexit\n", export.display());

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Step saved."))
        .stdout(contains(
            "Please fill the next form to complete your submission.",
        ))
        .stdout(contains("Submission complete. Row 1 added."))
        .stdout(contains("=== Submitted Data ==="))
        .stdout(contains("Austin"));

    let json = std::fs::read_to_string(&export).unwrap();
    assert!(json.contains("\"Texas\""));
    assert!(json.contains("\"cardholderName\""));
}

#[test]
fn script_mode_reports_validation_errors_and_keeps_going() {
    let home = tempdir().unwrap();
    let input = "\
select userInfo
set firstName Ann
submit
set lastName Lee
set age 30
submit
status
";

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains(
            "ERROR: Please fill in all required fields: lastName, age",
        ))
        .stdout(contains("Step saved."));
}

#[test]
fn script_mode_edits_and_deletes_rows() {
    let home = tempdir().unwrap();
    let input = format!(
        "{FULL_RUN}edit 1\nset firstName Bea\nsubmit\ndelete 1\ndelete 1\ntable\n"
    );

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Changes saved successfully (row 1)."))
        .stdout(contains("Bea"))
        .stdout(contains("Entry deleted successfully."))
        .stdout(contains("out of range"))
        .stdout(contains("(no entries yet)"));
}

#[test]
fn script_mode_rejects_later_steps_and_suggests_commands() {
    let home = tempdir().unwrap();
    script_command(&home)
        .write_stdin("select paymentInfo\nsubmt\n")
        .assert()
        .success()
        .stdout(contains("paymentInfo"))
        .stdout(contains("submit"));
}
