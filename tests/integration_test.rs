#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn fprules_cmd() -> assert_cmd::Command {
	assert_cmd::Command::cargo_bin("fprules").unwrap()
}

/// foo/xfile.yml, foo/bar/file2, foo/bar/file3.yaml, foo/barbar/
fn fixture_tree() -> tempfile::TempDir {
	let temp_dir = tempfile::tempdir().unwrap();
	let foo = temp_dir.path().join("foo");
	fs::create_dir_all(foo.join("bar")).unwrap();
	fs::create_dir_all(foo.join("barbar")).unwrap();
	fs::write(foo.join("xfile.yml"), "").unwrap();
	fs::write(foo.join("bar").join("file2"), "").unwrap();
	fs::write(foo.join("bar").join("file3.yaml"), "").unwrap();
	temp_dir
}

fn write_config(dir: &Path, content: &str) {
	fs::write(dir.join(".fprules.toml"), content).unwrap();
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	fprules_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("derive destination paths"));
}

#[test]
fn test_version_flag() {
	fprules_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("fprules"));
}

#[test]
fn test_no_args_shows_help() {
	fprules_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// --init tests
// ============================================================================

#[test]
fn test_init_creates_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".fprules.toml");

	fprules_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created .fprules.toml"));

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("root = true"));
	assert!(content.contains("[[rules]]"));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), "# existing");

	fprules_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), "# existing");

	fprules_cmd()
		.args(["--init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let content = fs::read_to_string(temp_dir.path().join(".fprules.toml")).unwrap();
	assert!(content.contains("root = true"));
}

#[test]
fn test_init_template_is_valid() {
	let temp_dir = tempfile::tempdir().unwrap();

	fprules_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success();

	fprules_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"));
}

// ============================================================================
// match subcommand tests
// ============================================================================

#[test]
fn test_match_single_destination() {
	let tree = fixture_tree();

	fprules_cmd()
		.args(["match", "foo/**/*.y*ml", "./%%/target/%", "--sort"])
		.current_dir(tree.path())
		.assert()
		.success()
		.stdout(
			"[bar/file3] foo/bar/file3.yaml -> bar/target/file3\n[xfile] foo/xfile.yml -> target/xfile\n",
		);
}

#[test]
fn test_match_named_destinations() {
	let tree = fixture_tree();

	fprules_cmd()
		.args([
			"match",
			"foo/**/*.y*ml",
			"--to",
			"flat=./target/%.toto",
			"--to",
			"nested=./%%/target2/%",
			"--sort",
		])
		.current_dir(tree.path())
		.assert()
		.success()
		.stdout(predicate::str::contains(
			"[xfile] foo/xfile.yml -> {flat=target/xfile.toto, nested=target2/xfile}",
		))
		.stdout(predicate::str::contains(
			"[bar/file3] foo/bar/file3.yaml -> {flat=target/file3.toto, nested=bar/target2/file3}",
		));
}

#[test]
fn test_match_custom_names() {
	let tree = fixture_tree();

	fprules_cmd()
		.args(["match", "foo/*.yml", "out/%.json", "--names", "convert-%"])
		.current_dir(tree.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("[convert-xfile] foo/xfile.yml -> out/xfile.json"));
}

#[test]
fn test_match_rejects_star_in_destination() {
	fprules_cmd()
		.args(["match", "nonexistent/**/*.in", "*.out"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("can not contain star"));
}

#[test]
fn test_match_rejects_capture_without_double_wildcard() {
	fprules_cmd()
		.args(["match", "nonexistent/*.in", "out/%%/%"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("double-wildcard"));
}

#[test]
fn test_match_rejects_misplaced_double_wildcard() {
	fprules_cmd()
		.args(["match", "foo/a**/*.in", "out/%"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("alone in its path element"));
}

#[test]
fn test_match_rejects_duplicate_label() {
	fprules_cmd()
		.args(["match", "nonexistent/*.in", "--to", "a=x/%", "--to", "a=y/%"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("'a' is used more than once"));
}

#[test]
fn test_match_trailing_double_wildcard_includes_folder() {
	let tree = fixture_tree();

	fprules_cmd()
		.args(["match", "foo/**", "out/%%", "--sort"])
		.current_dir(tree.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("[foo] foo -> out\n"))
		.stdout(predicate::str::contains("[bar/bar] foo/bar -> out/bar\n"));
}

#[test]
fn test_match_requires_destination() {
	fprules_cmd()
		.args(["match", "foo/*.in"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("required"));
}

#[test]
fn test_match_bad_labelled_destination() {
	fprules_cmd()
		.args(["match", "foo/*.in", "--to", "no-equals-sign"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("LABEL=TEMPLATE"));
}

// ============================================================================
// rules and config subcommand tests
// ============================================================================

#[test]
fn test_rules_no_config() {
	let temp_dir = tempfile::tempdir().unwrap();

	fprules_cmd()
		.arg("rules")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("No rules found"));
}

#[test]
fn test_rules_evaluates_config() {
	let tree = fixture_tree();
	write_config(
		tree.path(),
		r#"
root = true

[[rules]]
label = "yaml"
source = "foo/**/*.y*ml"
destination = "out/%%/%.json"
"#,
	);

	fprules_cmd()
		.args(["rules", "--sort"])
		.current_dir(tree.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("# yaml"))
		.stdout(predicate::str::contains("[bar/file3]"))
		.stdout(predicate::str::contains("out/bar/file3.json"))
		.stdout(predicate::str::contains("[xfile]"));
}

#[test]
fn test_config_validate_no_config() {
	let temp_dir = tempfile::tempdir().unwrap();

	fprules_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("No configuration files found"));
}

#[test]
fn test_config_validate_invalid_toml() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), "invalid toml [[[");

	fprules_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure();
}

#[test]
fn test_config_validate_invalid_template() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(
		temp_dir.path(),
		r#"
root = true

[[rules]]
source = "src/*.c"
destination = "build/%%/%.o"
"#,
	);

	fprules_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_show_displays_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(
		temp_dir.path(),
		r#"
root = true

[[rules]]
source = "defs/*.ddl"
destinations = { csv = "downloaded/%.csv" }
"#,
	);

	fprules_cmd()
		.args(["config", "show"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("source: defs/*.ddl"))
		.stdout(predicate::str::contains("destinations.csv: downloaded/%.csv"));
}
