//! CLI integration tests for convertkit.
//!
//! These tests verify command-line argument parsing, help output,
//! conversion and formatting output, and exit codes for error conditions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the convertkit binary.
fn cmd() -> Command {
    Command::cargo_bin("convertkit").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("words"))
        .stdout(predicate::str::contains("simple"))
        .stdout(predicate::str::contains("chinese"))
        .stdout(predicate::str::contains("from-chinese"))
        .stdout(predicate::str::contains("types"));
}

#[test]
fn test_convert_subcommand_help() {
    cmd()
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--default"))
        .stdout(predicate::str::contains("--quiet"))
        .stdout(predicate::str::contains("--raw"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("convertkit"));
}

#[test]
fn test_global_flags_exist() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--output-json"))
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"));
}

// =============================================================================
// Convert Tests
// =============================================================================

#[test]
fn test_convert_trimmed_integer() {
    cmd()
        .args(["convert", "--to", "int", " 42 "])
        .assert()
        .success()
        .stdout("42\n");
}

#[test]
fn test_convert_boolean_word() {
    cmd()
        .args(["convert", "--to", "bool", "yes"])
        .assert()
        .success()
        .stdout("true\n");
}

#[test]
fn test_convert_list_from_csv() {
    cmd()
        .args(["convert", "--to", "list<i64>", "1, 2, 3"])
        .assert()
        .success()
        .stdout("[1, 2, 3]\n");
}

#[test]
fn test_convert_decimal_keeps_scale() {
    cmd()
        .args(["convert", "--to", "decimal", "1.10"])
        .assert()
        .success()
        .stdout("1.10\n");
}

#[test]
fn test_convert_unparseable_prints_null() {
    cmd()
        .args(["convert", "--to", "i32", "abc"])
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn test_convert_uses_default() {
    cmd()
        .args(["convert", "--to", "i32", "--default", "-1", "abc"])
        .assert()
        .success()
        .stdout("-1\n");
}

#[test]
fn test_convert_raw_keeps_json_text() {
    cmd()
        .args(["convert", "--to", "string", "--raw", "[1,2]"])
        .assert()
        .success()
        .stdout("[1,2]\n");
}

#[test]
fn test_convert_output_json() {
    cmd()
        .args(["--output-json", "convert", "--to", "list<i32>", "[\"1\", \"2\"]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"list<i32>\""))
        .stdout(predicate::str::contains("\"value\""));
}

#[test]
fn test_unknown_type_exits_with_code_4() {
    cmd()
        .args(["convert", "--to", "money", "1"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown type name"));
}

#[test]
fn test_bad_default_exits_with_code_4() {
    cmd()
        .args(["convert", "--to", "i32", "--default", "\"x\"", "1"])
        .assert()
        .code(4);
}

// =============================================================================
// Formatting Tests
// =============================================================================

#[test]
fn test_words() {
    cmd()
        .args(["words", "100.23"])
        .assert()
        .success()
        .stdout("ONE HUNDRED AND CENTS TWENTY THREE ONLY\n");
}

#[test]
fn test_words_negative() {
    cmd()
        .args(["words", "-12"])
        .assert()
        .success()
        .stdout("MINUS TWELVE ONLY\n");
}

#[test]
fn test_words_invalid_exits_with_code_4() {
    cmd().args(["words", "12x"]).assert().code(4);
}

#[test]
fn test_simple() {
    cmd()
        .args(["simple", "1200"])
        .assert()
        .success()
        .stdout("1.2k\n");
}

#[test]
fn test_chinese_money_traditional() {
    cmd()
        .args(["chinese", "67556.32", "--traditional", "--money"])
        .assert()
        .success()
        .stdout("陆万柒仟伍佰伍拾陆元叁角贰分\n");
}

#[test]
fn test_chinese_plain() {
    cmd()
        .args(["chinese", "1024"])
        .assert()
        .success()
        .stdout("一千零二十四\n");
}

#[test]
fn test_from_chinese() {
    cmd()
        .args(["from-chinese", "两万二零一十"])
        .assert()
        .success()
        .stdout("22010\n");
}

#[test]
fn test_from_chinese_money() {
    cmd()
        .args(["from-chinese", "--money", "陆万柒仟伍佰伍拾陆元叁角贰分"])
        .assert()
        .success()
        .stdout("67556.32\n");
}

#[test]
fn test_from_chinese_bad_input_exits_with_code_4() {
    cmd()
        .args(["from-chinese", "一百你三"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown unit"));
}

#[test]
fn test_types_lists_builtins() {
    cmd()
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("i32"))
        .stdout(predicate::str::contains("datetime"))
        .stdout(predicate::str::contains("uuid"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_7() {
    // An explicit path that does not exist is an IO error
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "types"])
        .assert()
        .code(7);
}

#[test]
fn test_missing_default_config_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(["simple", "999"])
        .assert()
        .success()
        .stdout("999\n");
}

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "types"])
        .assert()
        .code(1);
}

#[test]
fn test_unknown_config_key_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "list_separatr: \";\"").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "types"])
        .assert()
        .code(1);
}

#[test]
fn test_config_list_separator() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "list_separator: \";\"").unwrap();

    cmd()
        .args([
            "--config",
            file.path().to_str().unwrap(),
            "convert",
            "--to",
            "list<i32>",
            "1;2",
        ])
        .assert()
        .success()
        .stdout("[1, 2]\n");
}

#[test]
fn test_bad_verbosity_exits_with_code_1() {
    cmd()
        .args(["--verbosity", "loud", "simple", "1"])
        .assert()
        .code(1);
}
