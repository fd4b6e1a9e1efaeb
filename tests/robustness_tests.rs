use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_malformed_rows_are_skipped() {
    let csv = common::items_csv(&[
        "1,Good,general_goods,1,100000,90000,95000,80000,120000,70000",
        // Unknown type
        "2,Bad type,solvent,1,100000,90000,95000,80000,120000,70000",
        // Text in a price column
        "3,Bad price,general_goods,1,not_a_number,90000,95000,80000,120000,70000",
        // Negative price
        "4,Negative,general_goods,1,100000,-1,95000,80000,120000,70000",
    ]);

    let rules = common::rules_json(
        r#"{"rules": [{"id": "keep", "action_id": "off"}],
            "actions": [{"id": "off", "action_kind": "disable_reduction"}]}"#,
    );

    let mut cmd = Command::new(cargo_bin!("tender-pricing"));
    cmd.arg(csv.path()).arg("--rules").arg(rules.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("error reading item"))
        .stdout(predicate::str::contains("1,Good,general_goods,1,90000,90000,90000,keep,resolved"))
        .stdout(predicate::str::contains("Bad type").not())
        .stdout(predicate::str::contains("Negative").not());
}

#[test]
fn test_unknown_condition_is_a_warning_not_a_failure() {
    let csv = common::items_csv(&["1,Item,general_goods,1,100000,90000,95000,80000,120000,70000"]);
    let rules = common::rules_json(
        r#"{
            "rules": [
                {"id": "broken", "condition": "item.Price_KH > 0", "action_id": "off"},
                {"id": "fallback", "action_id": "keep_plan"}
            ],
            "actions": [
                {"id": "off", "action_kind": "disable_reduction"},
                {"id": "keep_plan", "action_kind": "keep_input_price", "input_price_source": "plan"}
            ]
        }"#,
    );

    let mut cmd = Command::new(cargo_bin!("tender-pricing"));
    cmd.arg(csv.path()).arg("--rules").arg(rules.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "rule 'broken' uses unknown condition 'item.Price_KH > 0'",
        ))
        .stdout(predicate::str::contains(
            "1,Item,general_goods,1,90000,100000,100000,fallback,resolved",
        ));
}

#[test]
fn test_strict_mode_blocks_unresolved_items() {
    let csv = common::items_csv(&["1,Orphan,general_goods,1,100000,90000,95000,80000,120000,70000"]);
    let rules = common::rules_json(
        r#"{
            "rules": [{"id": "never", "condition": "plan_lt_min", "action_id": "off"}],
            "actions": [{"id": "off", "action_kind": "disable_reduction"}]
        }"#,
    );

    let mut relaxed = Command::new(cargo_bin!("tender-pricing"));
    relaxed.arg(csv.path()).arg("--rules").arg(rules.path());
    relaxed
        .assert()
        .success()
        .stdout(predicate::str::contains("1,Orphan,general_goods,1,90000,,,,unresolved"));

    let mut strict = Command::new(cargo_bin!("tender-pricing"));
    strict
        .arg(csv.path())
        .arg("--rules")
        .arg(rules.path())
        .arg("--strict");
    strict
        .assert()
        .failure()
        .stderr(predicate::str::contains("tender is not ready for submission"));
}

#[test]
fn test_malformed_rules_file_fails() {
    let rules = common::rules_json("{ \"rules\": [ { \"id\": ");

    let mut cmd = Command::new(cargo_bin!("tender-pricing"));
    cmd.arg(common::FIXTURE).arg("--rules").arg(rules.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
