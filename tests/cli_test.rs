use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_cli_end_to_end_default_rules() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("tender-pricing"));
    cmd.arg(common::FIXTURE);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,name,type,quantity,price_before_adjust,price_after_adjust,price_proposal,matched_rule_id,status",
        ))
        // Case TH2.1 starts from the min price
        .stdout(predicate::str::contains(
            "1,VT A,general_goods,5,900000,873269.1,874000,th2_1_1,resolved",
        ))
        .stdout(predicate::str::contains(
            "2,VT B,general_goods,4,850000,816506.6085,817000,th2_1_1,resolved",
        ))
        // Min below max and previous winning: reduction not warranted
        .stdout(predicate::str::contains(
            "3,TT A,consumable_tool,6,760000,760000,760000,th2_1,resolved",
        ))
        .stdout(predicate::str::contains(
            "5,HC Main,primary_reagent,2,1400000,1330875,1331000,th2_1_1,resolved",
        ));

    Ok(())
}

#[test]
fn test_cli_plan_base_matches_documented_reduction() {
    let mut cmd = Command::new(cargo_bin!("tender-pricing"));
    cmd.arg(common::FIXTURE).arg("--base").arg("plan");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "1,VT A,general_goods,5,920000,874910.845908,875000,th2_1_1,resolved",
        ))
        .stdout(predicate::str::contains(
            "3,TT A,consumable_tool,6,780000,780000,780000,th2_1_1,resolved",
        ))
        .stdout(predicate::str::contains(
            "4,HC C,control_reagent,3,1220000,1171688,1172000,th2_1_1,resolved",
        ));
}

#[test]
fn test_cli_show_log_goes_to_stderr() {
    let mut cmd = Command::new(cargo_bin!("tender-pricing"));
    cmd.arg(common::FIXTURE)
        .arg("--base")
        .arg("plan")
        .arg("--show-log");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "VT A (general_goods): start 920000, floor 870000, step 1%",
        ))
        .stderr(predicate::str::contains("  -> 874910.85"))
        .stdout(predicate::str::contains("Reduction log").not());
}

#[test]
fn test_cli_rejects_unknown_base() {
    let mut cmd = Command::new(cargo_bin!("tender-pricing"));
    cmd.arg(common::FIXTURE).arg("--base").arg("kh");

    cmd.assert().failure();
}
