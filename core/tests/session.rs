//! Scenario session: command handling and commit-on-success.

use growth_core::{
    allocation::{Allocation, Budget, Category},
    command::ScenarioCommand,
    config::SimConfig,
    engine::{ProjectionEngine, ScenarioInputs},
    policy::Policy,
    projection::Timeframe,
    session::ScenarioSession,
    SimError,
};

fn new_session() -> ScenarioSession {
    let _ = env_logger::builder().is_test(true).try_init();
    ScenarioSession::new(ProjectionEngine::new(SimConfig::default_test())).expect("session")
}

#[test]
fn starts_on_first_region_with_default_inputs() {
    let session = new_session();

    assert_eq!(session.region_id(), "bangalore");
    assert_eq!(*session.inputs(), ScenarioInputs::default());
    assert_eq!(session.projection().series.len(), 10);
    assert_eq!(session.projection().region_id, "bangalore");
}

#[test]
fn slider_edit_rebalances_and_protects_the_edited_category() {
    let mut session = new_session();

    session
        .apply(ScenarioCommand::SetAllocation {
            category: Category::Infrastructure,
            amount: 80.0,
        })
        .expect("apply");

    let a = session.inputs().allocation;
    assert_eq!(a.infrastructure, 80.0);
    assert!((a.workforce - (25.0 - 25.0 / 70.0 * 50.0)).abs() < 1e-9);
    assert!((a.incentives - (25.0 - 25.0 / 70.0 * 50.0)).abs() < 1e-9);
    assert!((a.research - (20.0 - 20.0 / 70.0 * 50.0)).abs() < 1e-9);
    assert!((a.total() - 100.0).abs() < 1e-9);
    assert_eq!(session.inputs().edited, Some(Category::Infrastructure));
    assert_eq!(session.projection().allocation, a);
}

#[test]
fn budget_change_scales_the_allocation_down() {
    let mut session = new_session();

    session
        .apply(ScenarioCommand::SetBudget { amount: 50.0 })
        .expect("apply");

    let a = session.inputs().allocation;
    assert!((a.infrastructure - 15.0).abs() < 1e-9);
    assert!((a.workforce - 12.5).abs() < 1e-9);
    assert!((a.incentives - 12.5).abs() < 1e-9);
    assert!((a.research - 10.0).abs() < 1e-9);
    assert_eq!(session.inputs().budget, Budget::new(50.0).unwrap());
    assert_eq!(session.inputs().edited, None);
}

#[test]
fn raising_the_budget_leaves_allocation_untouched() {
    let mut session = new_session();

    session
        .apply(ScenarioCommand::SetBudget { amount: 200.0 })
        .expect("apply");

    assert_eq!(session.inputs().allocation, Allocation::new(30.0, 25.0, 25.0, 20.0));
}

#[test]
fn policy_commands_update_toggles() {
    let mut session = new_session();

    session
        .apply(ScenarioCommand::TogglePolicy { policy: Policy::IncubatorNetwork })
        .expect("toggle");
    assert!(session.inputs().policies.is_enabled(Policy::IncubatorNetwork));
    assert!((session.projection().policy_multiplier - 1.25).abs() < 1e-12);

    session
        .apply(ScenarioCommand::SetPolicy {
            policy: Policy::IncubatorNetwork,
            enabled: false,
        })
        .expect("set");
    assert_eq!(session.projection().policy_multiplier, 1.0);
}

#[test]
fn timeframe_and_region_changes_recompute() {
    let mut session = new_session();

    session
        .apply(ScenarioCommand::SetTimeframe { years: 20.0 })
        .expect("timeframe");
    assert_eq!(session.inputs().timeframe, Timeframe::new(20).unwrap());
    assert_eq!(session.projection().series.len(), 20);

    session
        .apply(ScenarioCommand::SelectRegion { region_id: "hyderabad".into() })
        .expect("region");
    assert_eq!(session.region_id(), "hyderabad");
    assert_eq!(session.projection().region_id, "hyderabad");
    assert_eq!(session.projection().series.len(), 20);
}

#[test]
fn rejected_commands_leave_state_unchanged() {
    let mut session = new_session();
    let before = session.projection().clone();
    let inputs_before = session.inputs().clone();

    let fractional = session.apply(ScenarioCommand::SetTimeframe { years: 2.5 });
    assert!(matches!(fractional, Err(SimError::InvalidTimeframe { .. })));

    let unknown = session.apply(ScenarioCommand::SelectRegion { region_id: "atlantis".into() });
    assert!(matches!(unknown, Err(SimError::RegionNotFound { .. })));

    let negative = session.apply(ScenarioCommand::SetAllocation {
        category: Category::Research,
        amount: -5.0,
    });
    assert!(matches!(negative, Err(SimError::InvalidAllocation { .. })));

    let zero_budget = session.apply(ScenarioCommand::SetBudget { amount: 0.0 });
    assert!(matches!(zero_budget, Err(SimError::InvalidBudget { .. })));

    assert_eq!(session.region_id(), "bangalore");
    assert_eq!(*session.inputs(), inputs_before);
    assert_eq!(*session.projection(), before);
}

#[test]
fn commands_parse_from_tagged_json() {
    let cmd: ScenarioCommand =
        serde_json::from_str(r#"{"cmd":"set_allocation","category":"research","amount":40}"#)
            .expect("parse");
    assert_eq!(
        cmd,
        ScenarioCommand::SetAllocation {
            category: Category::Research,
            amount: 40.0,
        }
    );

    let cmd: ScenarioCommand =
        serde_json::from_str(r#"{"cmd":"toggle_policy","policy":"public_private_hubs"}"#)
            .expect("parse");
    assert_eq!(cmd, ScenarioCommand::TogglePolicy { policy: Policy::PublicPrivateHubs });

    assert!(serde_json::from_str::<ScenarioCommand>(
        r#"{"cmd":"set_allocation","category":"marketing","amount":40}"#
    )
    .is_err());
}

#[test]
fn state_serializes_inputs_and_projection_together() {
    let session = new_session();

    let value = serde_json::to_value(session.state()).expect("serialize");

    assert_eq!(value["region_id"], "bangalore");
    assert_eq!(value["inputs"]["timeframe"], 10);
    assert_eq!(value["inputs"]["budget"], 100.0);
    assert_eq!(value["projection"]["series"]["jobs"][0], 25_800.0);
    assert_eq!(value["projection"]["hotspots"].as_array().map(Vec::len), Some(5));
}
