//! Policy multiplier aggregation tests.

use growth_core::{
    config::{PolicyMultipliers, SimConfig},
    engine::{ProjectionEngine, ScenarioInputs},
    policy::{combined_multiplier, Policy, PolicyToggles},
    SimError,
};

#[test]
fn all_toggles_off_is_exactly_one() {
    let m = combined_multiplier(&PolicyToggles::none(), &PolicyMultipliers::default());
    assert_eq!(m, 1.0);
}

#[test]
fn all_toggles_on_is_the_product_of_every_factor() {
    let m = combined_multiplier(&PolicyToggles::all(), &PolicyMultipliers::default());
    assert!((m - 1.10 * 1.15 * 1.20 * 1.25).abs() < 1e-12);
    assert!((m - 1.8975).abs() < 1e-9);
}

#[test]
fn single_toggle_contributes_its_own_factor() {
    let multipliers = PolicyMultipliers::default();
    for policy in Policy::ALL {
        let mut toggles = PolicyToggles::none();
        toggles.set(policy, true);
        assert_eq!(
            combined_multiplier(&toggles, &multipliers),
            multipliers.get(policy),
            "{policy}"
        );
    }
}

#[test]
fn effects_multiply_rather_than_add() {
    let toggles =
        PolicyToggles::from_names(["expedited_permits", "incubator_network"]).unwrap();
    let m = combined_multiplier(&toggles, &PolicyMultipliers::default());
    assert!((m - 1.375).abs() < 1e-12);
}

#[test]
fn toggling_twice_restores_the_original_state() {
    let mut toggles = PolicyToggles::none();
    toggles.toggle(Policy::PublicPrivateHubs);
    assert!(toggles.is_enabled(Policy::PublicPrivateHubs));
    assert_eq!(toggles.enabled(), vec![Policy::PublicPrivateHubs]);

    toggles.toggle(Policy::PublicPrivateHubs);
    assert_eq!(toggles, PolicyToggles::none());
}

#[test]
fn policy_names_and_labels() {
    assert_eq!(Policy::ExpeditedPermits.label(), "Expedited Permits");
    assert_eq!(Policy::PublicPrivateHubs.label(), "Public Private Hubs");
    assert_eq!(
        "international_partnerships".parse::<Policy>().unwrap(),
        Policy::InternationalPartnerships
    );
    assert!(matches!(
        PolicyToggles::from_names(["tax_holiday"]),
        Err(SimError::UnknownPolicy { name }) if name == "tax_holiday"
    ));
}

#[test]
fn toggles_json_rejects_unknown_switches() {
    let parsed: PolicyToggles = serde_json::from_str(
        r#"{"expedited_permits":true,"international_partnerships":false,
            "public_private_hubs":false,"incubator_network":true}"#,
    )
    .unwrap();
    assert_eq!(parsed.enabled(), vec![Policy::ExpeditedPermits, Policy::IncubatorNetwork]);

    let extra = serde_json::from_str::<PolicyToggles>(
        r#"{"expedited_permits":true,"international_partnerships":false,
            "public_private_hubs":false,"incubator_network":true,"tax_holiday":true}"#,
    );
    assert!(extra.is_err());
}

/// The multiplier scales the yearly job delta directly.
#[test]
fn policies_scale_projected_job_growth() {
    let engine = ProjectionEngine::new(SimConfig::default_test());
    let inputs = ScenarioInputs {
        policies: PolicyToggles::all(),
        ..ScenarioInputs::default()
    };

    let projection = engine.project_region("bangalore", &inputs).unwrap();

    assert!((projection.policy_multiplier - 1.8975).abs() < 1e-9);
    assert!((projection.final_growth.jobs - 800.0 * 1.8975).abs() < 1e-6);
    assert_eq!(projection.series.jobs[0], 26_518.0);
}
