use approx::assert_relative_eq;

use hcnm::cross_section::{ConstantCrossSection, TabulatedCrossSection};
use hcnm::horizon_crossing::{CrossingConfig, HorizonCrossing};
use hcnm::planet::{AtmosphericMixture, CentralBody};

mod common;
use common::iss_crossing;

const SWEEP_CONFIG: &str = r#"
{
    "central_body": "Earth",
    "orbit_altitude_km": 420.0,
    "mixture": { "n": 0.75, "o": 0.24, "ar": 0.01 },
    "scale_height_km": 7.5,
    "orbital_speed_km_s": 7.6
}
"#;

#[test]
fn test_config_from_json() {
    let config: CrossingConfig = serde_json::from_str(SWEEP_CONFIG).unwrap();
    let crossing = HorizonCrossing::from_config(&config, TabulatedCrossSection::new()).unwrap();
    let geom = crossing.geometry();

    assert_eq!(geom.planet().body(), CentralBody::Earth);
    assert_eq!(geom.planet().scale_height(), 7.5);
    assert_eq!(
        geom.planet().mixture(),
        &AtmosphericMixture {
            n: 0.75,
            o: 0.24,
            ar: 0.01
        }
    );
    assert_relative_eq!(geom.orbital_speed(), 7.6, max_relative = 1e-12);
    assert!(geom.tan_alt(0.0).abs() < 1e-9);
}

#[test]
fn test_config_equals_mutated_crossing() {
    let config: CrossingConfig = serde_json::from_str(SWEEP_CONFIG).unwrap();
    let configured = HorizonCrossing::from_config(&config, TabulatedCrossSection::new()).unwrap();

    let mut mutated = iss_crossing();
    let geom = mutated.geometry_mut();
    geom.set_orbital_speed(7.6).unwrap();
    geom.planet_mut().set_scale_height(7.5);
    geom.planet_mut().set_mix_n(0.75);
    geom.planet_mut().set_mix_o(0.24);

    for t in [30.0, 45.0, 60.0] {
        assert_eq!(
            configured.optical_depth_fixed(4.0, t).unwrap(),
            mutated.optical_depth_fixed(4.0, t).unwrap()
        );
    }
}

#[test]
fn test_config_round_trips_through_json() {
    let config = CrossingConfig {
        theta: Some(1.25),
        angular_velocity: Some(1.1e-3),
        ..CrossingConfig::new(550.0)
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: CrossingConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);

    let crossing = HorizonCrossing::from_config(&back, ConstantCrossSection(50.0)).unwrap();
    assert_eq!(crossing.geometry().theta(), 1.25);
    assert_eq!(crossing.geometry().angular_velocity(), 1.1e-3);
}

#[test]
fn test_unknown_body_rejected() {
    let config: CrossingConfig =
        serde_json::from_str(r#"{ "central_body": "Moon", "orbit_altitude_km": 100.0 }"#).unwrap();
    let err = HorizonCrossing::from_config(&config, TabulatedCrossSection::new()).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(err.to_string(), "Unsupported central body: Moon (only \"Earth\" is defined)");
}

#[test]
fn test_mixture_scales_optical_depth() {
    let crossing = iss_crossing();
    let tau_air = crossing.optical_depth_fixed(4.0, 45.0).unwrap();

    let mut argon_free = iss_crossing();
    argon_free.geometry_mut().planet_mut().set_mix_ar(0.0);
    let tau_no_ar = argon_free.optical_depth_fixed(4.0, 45.0).unwrap();

    let (sigma_n, sigma_o, sigma_ar) = TabulatedCrossSection::new()
        .element_coefficients(4.0)
        .unwrap();
    let sigma_air = 0.78 * sigma_n + 0.21 * sigma_o + 0.01 * sigma_ar;
    assert_relative_eq!(
        tau_no_ar / tau_air,
        (sigma_air - 0.01 * sigma_ar) / sigma_air,
        max_relative = 1e-12
    );
}
