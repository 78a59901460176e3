//! Transmittance curves of a 420 km Earth crossing.
//!
//! ```text
//! RUST_LOG=hcnm=debug cargo run --example crossing_curve
//! ```

use hcnm::cross_section::TabulatedCrossSection;
use hcnm::hcnm_errors::HcnmError;
use hcnm::horizon_crossing::{CrossingConfig, HorizonCrossing};
use hcnm::optical_depth::adaptive::AdaptiveParams;
use hcnm::optical_depth::OpticalDepthMethod;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), HcnmError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = CrossingConfig {
        orbital_speed_km_s: Some(7.6),
        ..CrossingConfig::new(420.0)
    };
    let crossing = HorizonCrossing::from_config(&config, TabulatedCrossSection::new())?;
    let geom = crossing.geometry();

    let t_100 = geom.time_at_tangent_altitude(100.0)?;
    println!(
        "orbit radius {:.3} km, speed {:.3} km/s, period {:.1} s",
        geom.orbit_radius(),
        geom.orbital_speed(),
        geom.orbital_period()
    );
    println!(
        "tangent altitude reaches 100 km at t = {t_100:.2} s, LOS defined until {:.2} s",
        geom.crossing_duration()
    );

    let params = AdaptiveParams::builder().tolerance(1e-10).build()?;
    println!("{params:#}");
    let method = OpticalDepthMethod::Adaptive(params);

    let times: Vec<f64> = (0..=40).map(|k| 20.0 + 1.5 * k as f64).collect();
    let energies = [2.0, 3.0, 4.0, 6.0];
    let samples = crossing.transmittance_batch(&energies, &times, &method)?;

    println!("{:>8} {:>10} {:>12} {:>12}", "E (keV)", "t (s)", "h (km)", "T");
    for s in &samples {
        println!(
            "{:>8.1} {:>10.2} {:>12.3} {:>12.6}",
            s.energy_kev,
            s.time,
            geom.tan_alt(s.time),
            s.transmittance
        );
    }

    let trace = crossing.optical_depth_adaptive(4.0, 40.0, 1e-10)?;
    let fixed = crossing.optical_depth_fixed(4.0, 40.0)?;
    println!(
        "t = 40 s, 4 keV: adaptive tau = {:.10} ({} steps, {} evaluations), fixed grid tau = {fixed:.10}",
        trace.tau,
        trace.accepted_intervals(),
        trace.evaluations
    );

    Ok(())
}
