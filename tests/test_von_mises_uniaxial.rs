use pmtest::prelude::*;
use russell_lab::approx_eq;

// Uniaxial loading of the von Mises model with linear hardening
//
// TEST GOAL
//
// Verifies the Newton iterations with mixed constraints (imposed strain and
// imposed stresses) and the acceleration algorithms with a plastic behaviour.
//
// LOADING PATH
//
// EXX ramps from 0 to 0.01 over [0, 1] in ten periods; SYY and SZZ are zero.
// The remaining stresses are free (thus also zero).
//
// CONFIGURATION AND PARAMETERS
//
// * Tridimensional hypothesis
// * Young: E = 1500, Poisson: ν = 0.25
// * Hardening: H = 800, Initial yield stress: σy = 9.0
//
// The uniaxial response is bilinear with the elastoplastic modulus:
//
// Eₚ = E H / (E + H)

const YOUNG: f64 = 1500.0;
const POISSON: f64 = 0.25;
const SIG_Y: f64 = 9.0;
const HH: f64 = 800.0;

fn analytical_sxx(exx: f64) -> f64 {
    let eps_y = SIG_Y / YOUNG;
    if exx <= eps_y {
        YOUNG * exx
    } else {
        SIG_Y + YOUNG * HH / (YOUNG + HH) * (exx - eps_y)
    }
}

fn run(config: &Config, acceleration: Option<(&str, &str)>) -> Result<TestOutput, StrError> {
    let registry = Registry::with_defaults();
    let times: Vec<_> = (0..11).map(|i| (i as f64) / 10.0).collect();
    let mut driver = TestDriver::new(config, &registry, "VonMises")?;
    driver
        .set_times(&times)
        .set_evolution("YoungModulus", Evolution::constant(YOUNG))
        .set_evolution("PoissonRatio", Evolution::constant(POISSON))
        .set_evolution("YieldStress", Evolution::constant(SIG_Y))
        .set_evolution("HardeningSlope", Evolution::constant(HH))
        .impose_driving_variable("EXX", Evolution::table(&[0.0, 1.0], &[0.0, 0.01])?)?
        .impose_thermodynamic_force("SYY", Evolution::constant(0.0))?
        .impose_thermodynamic_force("SZZ", Evolution::constant(0.0))?;
    if let Some((name, trigger)) = acceleration {
        driver
            .set_acceleration(name)?
            .set_acceleration_parameter("AccelerationTrigger", trigger)?;
    }
    driver.add_validator(Box::new(AnalyticalComparison::new(
        "SXX",
        Quantity::ThermodynamicForce(0),
        Evolution::formula(&[], |t, _| analytical_sxx(0.01 * t)),
        1e-6,
    )));
    driver.run().map_err(|_| "run failed")
}

#[test]
fn test_von_mises_uniaxial() -> Result<(), StrError> {
    let config = Config::new(Hypothesis::Tridimensional);
    let output = run(&config, None)?;
    assert_eq!(output.n_sub_steps, 0);
    assert!(output.result.success);

    // plastic strain: εp = (σ - σy) / H
    let last = output.steps.last().ok_or("no steps")?;
    let sxx = analytical_sxx(0.01);
    approx_eq(last.iv[0], (sxx - SIG_Y) / HH, 1e-10);
    approx_eq(last.s[1], 0.0, 1e-3);
    approx_eq(last.s[2], 0.0, 1e-3);

    // quadratic convergence: a few iterations per step
    for step in &output.steps[1..] {
        assert!(step.iterations <= 10);
    }
    Ok(())
}

#[test]
fn test_von_mises_uniaxial_with_acceleration() -> Result<(), StrError> {
    // the elastic stiffness converges slowly on the plastic steps
    let mut config = Config::new(Hypothesis::Tridimensional);
    config.set_stiffness(StiffnessType::Elastic).set_prediction(Prediction::Elastic);
    let plain = run(&config, None)?;
    assert!(plain.result.success);
    let a = plain.steps.last().ok_or("no steps")?;
    for name in ["IronsTuck", "Steffensen", "Aitken"] {
        let output = run(&config, Some((name, "2")))?;
        assert!(output.result.success);
        let b = output.steps.last().ok_or("no steps")?;
        approx_eq(a.s[0], b.s[0], 1e-6);
        approx_eq(a.iv[0], b.iv[0], 1e-10);

        // the plastic iterates follow a fixed direction; thus, the extrapolation saves iterations
        if name != "Aitken" {
            assert!(output.n_iterations < plain.n_iterations);
        }
    }
    Ok(())
}

#[test]
fn test_von_mises_uniaxial_acceleration_before_trigger_is_noop() -> Result<(), StrError> {
    // the trigger is never reached; thus, the iterations must match the plain run exactly
    let mut config = Config::new(Hypothesis::Tridimensional);
    config.set_stiffness(StiffnessType::Elastic).set_prediction(Prediction::Elastic);
    let plain = run(&config, None)?;
    let trigger = format!("{}", config.n_max_iterations + 1);
    for name in ["IronsTuck", "Steffensen", "Aitken"] {
        let output = run(&config, Some((name, &trigger)))?;
        assert_eq!(output.n_iterations, plain.n_iterations);
        assert_eq!(output.steps.len(), plain.steps.len());
        for (a, b) in plain.steps.iter().zip(output.steps.iter()) {
            assert_eq!(a.iterations, b.iterations);
            assert_eq!(a.e, b.e);
            assert_eq!(a.s, b.s);
            assert_eq!(a.lagrange, b.lagrange);
        }
    }
    Ok(())
}
