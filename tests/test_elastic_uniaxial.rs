use pmtest::prelude::*;
use russell_lab::approx_eq;

// Uniaxial stress of a linear elastic material
//
// TEST GOAL
//
// Verifies that a single imposed driving variable (EXX) with all the other
// thermodynamic forces free yields the uniaxial stress state σxx = E εxx.
//
// LOADING PATH
//
// EXX ramps from 0 to 0.01 over [0, 1] in four periods
//
// CONFIGURATION AND PARAMETERS
//
// * Tridimensional hypothesis
// * Young: E = 200000, Poisson: ν = 0.3
// * Default (tangent) prediction; thus, one Newton iteration per step

const YOUNG: f64 = 200000.0;
const POISSON: f64 = 0.3;

#[test]
fn test_elastic_uniaxial() -> Result<(), StrError> {
    // configuration
    let config = Config::new(Hypothesis::Tridimensional);
    let registry = Registry::with_defaults();

    // driver
    let mut driver = TestDriver::new(&config, &registry, "LinearElastic")?;
    driver
        .set_times(&[0.0, 0.25, 0.5, 0.75, 1.0])
        .set_evolution("YoungModulus", Evolution::constant(YOUNG))
        .set_evolution("PoissonRatio", Evolution::constant(POISSON))
        .impose_driving_variable("EXX", Evolution::table(&[0.0, 1.0], &[0.0, 0.01])?)?;

    // run
    let output = driver.run().map_err(|_| "run failed")?;
    assert_eq!(output.steps.len(), 5);
    assert_eq!(output.n_sub_steps, 0);
    assert_eq!(output.attempts.len(), 4);

    // check
    for step in &output.steps[1..] {
        assert_eq!(step.iterations, 1);
        let exx = 0.01 * step.t;
        approx_eq(step.e[0], exx, 1e-15);
        approx_eq(step.e[1], -POISSON * exx, 1e-15);
        approx_eq(step.e[2], -POISSON * exx, 1e-15);
        assert!(f64::abs(step.s[0] - YOUNG * exx) <= 1e-6 * YOUNG * exx);
        for i in 1..6 {
            assert!(f64::abs(step.s[i]) < 1e-3);
        }
    }
    Ok(())
}

#[test]
fn test_elastic_uniaxial_without_prediction() -> Result<(), StrError> {
    // configuration
    let mut config = Config::new(Hypothesis::Axisymmetrical);
    config.set_prediction(Prediction::None);
    let registry = Registry::with_defaults();

    // driver
    let mut driver = TestDriver::new(&config, &registry, "LinearElastic")?;
    driver
        .set_times(&[0.0, 1.0])
        .set_evolution("YoungModulus", Evolution::constant(YOUNG))
        .set_evolution("PoissonRatio", Evolution::constant(POISSON))
        .impose_driving_variable("EZZ", Evolution::table(&[0.0, 1.0], &[0.0, -0.002])?)?;

    // run
    let output = driver.run().map_err(|_| "run failed")?;
    let last = output.steps.last().ok_or("no steps")?;
    assert_eq!(last.iterations, 2);
    approx_eq(last.s[1], -0.002 * YOUNG, 1e-6);
    approx_eq(last.e[0], 0.002 * POISSON, 1e-15);
    approx_eq(last.e[2], 0.002 * POISSON, 1e-15);
    Ok(())
}
