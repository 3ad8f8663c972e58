use pmtest::prelude::*;

// Comparison with reference results
//
// TEST GOAL
//
// Verifies that a reference comparison fed with the results of a previous run
// succeeds, and that a perturbed reference value leads to a failure message
// identifying the offending row. The failure does not abort the run.
//
// LOADING PATH
//
// EXX ramps from 0 to 0.01 over [0, 1] in four periods
//
// CONFIGURATION AND PARAMETERS
//
// * Tridimensional hypothesis
// * Young: E = 200000, Poisson: ν = 0.3

const NAME: &str = "test_reference_comparison";

fn run(reference: Option<ReferenceTable>) -> Result<TestOutput, StrError> {
    let config = Config::new(Hypothesis::Tridimensional);
    let registry = Registry::with_defaults();
    let mut driver = TestDriver::new(&config, &registry, "LinearElastic")?;
    driver
        .set_times(&[0.0, 0.25, 0.5, 0.75, 1.0])
        .set_evolution("YoungModulus", Evolution::constant(200000.0))
        .set_evolution("PoissonRatio", Evolution::constant(0.3))
        .impose_driving_variable("EXX", Evolution::table(&[0.0, 1.0], &[0.0, 0.01])?)?;
    if let Some(table) = reference {
        driver.add_validator(Box::new(ReferenceComparison::new(
            "SXX",
            Quantity::ThermodynamicForce(0),
            table,
            1e-6,
        )));
    }
    driver.run().map_err(|_| "run failed")
}

#[test]
fn test_reference_comparison() -> Result<(), StrError> {
    // generate the reference
    let output = run(None)?;
    let table = output.reference_table(Quantity::ThermodynamicForce(0))?;
    assert_eq!(table.rows.len(), 5);
    let path = format!("{}/{}_ref.json", DEFAULT_TEST_DIR, NAME);
    table.write_json(&path)?;

    // identical values
    let reference = ReferenceTable::read_json(&path)?;
    let output = run(Some(reference.clone()))?;
    assert!(output.result.success);

    // perturbed value
    let mut perturbed = reference;
    perturbed.rows[3].1 += 1.0;
    let output = run(Some(perturbed))?;
    assert!(!output.result.success);
    assert_eq!(output.steps.len(), 5);
    let failures = output.result.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].starts_with("SXX: row 3 (t = 0.75) differs"));
    Ok(())
}
