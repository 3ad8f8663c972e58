/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/pmtest/test";

/// Defines the smallest allowed dt_min (Config)
pub const CONFIG_MIN_DT_MIN: f64 = 1e-10;

/// Defines the smallest allowed tolerance (Config)
pub const CONFIG_MIN_TOL: f64 = 1e-15;

/// Holds the name of the evolution giving the temperature
pub const TEMPERATURE: &str = "Temperature";

/// Holds the name of the evolution giving the (isotropic) thermal expansion coefficient
pub const THERMAL_EXPANSION: &str = "ThermalExpansion";

/// Holds the name of the (constant) evolution giving the reference temperature of the thermal expansion
pub const THERMAL_EXPANSION_REFERENCE_TEMPERATURE: &str = "ThermalExpansionReferenceTemperature";
