// Frequency stability analysis. The Allan variance estimators here operate
// on plain sample slices so they can run against any loaded column.

mod allan;

pub use allan::{compute, AllanVariance, Estimator};
