use serde::{Deserialize, Serialize};

/// The pathogen spreading through the population.
///
/// A `Virus` is never mutated after construction. Infected people hold a shared
/// reference to the single instance owned by the simulation. Rates are expected to
/// lie in `[0, 1]` but are not checked here: an out-of-range value simply changes
/// the effective odds of transmission or death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Virus {
    pub name: String,
    /// Probability that a single interaction transmits the virus.
    pub reproduction_rate: f64,
    /// Probability that an infected person dies at the end of a time step.
    pub mortality_rate: f64,
}

impl Virus {
    #[must_use]
    pub fn new(name: impl Into<String>, reproduction_rate: f64, mortality_rate: f64) -> Self {
        Virus {
            name: name.into(),
            reproduction_rate,
            mortality_rate,
        }
    }
}
