use crate::random::RandomSource;

/// A [`RandomSource`] that replays fixed sequences of draws, cycling back to the start
/// of each sequence once it is exhausted. Index draws are reduced modulo the requested
/// upper bound so that a script stays valid for any population size.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    units: Vec<f64>,
    indices: Vec<usize>,
    unit_draws: usize,
    index_draws: usize,
}

impl ScriptedSource {
    /// # Panics
    ///
    /// Panics if either sequence is empty.
    #[must_use]
    pub fn new(units: Vec<f64>, indices: Vec<usize>) -> Self {
        assert!(!units.is_empty(), "ScriptedSource needs at least one unit draw");
        assert!(
            !indices.is_empty(),
            "ScriptedSource needs at least one index draw"
        );
        ScriptedSource {
            units,
            indices,
            unit_draws: 0,
            index_draws: 0,
        }
    }

    /// Every unit draw returns `unit`; index draws walk `0, 1, 2, ...` around the population.
    #[must_use]
    pub fn constant(unit: f64) -> Self {
        ScriptedSource {
            units: vec![unit],
            indices: Vec::new(),
            unit_draws: 0,
            index_draws: 0,
        }
    }

    /// The number of unit draws consumed so far.
    #[must_use]
    pub fn unit_draws(&self) -> usize {
        self.unit_draws
    }

    /// The number of index draws consumed so far.
    #[must_use]
    pub fn index_draws(&self) -> usize {
        self.index_draws
    }
}

impl RandomSource for ScriptedSource {
    fn sample_unit(&mut self) -> f64 {
        let draw = self.units[self.unit_draws % self.units.len()];
        self.unit_draws += 1;
        draw
    }

    fn sample_index(&mut self, upper: usize) -> usize {
        let draw = if self.indices.is_empty() {
            self.index_draws
        } else {
            self.indices[self.index_draws % self.indices.len()]
        };
        self.index_draws += 1;
        draw % upper
    }
}
