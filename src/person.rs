use std::fmt::{self, Display};
use std::rc::Rc;

use serde::Serialize;

use crate::random::RandomSource;
use crate::virus::Virus;

/// A stable index into the population. Ids are assigned sequentially from zero when
/// the population is created and never reused.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PersonId(pub(crate) usize);

impl PersonId {
    #[must_use]
    pub fn new(index: usize) -> Self {
        PersonId(index)
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single member of the population.
///
/// Vaccination is fixed when the person is created and confers permanent immunity.
/// Once `is_alive` is false the person keeps their slot in the population and their
/// infection is never cleared.
#[derive(Debug, Clone)]
pub struct Person {
    pub(crate) id: PersonId,
    pub(crate) is_vaccinated: bool,
    pub(crate) is_alive: bool,
    pub(crate) infection: Option<Rc<Virus>>,
}

impl Person {
    #[must_use]
    pub fn new(id: PersonId, is_vaccinated: bool, infection: Option<Rc<Virus>>) -> Self {
        Person {
            id,
            is_vaccinated,
            is_alive: true,
            infection,
        }
    }

    #[must_use]
    pub fn id(&self) -> PersonId {
        self.id
    }

    #[must_use]
    pub fn is_vaccinated(&self) -> bool {
        self.is_vaccinated
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    #[must_use]
    pub fn infection(&self) -> Option<&Virus> {
        self.infection.as_deref()
    }

    #[must_use]
    pub fn is_infected(&self) -> bool {
        self.infection.is_some()
    }

    /// Draws whether this person survives their infection for the current step.
    ///
    /// Consumes exactly one uniform draw when infected: the person survives when the
    /// draw is at least the virus' mortality rate. Nothing about the person changes;
    /// the caller records the death. A person without an infection always survives
    /// and consumes no draw.
    pub fn did_survive_infection<R: RandomSource + ?Sized>(&self, rng: &mut R) -> bool {
        match &self.infection {
            Some(virus) => rng.sample_unit() >= virus.mortality_rate,
            None => true,
        }
    }
}
