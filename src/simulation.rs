//! The simulation engine.
//!
//! A [`Simulation`] owns a fixed-size population and advances it in discrete time
//! steps. In each step every living, infected person has exactly
//! [`INTERACTIONS_PER_STEP`] effective interactions with randomly chosen living
//! partners, after which every living, infected person draws whether they survive the
//! step. Transmissions found during the interaction phase are deferred: the newly
//! infected are only infected once the step is over, so they neither interact nor
//! face a survival draw until the following step.
//!
//! All randomness comes from the [`RandomSource`] handed to the simulation, consumed in
//! a fixed order (partner and transmission draws for each infected person in population
//! order, then survival draws in population order), so a seeded source reproduces a run
//! exactly.
use std::fmt::{self, Display};
use std::rc::Rc;

use log::{debug, info, trace};
use rand::rngs::SmallRng;
use serde::Serialize;

use crate::error::HerdImmunityError;
use crate::parameters::{vaccinated_count, Parameters};
use crate::person::{Person, PersonId};
use crate::random::{seeded_rng, RandomSource};
use crate::report::{EventLogger, InteractionEvent, MetadataEvent, SurvivalEvent, TimeStepEvent};
use crate::virus::Virus;

/// The number of effective interactions each infected person has per time step.
pub const INTERACTIONS_PER_STEP: usize = 100;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndReason {
    /// Every person in the population is dead.
    AllDead,
    /// No one carries the virus.
    NoInfections,
    /// Every living person is vaccinated.
    AllLivingVaccinated,
    /// Everyone who caught the virus has died and no living person carries it, so
    /// nothing can change any more.
    OutbreakOver,
    /// The configured step limit was reached.
    StepLimit,
}

impl Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            EndReason::AllDead => "the entire population died",
            EndReason::NoInfections => "no one is infected",
            EndReason::AllLivingVaccinated => "every living person is vaccinated",
            EndReason::OutbreakOver => "no living person is infected",
            EndReason::StepLimit => "the step limit was reached",
        };
        f.write_str(description)
    }
}

/// The state of a run once it has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub steps: usize,
    pub total_infected: usize,
    pub current_infected: usize,
    pub total_dead: usize,
    pub end_reason: EndReason,
}

pub struct Simulation<R: RandomSource, L: EventLogger> {
    population: Vec<Person>,
    next_person_id: usize,
    virus: Rc<Virus>,
    population_size: usize,
    vaccination_percentage: f64,
    initial_infected: usize,
    total_infected: usize,
    current_infected: usize,
    total_dead: usize,
    // Scratch lists for the current step; emptied once the step's infections are applied.
    newly_infected: Vec<PersonId>,
    newly_dead: Vec<PersonId>,
    step: usize,
    max_steps: Option<usize>,
    deduplicate_new_infections: bool,
    rng: R,
    logger: L,
}

impl<L: EventLogger> Simulation<SmallRng, L> {
    /// Builds a simulation whose random source is seeded from `parameters.seed`.
    ///
    /// # Errors
    ///
    /// See [`Simulation::new`].
    pub fn from_parameters(parameters: &Parameters, logger: L) -> Result<Self, HerdImmunityError> {
        Simulation::new(parameters, seeded_rng(parameters.seed), logger)
    }
}

impl<R: RandomSource, L: EventLogger> Simulation<R, L> {
    /// Creates the population and writes the run's metadata to `logger`.
    ///
    /// # Errors
    ///
    /// Returns a `ParameterError` if the vaccinated and initially infected people do not
    /// fit in the population, or the logger's error if the metadata cannot be written.
    pub fn new(parameters: &Parameters, rng: R, logger: L) -> Result<Self, HerdImmunityError> {
        let vaccinated = parameters.vaccinated_count();
        let occupied = vaccinated.checked_add(parameters.initial_infected);
        if occupied.is_none_or(|occupied| occupied > parameters.population_size) {
            return Err(HerdImmunityError::ParameterError(format!(
                "{vaccinated} vaccinated and {} initially infected people do not fit in a population of {}",
                parameters.initial_infected, parameters.population_size
            )));
        }

        let mut simulation = Simulation {
            population: Vec::with_capacity(parameters.population_size),
            next_person_id: 0,
            virus: Rc::new(parameters.virus.clone()),
            population_size: parameters.population_size,
            vaccination_percentage: parameters.vaccination_percentage,
            initial_infected: parameters.initial_infected,
            total_infected: parameters.initial_infected,
            current_infected: parameters.initial_infected,
            total_dead: 0,
            newly_infected: Vec::new(),
            newly_dead: Vec::new(),
            step: 0,
            max_steps: parameters.max_steps,
            deduplicate_new_infections: parameters.deduplicate_new_infections,
            rng,
            logger,
        };
        simulation.create_population(parameters.initial_infected);

        let metadata = MetadataEvent {
            population_size: simulation.population_size,
            vaccination_percentage: simulation.vaccination_percentage,
            virus_name: simulation.virus.name.clone(),
            mortality_rate: simulation.virus.mortality_rate,
            reproduction_rate: simulation.virus.reproduction_rate,
        };
        simulation.logger.write_metadata(&metadata)?;
        Ok(simulation)
    }

    /// Lays the population out as three contiguous blocks: the vaccinated, then the
    /// initially infected, then everyone else.
    fn create_population(&mut self, initial_infected: usize) {
        let vaccinated = vaccinated_count(self.population_size, self.vaccination_percentage);
        let susceptible = self.population_size - vaccinated - initial_infected;
        trace!(
            "creating population: {vaccinated} vaccinated, {initial_infected} infected, {susceptible} susceptible"
        );

        for _ in 0..vaccinated {
            self.add_person(true, None);
        }
        for _ in 0..initial_infected {
            let infection = Some(Rc::clone(&self.virus));
            self.add_person(false, infection);
        }
        for _ in 0..susceptible {
            self.add_person(false, None);
        }
    }

    fn add_person(&mut self, is_vaccinated: bool, infection: Option<Rc<Virus>>) {
        let id = PersonId(self.next_person_id);
        self.population.push(Person::new(id, is_vaccinated, infection));
        self.next_person_id += 1;
    }

    /// Returns `None` while the run should go on, or the reason it has to stop.
    ///
    /// Scans the whole population on every call and recomputes the number of dead from
    /// scratch; this count replaces the running total. The dead keep their infection and
    /// still count as infected here.
    pub fn termination_reason(&mut self) -> Option<EndReason> {
        let mut vaccinated_alive = 0;
        let mut infected = 0;
        let mut infected_alive = 0;
        self.total_dead = 0;
        for person in &self.population {
            if person.is_alive && person.is_vaccinated {
                vaccinated_alive += 1;
            }
            if !person.is_alive {
                self.total_dead += 1;
            }
            if person.is_infected() {
                infected += 1;
                if person.is_alive {
                    infected_alive += 1;
                }
            }
        }

        if self.total_dead == self.population_size {
            Some(EndReason::AllDead)
        } else if infected == 0 {
            Some(EndReason::NoInfections)
        } else if vaccinated_alive == self.population_size - self.total_dead {
            Some(EndReason::AllLivingVaccinated)
        } else if infected_alive == 0 {
            Some(EndReason::OutbreakOver)
        } else if self.max_steps.is_some_and(|max_steps| self.step >= max_steps) {
            Some(EndReason::StepLimit)
        } else {
            None
        }
    }

    /// Whether another time step should be executed.
    pub fn should_continue(&mut self) -> bool {
        self.termination_reason().is_none()
    }

    /// Executes the interaction and survival phases of one time step. Transmissions are
    /// only queued; [`Simulation::infect_newly_infected`] applies them.
    ///
    /// # Errors
    ///
    /// Propagates errors from the event logger.
    pub fn time_step(&mut self) -> Result<(), HerdImmunityError> {
        for index in 0..self.population.len() {
            let person = &self.population[index];
            if !(person.is_alive && person.is_infected()) {
                continue;
            }
            let initiator = person.id;

            let mut interactions = 0;
            while interactions < INTERACTIONS_PER_STEP {
                let partner = PersonId(self.rng.sample_index(self.population.len()));
                // Sampling the dead does not count as an interaction.
                if self.population[partner.0].is_alive {
                    interactions += 1;
                    self.interaction(initiator, partner)?;
                }
            }
        }

        for index in 0..self.population.len() {
            let person = &self.population[index];
            if !(person.is_alive && person.is_infected()) {
                continue;
            }
            let id = person.id;
            let survived = person.did_survive_infection(&mut self.rng);
            self.logger.log_infection_survival(&SurvivalEvent {
                person: id,
                died: !survived,
            })?;

            if !survived {
                trace!("person {id} died");
                self.population[index].is_alive = false;
                self.current_infected -= 1;
                self.total_dead += 1;
                self.newly_dead.push(id);
            }
        }

        if self.deduplicate_new_infections {
            let mut queued = vec![false; self.population.len()];
            self.newly_infected
                .retain(|id| !std::mem::replace(&mut queued[id.0], true));
        }
        Ok(())
    }

    /// Resolves a single contact between `person` and `partner`.
    ///
    /// One transmission draw is made. If it succeeds and the partner is neither
    /// vaccinated nor already infected, the partner is queued for infection at the end
    /// of the step. The interaction is logged whatever the outcome.
    ///
    /// # Panics
    ///
    /// Panics if either participant is dead.
    ///
    /// # Errors
    ///
    /// Propagates errors from the event logger.
    pub fn interaction(
        &mut self,
        person: PersonId,
        partner: PersonId,
    ) -> Result<(), HerdImmunityError> {
        assert!(
            self.population[person.0].is_alive,
            "interaction initiated by dead person {person}"
        );
        let other = &self.population[partner.0];
        assert!(other.is_alive, "interaction with dead person {partner}");
        let partner_was_infected = other.is_infected();
        let partner_is_vaccinated = other.is_vaccinated;

        let did_infect = self.rng.sample_unit() < self.virus.reproduction_rate;
        self.logger.log_interaction(&InteractionEvent {
            initiator: person,
            partner,
            partner_was_infected,
            partner_is_vaccinated,
            did_infect,
        })?;

        if did_infect && !partner_is_vaccinated && !partner_was_infected {
            self.newly_infected.push(partner);
        }
        Ok(())
    }

    /// Infects everyone queued during the step and clears the step's scratch lists.
    ///
    /// Each queued entry counts towards the infection totals, so a person queued by two
    /// sources is counted twice unless deduplication is enabled.
    pub fn infect_newly_infected(&mut self) {
        for id in self.newly_infected.drain(..) {
            self.population[id.0].infection = Some(Rc::clone(&self.virus));
            self.current_infected += 1;
            self.total_infected += 1;
        }
        self.newly_dead.clear();
    }

    /// Runs time steps until the run ends.
    ///
    /// # Errors
    ///
    /// Propagates errors from the event logger.
    pub fn run(&mut self) -> Result<RunSummary, HerdImmunityError> {
        info!(
            "Running {} simulation: population {}, vaccination {}, initially infected {}",
            self.virus.name, self.population_size, self.vaccination_percentage, self.initial_infected
        );

        let end_reason = loop {
            if let Some(reason) = self.termination_reason() {
                break reason;
            }

            self.time_step()?;
            let summary = TimeStepEvent {
                step: self.step,
                newly_infected: self.newly_infected.len(),
                newly_dead: self.newly_dead.len(),
                total_infected: self.total_infected,
                total_dead: self.total_dead,
            };
            debug!(
                "step {}: {} newly infected, {} newly dead",
                summary.step, summary.newly_infected, summary.newly_dead
            );
            self.logger.log_time_step(&summary)?;
            self.infect_newly_infected();
            self.step += 1;
        };
        self.logger.finish()?;

        info!("Simulation ended after {} steps: {end_reason}", self.step);
        Ok(RunSummary {
            steps: self.step,
            total_infected: self.total_infected,
            current_infected: self.current_infected,
            total_dead: self.total_dead,
            end_reason,
        })
    }

    #[must_use]
    pub fn population(&self) -> &[Person] {
        &self.population
    }

    #[must_use]
    pub fn person(&self, id: PersonId) -> &Person {
        &self.population[id.0]
    }

    #[must_use]
    pub fn virus(&self) -> &Virus {
        &self.virus
    }

    #[must_use]
    pub fn next_person_id(&self) -> usize {
        self.next_person_id
    }

    /// The number of completed time steps.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    #[must_use]
    pub fn total_infected(&self) -> usize {
        self.total_infected
    }

    #[must_use]
    pub fn current_infected(&self) -> usize {
        self.current_infected
    }

    #[must_use]
    pub fn total_dead(&self) -> usize {
        self.total_dead
    }

    #[must_use]
    pub fn newly_infected(&self) -> &[PersonId] {
        &self.newly_infected
    }

    #[must_use]
    pub fn newly_dead(&self) -> &[PersonId] {
        &self.newly_dead
    }

    #[must_use]
    pub fn rng(&self) -> &R {
        &self.rng
    }

    #[must_use]
    pub fn logger(&self) -> &L {
        &self.logger
    }

    #[must_use]
    pub fn into_logger(self) -> L {
        self.logger
    }
}
