//! An agent-based model of herd immunity.
//!
//! A fixed population is split into three groups when a run starts: people who are
//! vaccinated, people who carry the virus, and everyone else. In each discrete time
//! step every living, infected person interacts with randomly chosen living people
//! and may pass the virus on to those who are neither vaccinated nor already sick.
//! At the end of the step each infected person either dies or survives according to
//! the virus's mortality rate. The run continues until the population is dead, no one
//! carries the virus, or every living person is vaccinated.
//!
//! The main pieces are:
//! * [`Simulation`]: owns the population and advances it one step at a time.
//! * [`report`]: consumers of the events a run produces, including the text report
//!   written by the command line tool.
//! * [`random`]: the [`RandomSource`](random::RandomSource) abstraction that makes runs
//!   reproducible from a seed.
//! * [`runner`]: the command line front end.
//!
//! ```rust
//! use herd_immunity::report::EventRecorder;
//! use herd_immunity::{Parameters, Simulation, Virus};
//!
//! let parameters = Parameters::new(200, 0.9, Virus::new("Measles", 0.9, 0.01), 2);
//! let mut simulation = Simulation::from_parameters(&parameters, EventRecorder::new()).unwrap();
//! let summary = simulation.run().unwrap();
//! assert_eq!(summary.steps, simulation.logger().time_steps().count());
//! ```
pub mod error;
pub mod log;
pub mod parameters;
pub mod person;
pub mod random;
pub mod report;
pub mod runner;
pub mod simulation;
pub mod virus;

pub use error::HerdImmunityError;
pub use parameters::Parameters;
pub use person::{Person, PersonId};
pub use report::EventLogger;
pub use simulation::{EndReason, RunSummary, Simulation, INTERACTIONS_PER_STEP};
pub use virus::Virus;
