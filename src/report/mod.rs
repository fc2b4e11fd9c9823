//! Reporting of simulation events.
//!
//! The simulation emits four kinds of events over the course of a run, always in the
//! same order: one [`MetadataEvent`] at construction, an [`InteractionEvent`] for every
//! effective interaction, a [`SurvivalEvent`] for every infected person at the end of a
//! step, and one [`TimeStepEvent`] per step. Anything implementing [`EventLogger`] can
//! consume them. Loggers observe the run; they never influence it.
//!
//! This is not to be confused with diagnostic logging in [`crate::log`], which records
//! messages about the program itself.
mod recorder;
mod step_csv;
mod text;

pub use recorder::{Event, EventRecorder, NullLogger};
pub use step_csv::StepCsvReport;
pub use text::TextReport;

use std::fs::{create_dir_all, File};
use std::path::PathBuf;

use serde::Serialize;

use crate::error::HerdImmunityError;
use crate::person::PersonId;

/// Describes the run. Written once, when the simulation is constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataEvent {
    pub population_size: usize,
    pub vaccination_percentage: f64,
    pub virus_name: String,
    pub mortality_rate: f64,
    pub reproduction_rate: f64,
}

/// One effective interaction between an infected person and a living partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InteractionEvent {
    pub initiator: PersonId,
    pub partner: PersonId,
    pub partner_was_infected: bool,
    pub partner_is_vaccinated: bool,
    /// Whether the transmission draw succeeded. This says nothing about whether the
    /// partner could actually be infected.
    pub did_infect: bool,
}

/// The outcome of an infected person's survival draw at the end of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurvivalEvent {
    pub person: PersonId,
    pub died: bool,
}

/// Summary of a completed time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeStepEvent {
    pub step: usize,
    pub newly_infected: usize,
    pub newly_dead: usize,
    pub total_infected: usize,
    pub total_dead: usize,
}

/// Consumer of the structured events produced by a run.
pub trait EventLogger {
    /// # Errors
    ///
    /// Returns an error if the event could not be written.
    fn write_metadata(&mut self, event: &MetadataEvent) -> Result<(), HerdImmunityError>;

    /// # Errors
    ///
    /// Returns an error if the event could not be written.
    fn log_interaction(&mut self, event: &InteractionEvent) -> Result<(), HerdImmunityError>;

    /// # Errors
    ///
    /// Returns an error if the event could not be written.
    fn log_infection_survival(&mut self, event: &SurvivalEvent)
        -> Result<(), HerdImmunityError>;

    /// # Errors
    ///
    /// Returns an error if the event could not be written.
    fn log_time_step(&mut self, event: &TimeStepEvent) -> Result<(), HerdImmunityError>;

    /// Called once when the run ends. Buffered loggers flush here.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered output could not be written.
    fn finish(&mut self) -> Result<(), HerdImmunityError> {
        Ok(())
    }
}

impl<L: EventLogger + ?Sized> EventLogger for &mut L {
    fn write_metadata(&mut self, event: &MetadataEvent) -> Result<(), HerdImmunityError> {
        (**self).write_metadata(event)
    }

    fn log_interaction(&mut self, event: &InteractionEvent) -> Result<(), HerdImmunityError> {
        (**self).log_interaction(event)
    }

    fn log_infection_survival(
        &mut self,
        event: &SurvivalEvent,
    ) -> Result<(), HerdImmunityError> {
        (**self).log_infection_survival(event)
    }

    fn log_time_step(&mut self, event: &TimeStepEvent) -> Result<(), HerdImmunityError> {
        (**self).log_time_step(event)
    }

    fn finish(&mut self) -> Result<(), HerdImmunityError> {
        (**self).finish()
    }
}

/// An absent logger ignores every event.
impl<L: EventLogger> EventLogger for Option<L> {
    fn write_metadata(&mut self, event: &MetadataEvent) -> Result<(), HerdImmunityError> {
        self.as_mut().map_or(Ok(()), |logger| logger.write_metadata(event))
    }

    fn log_interaction(&mut self, event: &InteractionEvent) -> Result<(), HerdImmunityError> {
        self.as_mut().map_or(Ok(()), |logger| logger.log_interaction(event))
    }

    fn log_infection_survival(
        &mut self,
        event: &SurvivalEvent,
    ) -> Result<(), HerdImmunityError> {
        self.as_mut()
            .map_or(Ok(()), |logger| logger.log_infection_survival(event))
    }

    fn log_time_step(&mut self, event: &TimeStepEvent) -> Result<(), HerdImmunityError> {
        self.as_mut().map_or(Ok(()), |logger| logger.log_time_step(event))
    }

    fn finish(&mut self) -> Result<(), HerdImmunityError> {
        self.as_mut().map_or(Ok(()), EventLogger::finish)
    }
}

/// Fans every event out to two loggers, first to `.0` and then to `.1`.
impl<A: EventLogger, B: EventLogger> EventLogger for (A, B) {
    fn write_metadata(&mut self, event: &MetadataEvent) -> Result<(), HerdImmunityError> {
        self.0.write_metadata(event)?;
        self.1.write_metadata(event)
    }

    fn log_interaction(&mut self, event: &InteractionEvent) -> Result<(), HerdImmunityError> {
        self.0.log_interaction(event)?;
        self.1.log_interaction(event)
    }

    fn log_infection_survival(
        &mut self,
        event: &SurvivalEvent,
    ) -> Result<(), HerdImmunityError> {
        self.0.log_infection_survival(event)?;
        self.1.log_infection_survival(event)
    }

    fn log_time_step(&mut self, event: &TimeStepEvent) -> Result<(), HerdImmunityError> {
        self.0.log_time_step(event)?;
        self.1.log_time_step(event)
    }

    fn finish(&mut self) -> Result<(), HerdImmunityError> {
        self.0.finish()?;
        self.1.finish()
    }
}

/// Where report files go and how they are named.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub file_prefix: String,
    pub directory: PathBuf,
    pub overwrite: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            file_prefix: String::new(),
            directory: PathBuf::from("."),
            overwrite: false,
        }
    }
}

impl ReportOptions {
    #[must_use]
    pub fn new() -> Self {
        ReportOptions::default()
    }

    /// Sets the file prefix option (e.g., "run1_" yields "run1_<report name>").
    pub fn file_prefix(&mut self, file_prefix: String) -> &mut ReportOptions {
        self.file_prefix = file_prefix;
        self
    }

    /// Sets the directory where reports will be written.
    pub fn directory(&mut self, directory: PathBuf) -> &mut ReportOptions {
        self.directory = directory;
        self
    }

    /// Sets whether to silently overwrite existing reports.
    pub fn overwrite(&mut self, overwrite: bool) -> &mut ReportOptions {
        self.overwrite = overwrite;
        self
    }

    /// Returns the path for the report called `short_name` under these options.
    #[must_use]
    pub fn path_for(&self, short_name: &str) -> PathBuf {
        self.directory
            .join(format!("{}{}", self.file_prefix, short_name))
    }

    /// Creates the file for the report called `short_name`, creating all parent
    /// directories that do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if the file exists and overwriting is disabled, or an
    /// `IoError` if the directories or file cannot be created.
    pub fn create_file(&self, short_name: &str) -> Result<(File, PathBuf), HerdImmunityError> {
        let path = self.path_for(short_name);
        if !self.overwrite && path.exists() {
            return Err(HerdImmunityError::ReportError(format!(
                "report file already exists: {}. Use --force-overwrite to replace it",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        Ok((file, path))
    }
}

/// The name of the text report for a run, e.g. `Ebola_simulation_pop_100_vp_0.9_infected_1.txt`.
#[must_use]
pub fn text_report_name(
    virus_name: &str,
    population_size: usize,
    vaccination_percentage: f64,
    initial_infected: usize,
) -> String {
    format!(
        "{virus_name}_simulation_pop_{population_size}_vp_{vaccination_percentage:?}_infected_{initial_infected}.txt"
    )
}
