use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::trace;

use crate::error::HerdImmunityError;
use crate::report::{
    EventLogger, InteractionEvent, MetadataEvent, ReportOptions, SurvivalEvent, TimeStepEvent,
};

/// The human-readable report of a run: one line per event.
pub struct TextReport<W: Write> {
    writer: W,
    path: Option<PathBuf>,
}

impl<W: Write> TextReport<W> {
    pub fn new(writer: W) -> Self {
        TextReport { writer, path: None }
    }

    /// The file this report writes to, if it was created from [`ReportOptions`].
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl TextReport<BufWriter<File>> {
    /// Creates the report file `name` according to `options`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created or already exists and `options` does not
    /// allow overwriting.
    pub fn create(options: &ReportOptions, name: &str) -> Result<Self, HerdImmunityError> {
        let (file, path) = options.create_file(name)?;
        trace!("writing text report to {}", path.display());
        Ok(TextReport {
            writer: BufWriter::new(file),
            path: Some(path),
        })
    }
}

impl<W: Write> EventLogger for TextReport<W> {
    fn write_metadata(&mut self, event: &MetadataEvent) -> Result<(), HerdImmunityError> {
        writeln!(
            self.writer,
            "Population size: {}\tVaccination percentage: {:?}\tVirus: {}\tMortality rate: {:?}\tReproduction rate: {:?}",
            event.population_size,
            event.vaccination_percentage,
            event.virus_name,
            event.mortality_rate,
            event.reproduction_rate
        )?;
        Ok(())
    }

    fn log_interaction(&mut self, event: &InteractionEvent) -> Result<(), HerdImmunityError> {
        let InteractionEvent {
            initiator, partner, ..
        } = event;
        if !event.did_infect {
            writeln!(self.writer, "{initiator} didn't infect {partner}")?;
        } else if event.partner_is_vaccinated {
            writeln!(
                self.writer,
                "{initiator} didn't infect {partner} because vaccinated"
            )?;
        } else if event.partner_was_infected {
            writeln!(
                self.writer,
                "{initiator} didn't infect {partner} because already sick"
            )?;
        } else {
            writeln!(self.writer, "{initiator} infects {partner}")?;
        }
        Ok(())
    }

    fn log_infection_survival(
        &mut self,
        event: &SurvivalEvent,
    ) -> Result<(), HerdImmunityError> {
        if event.died {
            writeln!(self.writer, "{} died from infection", event.person)?;
        } else {
            writeln!(self.writer, "{} survived infection", event.person)?;
        }
        Ok(())
    }

    fn log_time_step(&mut self, event: &TimeStepEvent) -> Result<(), HerdImmunityError> {
        writeln!(
            self.writer,
            "Time step {} ended, beginning {}: {} newly infected, {} newly dead, {} total infected, {} total dead",
            event.step,
            event.step + 1,
            event.newly_infected,
            event.newly_dead,
            event.total_infected,
            event.total_dead
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), HerdImmunityError> {
        self.writer.flush()?;
        Ok(())
    }
}
