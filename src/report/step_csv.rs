use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::trace;

use crate::error::HerdImmunityError;
use crate::report::{
    EventLogger, InteractionEvent, MetadataEvent, ReportOptions, SurvivalEvent, TimeStepEvent,
};

/// Writes one CSV row per time step summary and ignores every other event.
pub struct StepCsvReport<W: Write> {
    writer: Writer<W>,
    path: Option<PathBuf>,
}

impl<W: Write> StepCsvReport<W> {
    pub fn new(writer: W) -> Self {
        StepCsvReport {
            writer: Writer::from_writer(writer),
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// # Errors
    ///
    /// Returns an error if buffered rows could not be flushed.
    pub fn into_inner(self) -> Result<W, HerdImmunityError> {
        self.writer
            .into_inner()
            .map_err(|error| HerdImmunityError::IoError(error.into_error()))
    }
}

impl StepCsvReport<File> {
    /// # Errors
    ///
    /// Fails if `name` is not a CSV file name or the file cannot be created.
    pub fn create(options: &ReportOptions, name: &str) -> Result<Self, HerdImmunityError> {
        if Path::new(name).extension().and_then(|ext| ext.to_str()) != Some("csv") {
            return Err(HerdImmunityError::ReportError(
                "Step report output files must be CSVs".to_string(),
            ));
        }
        let (file, path) = options.create_file(name)?;
        trace!("writing step report to {}", path.display());
        Ok(StepCsvReport {
            writer: Writer::from_writer(file),
            path: Some(path),
        })
    }
}

impl<W: Write> EventLogger for StepCsvReport<W> {
    fn write_metadata(&mut self, _event: &MetadataEvent) -> Result<(), HerdImmunityError> {
        Ok(())
    }

    fn log_interaction(&mut self, _event: &InteractionEvent) -> Result<(), HerdImmunityError> {
        Ok(())
    }

    fn log_infection_survival(
        &mut self,
        _event: &SurvivalEvent,
    ) -> Result<(), HerdImmunityError> {
        Ok(())
    }

    fn log_time_step(&mut self, event: &TimeStepEvent) -> Result<(), HerdImmunityError> {
        self.writer.serialize(event)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), HerdImmunityError> {
        self.writer.flush()?;
        Ok(())
    }
}
