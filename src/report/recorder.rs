use crate::error::HerdImmunityError;
use crate::report::{
    EventLogger, InteractionEvent, MetadataEvent, SurvivalEvent, TimeStepEvent,
};

/// Any one of the events a run produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Metadata(MetadataEvent),
    Interaction(InteractionEvent),
    Survival(SurvivalEvent),
    TimeStep(TimeStepEvent),
}

/// Keeps every event in memory, in the order it was received.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventRecorder {
    events: Vec<Event>,
}

impl EventRecorder {
    #[must_use]
    pub fn new() -> Self {
        EventRecorder::default()
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn interactions(&self) -> impl Iterator<Item = &InteractionEvent> {
        self.events.iter().filter_map(|event| match event {
            Event::Interaction(interaction) => Some(interaction),
            _ => None,
        })
    }

    pub fn survivals(&self) -> impl Iterator<Item = &SurvivalEvent> {
        self.events.iter().filter_map(|event| match event {
            Event::Survival(survival) => Some(survival),
            _ => None,
        })
    }

    pub fn time_steps(&self) -> impl Iterator<Item = &TimeStepEvent> {
        self.events.iter().filter_map(|event| match event {
            Event::TimeStep(step) => Some(step),
            _ => None,
        })
    }
}

impl EventLogger for EventRecorder {
    fn write_metadata(&mut self, event: &MetadataEvent) -> Result<(), HerdImmunityError> {
        self.events.push(Event::Metadata(event.clone()));
        Ok(())
    }

    fn log_interaction(&mut self, event: &InteractionEvent) -> Result<(), HerdImmunityError> {
        self.events.push(Event::Interaction(*event));
        Ok(())
    }

    fn log_infection_survival(
        &mut self,
        event: &SurvivalEvent,
    ) -> Result<(), HerdImmunityError> {
        self.events.push(Event::Survival(*event));
        Ok(())
    }

    fn log_time_step(&mut self, event: &TimeStepEvent) -> Result<(), HerdImmunityError> {
        self.events.push(Event::TimeStep(*event));
        Ok(())
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl EventLogger for NullLogger {
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

    fn log_time_step(&mut self, _event: &TimeStepEvent) -> Result<(), HerdImmunityError> {
        Ok(())
    }
}
