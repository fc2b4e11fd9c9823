use crate::error::HerdImmunityError;
use crate::log::LogConfiguration;

impl LogConfiguration {
    /// No backend is compiled in, so only the facade's level follows the filters.
    #[allow(clippy::unnecessary_wraps)]
    pub(super) fn install(&mut self) -> Result<(), HerdImmunityError> {
        log::set_max_level(self.max_level());
        Ok(())
    }
}
