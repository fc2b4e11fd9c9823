use std::fs;
use std::path::Path;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::HerdImmunityError;
use crate::virus::Virus;

fn default_initial_infected() -> usize {
    1
}

fn default_seed() -> u64 {
    42
}

/// `floor(population_size * vaccination_percentage)`. Float-to-int casts saturate, so
/// negative or NaN percentages yield zero.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn vaccinated_count(population_size: usize, vaccination_percentage: f64) -> usize {
    (population_size as f64 * vaccination_percentage).floor() as usize
}

/// Everything needed to set up a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub population_size: usize,
    /// Fraction of the population vaccinated at the start, nominally in `[0, 1]`.
    pub vaccination_percentage: f64,
    pub virus: Virus,
    #[serde(default = "default_initial_infected")]
    pub initial_infected: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Stop after this many steps even if the outbreak is still going.
    #[serde(default)]
    pub max_steps: Option<usize>,
    /// Count a person queued for infection by several sources once instead of once per
    /// source.
    #[serde(default)]
    pub deduplicate_new_infections: bool,
}

impl Parameters {
    #[must_use]
    pub fn new(
        population_size: usize,
        vaccination_percentage: f64,
        virus: Virus,
        initial_infected: usize,
    ) -> Self {
        Parameters {
            population_size,
            vaccination_percentage,
            virus,
            initial_infected,
            seed: default_seed(),
            max_steps: None,
            deduplicate_new_infections: false,
        }
    }

    /// Reads parameters from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an `IoError` if the file cannot be read or a `JsonError` if it does not
    /// describe a valid set of parameters.
    pub fn from_json_file(path: &Path) -> Result<Self, HerdImmunityError> {
        trace!("loading parameters from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let parameters = serde_json::from_str(&contents)?;
        Ok(parameters)
    }

    /// The number of people vaccinated when the population is created.
    #[must_use]
    pub fn vaccinated_count(&self) -> usize {
        vaccinated_count(self.population_size, self.vaccination_percentage)
    }

    /// Lists inputs outside their nominal ranges. These do not stop a run; they only
    /// make it degenerate.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut check_probability = |name: &str, value: f64| {
            if !(0.0..=1.0).contains(&value) {
                warnings.push(format!("{name} {value} is outside [0, 1]"));
            }
        };
        check_probability("vaccination percentage", self.vaccination_percentage);
        check_probability("reproduction rate", self.virus.reproduction_rate);
        check_probability("mortality rate", self.virus.mortality_rate);
        if self.initial_infected == 0 {
            warnings.push("no one is initially infected".to_string());
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use super::Parameters;
    use crate::error::HerdImmunityError;
    use crate::virus::Virus;

    #[test]
    fn loads_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "population_size": 1000,
                "vaccination_percentage": 0.5,
                "virus": {{"name": "Ebola", "reproduction_rate": 0.25, "mortality_rate": 0.7}}
            }}"#
        )
        .unwrap();

        let parameters = Parameters::from_json_file(file.path()).unwrap();
        assert_eq!(
            parameters,
            Parameters::new(1000, 0.5, Virus::new("Ebola", 0.25, 0.7), 1)
        );
        assert_eq!(parameters.seed, 42);
        assert_eq!(parameters.max_steps, None);
        assert!(!parameters.deduplicate_new_infections);
    }

    #[test]
    fn loads_fixture() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("data")
            .join("parameters.json");
        let parameters = Parameters::from_json_file(&path).unwrap();
        assert_eq!(parameters.population_size, 500);
        assert_eq!(parameters.initial_infected, 5);
        assert_eq!(parameters.seed, 7);
        assert_eq!(parameters.max_steps, Some(50));
        assert!(parameters.deduplicate_new_infections);
        assert_eq!(parameters.virus.name, "Measles");
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Parameters::from_json_file(&PathBuf::from("no/such/parameters.json"));
        assert!(matches!(result, Err(HerdImmunityError::IoError(_))));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"population_size": "many"}}"#).unwrap();
        let result = Parameters::from_json_file(file.path());
        assert!(matches!(result, Err(HerdImmunityError::JsonError(_))));
    }

    #[test]
    fn vaccinated_count_floors() {
        let virus = Virus::new("Flu", 0.1, 0.1);
        assert_eq!(Parameters::new(10, 0.35, virus.clone(), 1).vaccinated_count(), 3);
        assert_eq!(Parameters::new(10, 1.0, virus.clone(), 0).vaccinated_count(), 10);
        assert_eq!(Parameters::new(10, -0.5, virus, 1).vaccinated_count(), 0);
    }

    #[test]
    fn warns_on_out_of_range_inputs() {
        let parameters = Parameters::new(10, 1.5, Virus::new("Flu", -0.1, 0.5), 0);
        let warnings = parameters.warnings();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].starts_with("vaccination percentage 1.5"));
        assert!(warnings[1].starts_with("reproduction rate -0.1"));
        assert_eq!(warnings[2], "no one is initially infected");

        let fine = Parameters::new(10, 0.5, Virus::new("Flu", 0.1, 0.5), 1);
        assert!(fine.warnings().is_empty());
    }
}
