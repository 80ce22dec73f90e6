use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{DropoutStrategy, Momentum, Topology};
use crate::prelude::*;

/// Run settings read from a JSON file. Every key is optional.
///
/// ```json
/// {
///   "data_file": "mnist_train.csv",
///   "network_file": "mnist.bin",
///   "input_count": 784,
///   "hidden_layers": 1,
///   "hidden_units": [100],
///   "output_count": 10,
///   "epochs": 50
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_file: PathBuf,
    /// Written after training, read when only evaluating.
    pub network_file: Option<PathBuf>,
    /// Report destination, stdout when unset.
    pub output_file: Option<PathBuf>,
    /// Log destination, stderr when unset.
    pub log_file: Option<PathBuf>,
    pub accuracy_plot_file: Option<PathBuf>,

    pub training: bool,
    pub confusion_matrix: bool,
    pub test_while_training: bool,
    pub progress: bool,
    pub progress_interval: usize,
    pub default_target: bool,
    pub targets: Option<Vec<Vec<f64>>>,

    pub input_count: usize,
    pub hidden_layers: usize,
    pub hidden_units: Vec<usize>,
    pub output_count: usize,

    pub min: f64,
    pub max: f64,

    pub epochs: usize,
    pub learning_rate: f64,
    pub momentum: f64,
    pub dropout: DropoutStrategy,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::new(),
            network_file: None,
            output_file: None,
            log_file: None,
            accuracy_plot_file: None,
            training: true,
            confusion_matrix: true,
            test_while_training: true,
            progress: true,
            progress_interval: 1,
            default_target: true,
            targets: None,
            input_count: 0,
            hidden_layers: 0,
            hidden_units: Vec::new(),
            output_count: 0,
            min: 0.0,
            max: 255.0,
            epochs: 50,
            learning_rate: 0.1,
            momentum: 0.9,
            dropout: DropoutStrategy::Legacy,
            seed: None,
        }
    }
}

impl Config {
    /// Parses the file without validating it, so callers can apply
    /// overrides first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses and validates.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn topology(&self) -> Topology {
        Topology::new(self.input_count, self.hidden_units.clone(), self.output_count)
    }

    pub fn optimizer(&self) -> Momentum {
        Momentum {
            learning_rate: self.learning_rate,
            momentum: self.momentum,
        }
    }

    /// Collects every problem into one [`NNError::InvalidConfig`].
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.hidden_layers == 0 || self.hidden_units.len() != self.hidden_layers {
            problems.push(format!(
                "You do not have the correct number of layers or hidden node counts ({} layers, {} counts).",
                self.hidden_layers,
                self.hidden_units.len()
            ));
        }
        if self.hidden_units.iter().any(|&units| units == 0) {
            problems.push("Every hidden layer needs at least one node.".to_string());
        }
        let is_csv = self
            .data_file
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            problems.push("The data file passed in needs to be a csv file.".to_string());
        }
        if self.output_count == 0 {
            problems.push("Output count must be greater than 0.".to_string());
        }
        if self.input_count == 0 {
            problems.push("Input count must be greater than 0.".to_string());
        }
        if !self.default_target {
            match &self.targets {
                None => problems.push(
                    "The default target flag is set to false, but no target values were provided."
                        .to_string(),
                ),
                Some(rows) => {
                    let malformed = rows.iter().any(|row| {
                        row.len() != rows.len() || row.iter().any(|t| !(0.0..=1.0).contains(t))
                    });
                    if malformed || rows.len() != self.output_count {
                        problems.push("The target matrix you provided is not formatted correctly.".to_string());
                    }
                }
            }
        }
        if self.min >= self.max {
            problems.push("The maximum must be greater than the minimum.".to_string());
        }
        if self.training {
            if !(0.0..=1.0).contains(&self.momentum) {
                problems.push("Momentum must be between 0 and 1.".to_string());
            }
            if !(0.0..=1.0).contains(&self.learning_rate) {
                problems.push("Learning rate must be between 0 and 1.".to_string());
            }
            if self.progress && self.progress_interval == 0 {
                problems.push("The progress interval must be greater than 0.".to_string());
            }
        } else if self.network_file.is_none() {
            problems.push("You cannot perform a test without a trained neural network file.".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(NNError::InvalidConfig(problems))
        }
    }
}
