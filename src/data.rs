use std::path::Path;

use crate::core::Normalization;
use crate::prelude::*;

/// Target value of the true class in a soft one-hot vector.
pub const SOFT_ON: f64 = 0.9;
/// Target value of every other class.
pub const SOFT_OFF: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// Bias-prefixed, normalised features.
    pub features: Array1<f64>,
    pub target: Array1<f64>,
    pub label: usize,
}

impl Example {
    /// `features` must already be normalised and must not contain the bias.
    pub fn new(features: &[f64], target: Array1<f64>, label: usize) -> Self {
        let mut biased = Array1::from_elem(features.len() + 1, 1.0);
        biased.slice_mut(s![1..]).assign(&ArrayView1::from(features));
        Self {
            features: biased,
            target,
            label,
        }
    }

    pub fn with_soft_target(features: &[f64], label: usize, output_count: usize) -> Self {
        Self::new(features, soft_one_hot(label, output_count), label)
    }
}

/// 0.9 at `label`, 0.1 everywhere else.
pub fn soft_one_hot(label: usize, output_count: usize) -> Array1<f64> {
    let mut target = Array1::from_elem(output_count, SOFT_OFF);
    target[label] = SOFT_ON;
    target
}

/// Where each example's target vector comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    SoftOneHot,
    /// Row `label` of the matrix is the target of class `label`.
    Matrix(Vec<Vec<f64>>),
}

/// Everything the loader needs from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub input_count: usize,
    pub output_count: usize,
    pub min: f64,
    pub max: f64,
    pub targets: Targets,
}

impl DataSettings {
    pub fn from_config(config: &Config) -> Self {
        let targets = match (&config.targets, config.default_target) {
            (Some(matrix), false) => Targets::Matrix(matrix.clone()),
            _ => Targets::SoftOneHot,
        };
        Self {
            input_count: config.input_count,
            output_count: config.output_count,
            min: config.min,
            max: config.max,
            targets,
        }
    }

    fn target_for(&self, label: usize) -> Array1<f64> {
        match &self.targets {
            Targets::SoftOneHot => soft_one_hot(label, self.output_count),
            Targets::Matrix(rows) => Array1::from(rows[label].clone()),
        }
    }
}

/// Reads every `label, feature_1, ..., feature_n` row of the headerless CSV
/// file at `path`.
pub fn load_csv<P: AsRef<Path>>(path: P, settings: &DataSettings) -> Result<Vec<Example>> {
    let path = path.as_ref();
    let name = path.display().to_string();
    log::info!("Reading data file {}", name);
    let file = File::open(path)?;
    let examples = parse_rows(file, &name, settings)?;
    log::info!("Finished loading {} examples from {}", examples.len(), name);
    Ok(examples)
}

/// Parses CSV rows from any reader. `name` only labels error messages.
pub fn parse_rows<R: Read>(reader: R, name: &str, settings: &DataSettings) -> Result<Vec<Example>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut examples = Vec::new();
    let mut class_counts = vec![0usize; settings.output_count];
    for (index, record) in rdr.records().enumerate() {
        let row = index + 1;
        let record = record?;
        let example = parse_record(&record, row, name, settings)?;
        class_counts[example.label] += 1;
        examples.push(example);
    }

    if examples.is_empty() {
        return Err(NNError::EmptyDataset(name.to_string()));
    }
    log::debug!("Examples per class in {}: {:?}", name, class_counts);
    Ok(examples)
}

fn parse_record(
    record: &csv::StringRecord,
    row: usize,
    name: &str,
    settings: &DataSettings,
) -> Result<Example> {
    let invalid = |msg: String| NNError::InvalidData {
        file: name.to_string(),
        row,
        msg,
    };

    let expected = settings.input_count + 1;
    if record.len() != expected {
        return Err(invalid(format!(
            "expected a label and {} features, found {} fields",
            settings.input_count,
            record.len()
        )));
    }

    let label_field = &record[0];
    let label: usize = label_field
        .parse()
        .map_err(|e| invalid(format!("label {:?} is not a class index: {}", label_field, e)))?;
    if label >= settings.output_count {
        return Err(invalid(format!(
            "label {} is out of range for {} output classes",
            label, settings.output_count
        )));
    }

    let mut features = Array1::zeros(settings.input_count);
    for (column, field) in record.iter().enumerate().skip(1) {
        let value: i64 = field.parse().map_err(|e| {
            invalid(format!("column {} value {:?} is not an integer: {}", column + 1, field, e))
        })?;
        features[column - 1] = value as f64;
    }
    features.to_unity(settings.min, settings.max);

    let target = settings.target_for(label);
    Ok(Example::new(&features.to_vec(), target, label))
}
