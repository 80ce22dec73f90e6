use crate::core::activations::forward;
use crate::prelude::*;

/// Rows are true classes, columns predicted classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: Array2<usize>,
}

impl ConfusionMatrix {
    pub fn new(classes: usize) -> Self {
        Self {
            counts: Array2::zeros((classes, classes)),
        }
    }

    pub fn record(&mut self, actual: usize, predicted: usize) {
        self.counts[[actual, predicted]] += 1;
    }

    pub fn count(&self, actual: usize, predicted: usize) -> usize {
        self.counts[[actual, predicted]]
    }

    pub fn classes(&self) -> usize {
        self.counts.nrows()
    }

    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    /// Number of examples whose true class is `actual`.
    pub fn actual_total(&self, actual: usize) -> usize {
        self.counts.row(actual).sum()
    }

    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub hits: usize,
    pub total: usize,
    pub confusion: Option<ConfusionMatrix>,
}

impl Evaluation {
    /// Percentage of correctly classified examples.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.hits as f64 / self.total as f64 * 100.0
    }

    pub fn accuracy_string(&self) -> String {
        format!("{:.6}%", self.accuracy())
    }
}

/// Index of the largest output. Ties go to the lowest index.
pub fn predict(output: &Array1<f64>) -> usize {
    let mut best = 0;
    for (i, &value) in output.iter().enumerate().skip(1) {
        if value > output[best] {
            best = i;
        }
    }
    best
}

/// The network must be consistent and every example must match its input
/// and output widths.
pub fn check_examples(network: &Network, examples: &[Example]) -> Result<()> {
    network.validate()?;
    let inputs = network.layers[0].ncols();
    let outputs = network.output_layer().nrows();
    for (i, example) in examples.iter().enumerate() {
        if example.features.len() != inputs {
            return Err(NNError::ShapeMismatch(format!(
                "example {} has {} features (with bias), network expects {}",
                i,
                example.features.len(),
                inputs
            )));
        }
        if example.target.len() != outputs {
            return Err(NNError::ShapeMismatch(format!(
                "example {} has {} targets, network has {} outputs",
                i,
                example.target.len(),
                outputs
            )));
        }
        if example.label >= outputs {
            return Err(NNError::ShapeMismatch(format!(
                "example {} has label {}, network has {} outputs",
                i, example.label, outputs
            )));
        }
    }
    Ok(())
}

/// Scores `network` on `examples`. The confusion matrix is only built when
/// `with_confusion` is set.
pub fn evaluate(network: &Network, examples: &[Example], with_confusion: bool) -> Result<Evaluation> {
    check_examples(network, examples)?;

    let mut confusion = with_confusion.then(|| ConfusionMatrix::new(network.output_layer().nrows()));
    let mut hits = 0;
    for example in examples {
        let predicted = predict(&forward(network, &example.features).output);
        if predicted == example.label {
            hits += 1;
        }
        if let Some(matrix) = confusion.as_mut() {
            matrix.record(example.label, predicted);
        }
    }

    Ok(Evaluation {
        hits,
        total: examples.len(),
        confusion,
    })
}
