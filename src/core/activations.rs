use crate::prelude::*;

/// Base of the logistic function. This is the truncated constant the weight
/// files were trained with, not `std::f64::consts::E`.
pub const SIGMOID_BASE: f64 = 2.71828;

const BIAS: f64 = 1.0;

/// Logistic sigmoid `1 / (1 + b^-x)`. Saturated sums stay inside the open
/// interval (0, 1).
pub fn sigmoid(x: f64) -> f64 {
    let s = 1.0 / (1.0 + SIGMOID_BASE.powf(-x));
    s.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON / 2.0)
}

/// Activations of one forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Activations {
    /// `inputs[0]` is the bias-prefixed feature vector, `inputs[i + 1]` the
    /// bias-prefixed activations of hidden layer `i`. `inputs[l]` is what
    /// weight layer `l` consumes.
    pub inputs: Vec<Array1<f64>>,
    pub output: Array1<f64>,
}

impl Activations {
    /// Bias-prefixed vector fed into weight layer `layer`.
    pub fn input_to(&self, layer: usize) -> &Array1<f64> {
        &self.inputs[layer]
    }

    /// Bias-prefixed activations of hidden layer `layer`.
    pub fn hidden(&self, layer: usize) -> &Array1<f64> {
        &self.inputs[layer + 1]
    }

    pub fn hidden_layer_count(&self) -> usize {
        self.inputs.len() - 1
    }
}

/// Evaluation pass: every hidden unit participates.
pub fn forward(network: &Network, features: &Array1<f64>) -> Activations {
    propagate(network, features, None)
}

/// Training pass: hidden units dropped by `mask` contribute nothing to the
/// next layer's weighted sums.
pub fn forward_masked(network: &Network, features: &Array1<f64>, mask: &DropoutMask) -> Activations {
    debug_assert_eq!(mask.hidden_layer_count(), network.hidden_layer_count());
    propagate(network, features, Some(mask))
}

fn propagate(network: &Network, features: &Array1<f64>, mask: Option<&DropoutMask>) -> Activations {
    debug_assert_eq!(features.len(), network.layers[0].ncols());
    debug_assert_eq!(features[0], BIAS);

    let hidden_layers = network.hidden_layer_count();
    let mut inputs = Vec::with_capacity(hidden_layers + 1);
    inputs.push(features.clone());

    for (layer, weights) in network.layers[..hidden_layers].iter().enumerate() {
        let keep = keep_for(mask, layer);
        let previous = &inputs[layer];
        let mut next = Array1::from_elem(weights.nrows() + 1, BIAS);
        for (unit, row) in weights.rows().into_iter().enumerate() {
            next[unit + 1] = sigmoid(weighted_sum(row, previous, keep));
        }
        inputs.push(next);
    }

    let keep = keep_for(mask, hidden_layers);
    let last = &inputs[hidden_layers];
    let output = network
        .output_layer()
        .rows()
        .into_iter()
        .map(|row| sigmoid(weighted_sum(row, last, keep)))
        .collect::<Array1<f64>>();

    Activations { inputs, output }
}

/// Keep flags for the inputs of weight layer `layer`. The raw features are
/// never dropped.
fn keep_for(mask: Option<&DropoutMask>, layer: usize) -> Option<&[bool]> {
    match mask {
        Some(mask) if layer > 0 => Some(mask.layer(layer - 1)),
        _ => None,
    }
}

fn weighted_sum(row: ArrayView1<f64>, input: &Array1<f64>, keep: Option<&[bool]>) -> f64 {
    debug_assert_eq!(row.len(), input.len());
    match keep {
        None => row.iter().zip(input.iter()).map(|(w, a)| w * a).sum(),
        Some(keep) => row
            .iter()
            .zip(input.iter())
            .zip(keep.iter())
            .filter(|(_, kept)| **kept)
            .map(|((w, a), _)| w * a)
            .sum(),
    }
}
