use crate::core::losses::output_error_terms;
use crate::prelude::*;

/// Error terms of one example, indexed by weight layer: `layer(l)` holds one
/// term per unit that weight layer `l` feeds, `layer(hidden_layers)` is the
/// output layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorTerms {
    layers: Vec<Array1<f64>>,
}

impl ErrorTerms {
    pub fn layer(&self, layer: usize) -> &Array1<f64> {
        &self.layers[layer]
    }

    pub fn output(&self) -> &Array1<f64> {
        &self.layers[self.layers.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Reverse-mode pass through the sigmoid units. The output layer is computed
/// first, then each hidden layer from the last toward the first. Dropped
/// units get a zero term and so add nothing to earlier layers.
pub fn backward(
    network: &Network,
    activations: &Activations,
    mask: &DropoutMask,
    target: &Array1<f64>,
) -> ErrorTerms {
    let output_layer = network.hidden_layer_count();
    debug_assert_eq!(activations.hidden_layer_count(), output_layer);
    debug_assert_eq!(mask.hidden_layer_count(), output_layer);
    debug_assert_eq!(target.len(), activations.output.len());

    let mut layers = vec![Array1::zeros(0); output_layer + 1];
    layers[output_layer] = output_error_terms(&activations.output, target);

    for layer in (0..output_layer).rev() {
        let hidden = activations.hidden(layer);
        let downstream_weights = &network.layers[layer + 1];
        let downstream_terms = &layers[layer + 1];

        let terms = Array1::from_shape_fn(hidden.len() - 1, |unit| {
            let slot = unit + 1;
            if !mask.is_kept(layer, slot) {
                return 0.0;
            }
            let h = hidden[slot];
            let propagated: f64 = downstream_weights
                .column(slot)
                .iter()
                .zip(downstream_terms.iter())
                .map(|(w, delta)| w * delta)
                .sum();
            h * (1.0 - h) * propagated
        });
        layers[layer] = terms;
    }

    ErrorTerms { layers }
}
