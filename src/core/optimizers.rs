use crate::prelude::*;

/// Learning rate and momentum of the per-example update.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Momentum {
    pub learning_rate: f64,
    pub momentum: f64,
}

/// Last delta applied to every weight. Same shape as the network it belongs
/// to, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumBuffer {
    deltas: Network,
}

impl MomentumBuffer {
    pub fn for_network(network: &Network) -> Self {
        Self {
            deltas: Network::zeros(&network.topology()),
        }
    }

    pub fn deltas(&self) -> &Network {
        &self.deltas
    }
}

pub trait Optimization {
    fn optimize(
        &mut self,
        buffer: &mut MomentumBuffer,
        activations: &Activations,
        terms: &ErrorTerms,
        mask: &DropoutMask,
        optimizer: Momentum,
    );
}

impl Optimization for Network {
    fn optimize(
        &mut self,
        buffer: &mut MomentumBuffer,
        activations: &Activations,
        terms: &ErrorTerms,
        mask: &DropoutMask,
        optimizer: Momentum,
    ) {
        apply_update(
            self,
            buffer,
            activations,
            terms,
            mask,
            optimizer.learning_rate,
            optimizer.momentum,
        );
    }
}

/// `delta = lr * term[k] * input[j] + momentum * previous[k][j]` for every
/// connection whose sending and receiving units both survived the mask.
/// Skipped connections keep their weight and their previous delta.
///
/// All terms and activations must come from the pass before this update.
pub fn apply_update(
    network: &mut Network,
    buffer: &mut MomentumBuffer,
    activations: &Activations,
    terms: &ErrorTerms,
    mask: &DropoutMask,
    learning_rate: f64,
    momentum: f64,
) {
    let output_layer = network.hidden_layer_count();
    debug_assert_eq!(terms.len(), output_layer + 1);
    debug_assert_eq!(buffer.deltas.layers.len(), network.layers.len());

    for (layer, (weights, previous)) in network
        .layers
        .iter_mut()
        .zip(buffer.deltas.layers.iter_mut())
        .enumerate()
    {
        let input = activations.input_to(layer);
        let layer_terms = terms.layer(layer);
        debug_assert_eq!(weights.dim(), previous.dim());
        debug_assert_eq!(weights.ncols(), input.len());

        for (unit, (mut w_row, mut p_row)) in weights
            .rows_mut()
            .into_iter()
            .zip(previous.rows_mut())
            .enumerate()
        {
            if layer < output_layer && !mask.is_kept(layer, unit + 1) {
                continue;
            }
            let term = layer_terms[unit];
            for (j, (w, p)) in w_row.iter_mut().zip(p_row.iter_mut()).enumerate() {
                if layer > 0 && !mask.is_kept(layer - 1, j) {
                    continue;
                }
                let delta = learning_rate * term * input[j] + momentum * *p;
                *w += delta;
                *p = delta;
            }
        }
    }
}
