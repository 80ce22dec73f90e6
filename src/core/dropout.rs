use crate::prelude::*;

/// How hidden units are dropped during a training pass.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DropoutStrategy {
    /// Fair coin per hidden unit, but only when the network has exactly one
    /// hidden layer. Deeper networks keep every unit.
    #[default]
    Legacy,
    /// Fair coin per hidden unit in every hidden layer.
    AllLayers,
    Off,
}

impl DropoutStrategy {
    /// Whether units of a network with `hidden_layers` hidden layers can be dropped.
    pub fn is_active(self, hidden_layers: usize) -> bool {
        match self {
            DropoutStrategy::Legacy => hidden_layers == 1,
            DropoutStrategy::AllLayers => hidden_layers > 0,
            DropoutStrategy::Off => false,
        }
    }
}

/// Per-example keep flags, one vector per hidden layer. Slot 0 of each vector
/// is the bias and is always kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropoutMask {
    layers: Vec<Vec<bool>>,
}

impl DropoutMask {
    pub fn keep_all(hidden_units: &[usize]) -> Self {
        Self {
            layers: hidden_units.iter().map(|&units| vec![true; units + 1]).collect(),
        }
    }

    pub fn from_layers(layers: Vec<Vec<bool>>) -> Self {
        debug_assert!(layers.iter().all(|keep| keep.first() == Some(&true)));
        Self { layers }
    }

    pub fn hidden_layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Keep flags of hidden layer `layer`, bias slot included.
    pub fn layer(&self, layer: usize) -> &[bool] {
        &self.layers[layer]
    }

    /// `slot` counts the bias as 0, so hidden unit `u` is slot `u + 1`.
    pub fn is_kept(&self, layer: usize, slot: usize) -> bool {
        self.layers[layer][slot]
    }

    pub fn dropped_count(&self) -> usize {
        self.layers.iter().flatten().filter(|&&kept| !kept).count()
    }
}

/// Draws a fresh mask for one training example.
pub fn make_mask<R: Rng + ?Sized>(
    hidden_units: &[usize],
    strategy: DropoutStrategy,
    rng: &mut R,
) -> DropoutMask {
    if !strategy.is_active(hidden_units.len()) {
        return DropoutMask::keep_all(hidden_units);
    }
    let layers = hidden_units
        .iter()
        .map(|&units| {
            std::iter::once(true)
                .chain((0..units).map(|_| rng.gen::<bool>()))
                .collect()
        })
        .collect();
    DropoutMask { layers }
}
