use crate::prelude::*;
use crate::rand_array;

/// Unit counts of a network. `input_count` is the raw feature count, the
/// bias input is added on top of it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pub input_count: usize,
    pub hidden_units: Vec<usize>,
    pub output_count: usize,
}

impl Topology {
    pub fn new(input_count: usize, hidden_units: Vec<usize>, output_count: usize) -> Self {
        Self {
            input_count,
            hidden_units,
            output_count,
        }
    }

    pub fn hidden_layer_count(&self) -> usize {
        self.hidden_units.len()
    }

    /// `(rows, columns)` of every weight layer, input side first. Column 0 of
    /// every layer is the bias weight.
    pub fn layer_shapes(&self) -> Vec<(usize, usize)> {
        let mut shapes = Vec::with_capacity(self.hidden_units.len() + 1);
        let mut width = self.input_count + 1;
        for &units in &self.hidden_units {
            shapes.push((units, width));
            width = units + 1;
        }
        shapes.push((self.output_count, width));
        shapes
    }
}

/// Layered weight store. `layers[i]` has one row per unit of layer `i` and
/// one column per (bias-prefixed) input of that layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Network {
    pub layers: Vec<Array2<f64>>,
}

impl Network {
    /// Every weight drawn uniformly from [-0.05, 0.05].
    pub fn random<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> Self {
        let layers = topology
            .layer_shapes()
            .into_iter()
            .map(|(rows, cols)| rand_array!(rng; rows, cols))
            .collect();
        Self { layers }
    }

    pub fn zeros(topology: &Topology) -> Self {
        let layers = topology
            .layer_shapes()
            .into_iter()
            .map(|shape| Array2::zeros(shape))
            .collect();
        Self { layers }
    }

    /// Builds a network from explicit weights, checking that consecutive
    /// layers line up.
    pub fn from_layers(layers: Vec<Array2<f64>>) -> Result<Self> {
        let network = Self { layers };
        network.validate()?;
        Ok(network)
    }

    pub fn hidden_layer_count(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }

    pub fn output_layer(&self) -> &Array2<f64> {
        &self.layers[self.layers.len() - 1]
    }

    pub fn topology(&self) -> Topology {
        let input_count = self.layers.first().map_or(0, |w| w.ncols().saturating_sub(1));
        let hidden_units = self.layers[..self.hidden_layer_count()]
            .iter()
            .map(|w| w.nrows())
            .collect();
        let output_count = self.layers.last().map_or(0, |w| w.nrows());
        Topology::new(input_count, hidden_units, output_count)
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(|w| w.len()).sum()
    }

    /// Internal consistency: at least one layer, no empty layer, and each
    /// layer is exactly one column wider than the previous layer has units.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(NNError::ShapeMismatch("network has no layers".to_string()));
        }
        for (i, w) in self.layers.iter().enumerate() {
            if w.nrows() == 0 || w.ncols() < 2 {
                return Err(NNError::ShapeMismatch(format!(
                    "layer {} has shape {:?}",
                    i,
                    w.dim()
                )));
            }
            if i > 0 {
                let expected = self.layers[i - 1].nrows() + 1;
                if w.ncols() != expected {
                    return Err(NNError::ShapeMismatch(format!(
                        "layer {} has {} columns, expected {}",
                        i,
                        w.ncols(),
                        expected
                    )));
                }
            }
        }
        Ok(())
    }

    /// Fails unless every layer has exactly the shape `topology` declares.
    pub fn check_topology(&self, topology: &Topology) -> Result<()> {
        let shapes = topology.layer_shapes();
        if shapes.len() != self.layers.len() {
            return Err(NNError::ShapeMismatch(format!(
                "network has {} layers, expected {}",
                self.layers.len(),
                shapes.len()
            )));
        }
        for (i, (w, shape)) in self.layers.iter().zip(shapes).enumerate() {
            if w.dim() != shape {
                return Err(NNError::ShapeMismatch(format!(
                    "layer {} has shape {:?}, expected {:?}",
                    i,
                    w.dim(),
                    shape
                )));
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> String {
        let mut res = "\nNetwork\n".to_string();
        res.push_str("-------------------------------------------------------------\n");
        res.push_str("Layer\t\t Units\t\t Inputs (incl. bias)\t No.of params\n");
        for (i, w) in self.layers.iter().enumerate() {
            let name = if i == self.hidden_layer_count() {
                "Output".to_string()
            } else {
                format!("Hidden {}", i)
            };
            res.push_str(&format!("{}\t {}\t\t {}\t\t\t {}\n", name, w.nrows(), w.ncols(), w.len()));
        }
        res.push_str("-------------------------------------------------------------\n");
        res.push_str(&format!("Total params: {}\n", self.parameter_count()));
        res
    }
}

/// Random weights when `random` is set, all zeros otherwise.
pub fn create_network<R: Rng + ?Sized>(random: bool, topology: &Topology, rng: &mut R) -> Network {
    if random {
        Network::random(topology, rng)
    } else {
        Network::zeros(topology)
    }
}
