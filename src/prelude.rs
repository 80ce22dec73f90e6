pub use serde::{Serialize, Deserialize};
pub use std::fs::File;
pub use std::io::{Read, Write};

pub use ndarray::*;
pub use ndarray_rand::RandomExt;
pub use ndarray_rand::rand_distr::Uniform;
pub use rand::rngs::StdRng;
pub use rand::{Rng, SeedableRng};

pub use crate::config::Config;
pub use crate::data::Example;
pub use crate::error::*;
pub use crate::models::{Report, Trainer};

// Internal re-exports
pub use crate::core::{
    Activations,
    ConfusionMatrix,
    DropoutMask,
    DropoutStrategy,
    ErrorTerms,
    Evaluation,
    Momentum,
    MomentumBuffer,
    Network,
    Normalization,
    Topology,
};
