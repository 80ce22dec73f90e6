pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod prelude;
pub mod utils;

// Re-export types
pub use crate::config::Config;
pub use crate::core::{
    backward, create_network, evaluate, forward, forward_masked, make_mask, apply_update,
    Activations, ConfusionMatrix, DropoutMask, DropoutStrategy, ErrorTerms, Evaluation,
    MomentumBuffer, Network, Topology,
};
pub use crate::data::Example;
pub use crate::error::{NNError, Result};
pub use crate::models::{Report, Trainer};

pub mod plot {
    pub mod plot_accuracy_over_epochs;
}
