// src/core.rs
pub mod activations;
pub mod backprop;
pub mod dropout;
pub mod evaluation;
pub mod layers;
pub mod losses;
pub mod normalization;
pub mod optimizers;
pub mod output;

// Re-export commonly used items
pub use activations::{forward, forward_masked, sigmoid, Activations};
pub use backprop::{backward, ErrorTerms};
pub use dropout::{make_mask, DropoutMask, DropoutStrategy};
pub use evaluation::{evaluate, predict, ConfusionMatrix, Evaluation};
pub use layers::{create_network, Network, Topology};
pub use losses::{output_error_terms, squared_error};
pub use normalization::Normalization;
pub use optimizers::{apply_update, Momentum, MomentumBuffer};
pub use output::confusion_matrix_csv;
