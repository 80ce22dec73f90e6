use std::path::Path;

use log::{debug, info};

use crate::core::activations::forward_masked;
use crate::core::backprop::backward;
use crate::core::dropout::make_mask;
use crate::core::evaluation::{check_examples, evaluate};
use crate::core::losses::squared_error;
use crate::core::optimizers::Optimization;
use crate::core::output::confusion_matrix_csv;
use crate::data::{load_csv, DataSettings};
use crate::plot::plot_accuracy_over_epochs::plot_accuracy_over_epochs;
use crate::prelude::*;
use crate::utils::seeded_rng;

/// Owns the network and its momentum buffer for one training run.
pub struct Trainer {
    network: Network,
    momentum_buffer: MomentumBuffer,
    hidden_units: Vec<usize>,
    optimizer: Momentum,
    dropout: DropoutStrategy,
    rng: StdRng,
    epochs: usize,
    test_while_training: bool,
    confusion_matrix: bool,
    progress_interval: Option<usize>,
}

impl Trainer {
    /// Fresh random network shaped by `config`. The same RNG later drives
    /// dropout, so a fixed seed reproduces the whole run.
    pub fn new(config: &Config) -> Self {
        let mut rng = seeded_rng(config.seed);
        let network = Network::random(&config.topology(), &mut rng);
        Self::build(network, rng, config)
    }

    fn build(network: Network, rng: StdRng, config: &Config) -> Self {
        let momentum_buffer = MomentumBuffer::for_network(&network);
        let hidden_units = network.topology().hidden_units;
        Self {
            network,
            momentum_buffer,
            hidden_units,
            optimizer: config.optimizer(),
            dropout: config.dropout,
            rng,
            epochs: config.epochs,
            test_while_training: config.test_while_training,
            confusion_matrix: config.confusion_matrix,
            progress_interval: config.progress.then_some(config.progress_interval.max(1)),
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    /// Forward, mask, backward and update for a single example. Returns the
    /// example's squared error before the update.
    pub fn train_example(&mut self, example: &Example) -> f64 {
        let mask = make_mask(&self.hidden_units, self.dropout, &mut self.rng);
        let activations = forward_masked(&self.network, &example.features, &mask);
        let terms = backward(&self.network, &activations, &mask, &example.target);
        self.network.optimize(
            &mut self.momentum_buffer,
            &activations,
            &terms,
            &mask,
            self.optimizer,
        );
        squared_error(&activations.output, &example.target)
    }

    /// One pass over `examples` in order. Returns the mean squared error.
    pub fn run_epoch(&mut self, examples: &[Example]) -> f64 {
        let total: f64 = examples.iter().map(|example| self.train_example(example)).sum();
        total / examples.len().max(1) as f64
    }

    /// Runs every configured epoch, then scores the final network.
    pub fn train(&mut self, examples: &[Example]) -> Result<Report> {
        check_examples(&self.network, examples)?;

        let mut report = Report::new("training data accuracy");
        for epoch in 0..self.epochs {
            let show = self.progress_interval.is_some_and(|n| epoch % n == 0);
            if self.test_while_training {
                let evaluation = evaluate(&self.network, examples, self.confusion_matrix)?;
                if show {
                    info!(
                        "Beginning epoch #{}, current accuracy is {}",
                        epoch,
                        evaluation.accuracy_string()
                    );
                }
                report.epochs.push((epoch, evaluation));
            } else if show {
                info!("Beginning epoch #{}", epoch);
            }

            let loss = self.run_epoch(examples);
            debug!("Epoch {} mean squared error {:.6}", epoch, loss);
        }
        if self.progress_interval.is_some() {
            info!("The final epoch has completed");
        }

        report.final_evaluation = Some(evaluate(&self.network, examples, self.confusion_matrix)?);
        Ok(report)
    }
}

/// Accuracy per tested epoch plus the final evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub epochs: Vec<(usize, Evaluation)>,
    pub final_evaluation: Option<Evaluation>,
}

impl Report {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            epochs: Vec::new(),
            final_evaluation: None,
        }
    }

    pub fn accuracy_history(&self) -> Vec<f64> {
        self.epochs.iter().map(|(_, e)| e.accuracy()).collect()
    }

    pub fn render(&self) -> Result<String> {
        let mut res = format!("{}\n", self.title);
        for (epoch, evaluation) in &self.epochs {
            res.push_str(&format!("epoch {}: ", epoch));
            push_evaluation(&mut res, evaluation)?;
        }
        if let Some(evaluation) = &self.final_evaluation {
            res.push_str("final: ");
            push_evaluation(&mut res, evaluation)?;
        }
        Ok(res)
    }
}

fn push_evaluation(res: &mut String, evaluation: &Evaluation) -> Result<()> {
    res.push_str(&evaluation.accuracy_string());
    res.push('\n');
    if let Some(matrix) = &evaluation.confusion {
        res.push_str(&confusion_matrix_csv(matrix)?);
    }
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl Network {
    /// JSON for `.json` paths, bincode otherwise.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let encoded: Vec<u8> = if is_json(path) {
            serde_json::to_vec(self)?
        } else {
            bincode::serialize(self).map_err(NNError::SerializationError)?
        };

        File::create(path)
            .map_err(NNError::IoError)?
            .write_all(&encoded)
            .map_err(NNError::IoError)?;

        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        let path = path.as_ref();
        let mut buffer = Vec::new();

        File::open(path)
            .map_err(NNError::IoError)?
            .read_to_end(&mut buffer)
            .map_err(NNError::IoError)?;

        let network: Network = if is_json(path) {
            serde_json::from_slice(&buffer)?
        } else {
            bincode::deserialize(&buffer).map_err(NNError::SerializationError)?
        };
        network
            .validate()
            .map_err(|e| NNError::ModelLoadError(format!("{}: {}", path.display(), e)))?;

        Ok(network)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// What a run produced.
#[derive(Debug)]
pub struct Outcome {
    pub network: Network,
    pub report: String,
}

/// Runs the configured mode end to end. `config` must already be validated.
pub fn run(config: &Config) -> Result<Outcome> {
    info!("Starting up");
    let settings = DataSettings::from_config(config);
    let examples = load_csv(&config.data_file, &settings)?;

    let (network, report) = if config.training {
        let mut trainer = Trainer::new(config);
        debug!("{}", trainer.network().summary());
        let report = trainer.train(&examples)?;
        if let Some(path) = &config.accuracy_plot_file {
            plot_report(&report, path)?;
        }
        (trainer.into_network(), report)
    } else {
        let path = config
            .network_file
            .as_ref()
            .ok_or_else(|| NNError::ModelLoadError("no network file configured".to_string()))?;
        info!("Loading network from {}", path.display());
        let network = Network::load(path)?;
        network.check_topology(&config.topology())?;
        let mut report = Report::new("test data accuracy");
        report.final_evaluation = Some(evaluate(&network, &examples, config.confusion_matrix)?);
        (network, report)
    };

    let rendered = report.render()?;
    match &config.output_file {
        Some(path) => {
            File::create(path)?.write_all(rendered.as_bytes())?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if config.training {
        match &config.network_file {
            Some(path) => {
                network
                    .save(path)
                    .map_err(|e| NNError::ModelSaveError(format!("{}: {}", path.display(), e)))?;
                info!("Network written to {}", path.display());
            }
            None => println!("{}", network.to_json()?),
        }
    }

    info!("Shutting down");
    Ok(Outcome {
        network,
        report: rendered,
    })
}

fn plot_report(report: &Report, path: &Path) -> Result<()> {
    let history = report.accuracy_history();
    if history.is_empty() {
        log::warn!("No per-epoch accuracy collected, skipping plot {}", path.display());
        return Ok(());
    }
    let filename = path.to_string_lossy();
    plot_accuracy_over_epochs(&history, &filename).map_err(|e| NNError::PlotError(e.to_string()))?;
    info!("Accuracy plot has been saved as '{}'", filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::soft_one_hot;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("bpnet-models-{}-{}", std::process::id(), name))
    }

    fn config(hidden_units: Vec<usize>, epochs: usize) -> Config {
        Config {
            data_file: "and.csv".into(),
            input_count: 2,
            hidden_layers: hidden_units.len(),
            hidden_units,
            output_count: 2,
            epochs,
            seed: Some(1),
            progress: false,
            ..Config::default()
        }
    }

    fn and_examples() -> Vec<Example> {
        [(0.0, 0.0, 0), (0.0, 1.0, 0), (1.0, 0.0, 0), (1.0, 1.0, 1)]
            .iter()
            .map(|&(a, b, label)| Example::new(&[a, b], soft_one_hot(label, 2), label))
            .collect()
    }

    #[test]
    fn report_has_one_entry_per_tested_epoch() {
        let mut trainer = Trainer::new(&config(vec![2], 7));
        let report = trainer.train(&and_examples()).unwrap();
        assert_eq!(report.epochs.len(), 7);
        assert_eq!(report.epochs.iter().map(|(e, _)| *e).collect::<Vec<_>>(), (0..7).collect::<Vec<_>>());
        let last = report.final_evaluation.as_ref().unwrap();
        assert_eq!(last.total, 4);
        assert_eq!(last.confusion.as_ref().unwrap().total(), 4);
    }

    #[test]
    fn no_epoch_entries_without_test_while_training() {
        let mut cfg = config(vec![2], 3);
        cfg.test_while_training = false;
        cfg.confusion_matrix = false;
        let report = Trainer::new(&cfg).train(&and_examples()).unwrap();
        assert!(report.epochs.is_empty());
        assert!(report.final_evaluation.unwrap().confusion.is_none());
    }

    #[test]
    fn fixed_seed_reproduces_run() {
        let cfg = config(vec![3], 20);
        let mut a = Trainer::new(&cfg);
        let mut b = Trainer::new(&cfg);
        let ra = a.train(&and_examples()).unwrap();
        let rb = b.train(&and_examples()).unwrap();
        assert_eq!(a.network(), b.network());
        assert_eq!(ra, rb);
    }

    #[test]
    fn training_changes_the_network() {
        let cfg = config(vec![2], 1);
        let mut trainer = Trainer::new(&cfg);
        let before = trainer.network().clone();
        trainer.run_epoch(&and_examples());
        assert_ne!(&before, trainer.network());
    }

    #[test]
    fn mismatched_examples_fail_fast() {
        let mut trainer = Trainer::new(&config(vec![2], 1));
        let wrong = vec![Example::new(&[0.5, 0.5, 0.5], soft_one_hot(0, 2), 0)];
        assert!(matches!(trainer.train(&wrong), Err(NNError::ShapeMismatch(_))));
    }

    #[test]
    fn render_lists_epochs_then_final() {
        let mut cfg = config(vec![2], 2);
        cfg.confusion_matrix = false;
        let report = Trainer::new(&cfg).train(&and_examples()).unwrap();
        let text = report.render().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "training data accuracy");
        assert!(lines[1].starts_with("epoch 0: ") && lines[1].ends_with('%'));
        assert!(lines[2].starts_with("epoch 1: "));
        assert!(lines[3].starts_with("final: "));
    }

    #[test]
    fn bincode_and_json_round_trips_are_exact() {
        let topology = Topology::new(5, vec![4, 3], 3);
        let network = Network::random(&topology, &mut seeded_rng(Some(99)));
        for name in ["net.bin", "net.json"] {
            let path = temp_path(name);
            network.save(&path).unwrap();
            let loaded = Network::load(&path).unwrap();
            std::fs::remove_file(&path).ok();
            assert_eq!(loaded.layers.len(), network.layers.len());
            for (a, b) in loaded.layers.iter().zip(network.layers.iter()) {
                assert_eq!(a.dim(), b.dim());
                for (x, y) in a.iter().zip(b.iter()) {
                    assert_eq!(x.to_bits(), y.to_bits(), "{}", name);
                }
            }
        }
    }

    #[test]
    fn loading_garbage_fails() {
        let path = temp_path("garbage.json");
        std::fs::write(&path, b"{\"layers\": 3}").unwrap();
        let result = Network::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(NNError::JsonError(_))));
    }
}
