use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum NNError {
    // Configuration errors, every violated constraint in one report
    InvalidConfig(Vec<String>),

    // Dataset errors
    InvalidData {
        file: String,
        row: usize,
        msg: String,
    },
    EmptyDataset(String),

    // Core invariant violations (layer/activation/target widths)
    ShapeMismatch(String),

    // File operations
    ModelLoadError(String),
    ModelSaveError(String),

    IoError(std::io::Error),
    SerializationError(Box<bincode::ErrorKind>), // Used for bincode serialization errors
    JsonError(serde_json::Error),
    CsvError(csv::Error),

    PlotError(String),
}

impl fmt::Display for NNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NNError::InvalidConfig(problems) => {
                writeln!(f, "There are config errors that need to be fixed before runtime:")?;
                for (i, problem) in problems.iter().enumerate() {
                    writeln!(f, "\t{}. {}", i + 1, problem)?;
                }
                Ok(())
            }
            NNError::InvalidData { file, row, msg } => {
                write!(f, "Invalid data in {} on row {}: {}", file, row, msg)
            }
            NNError::EmptyDataset(file) => write!(f, "Dataset {} has no rows", file),
            NNError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            NNError::ModelLoadError(msg) => write!(f, "Failed to load network: {}", msg),
            NNError::ModelSaveError(msg) => write!(f, "Failed to save network: {}", msg),
            NNError::IoError(err) => write!(f, "I/O error: {}", err),
            NNError::SerializationError(err) => write!(f, "Serialization error: {}", err),
            NNError::JsonError(err) => write!(f, "JSON error: {}", err),
            NNError::CsvError(err) => write!(f, "CSV error: {}", err),
            NNError::PlotError(msg) => write!(f, "Plot error: {}", msg),
        }
    }
}

impl From<std::io::Error> for NNError {
    fn from(err: std::io::Error) -> NNError {
        NNError::IoError(err)
    }
}

impl From<Box<bincode::ErrorKind>> for NNError {
    fn from(err: Box<bincode::ErrorKind>) -> NNError {
        NNError::SerializationError(err)
    }
}

impl From<serde_json::Error> for NNError {
    fn from(err: serde_json::Error) -> NNError {
        NNError::JsonError(err)
    }
}

impl From<csv::Error> for NNError {
    fn from(err: csv::Error) -> NNError {
        NNError::CsvError(err)
    }
}

impl Error for NNError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NNError::IoError(err) => Some(err),
            NNError::SerializationError(err) => Some(err),
            NNError::JsonError(err) => Some(err),
            NNError::CsvError(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NNError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_report_numbers_every_problem() {
        let err = NNError::InvalidConfig(vec![
            "Output count must be greater than 0.".to_string(),
            "The maximum must be greater than the minimum.".to_string(),
        ]);
        let text = err.to_string();
        assert!(text.contains("\t1. Output count"));
        assert!(text.contains("\t2. The maximum"));
    }

    #[test]
    fn data_error_names_file_and_row() {
        let err = NNError::InvalidData {
            file: "train.csv".into(),
            row: 7,
            msg: "label 4 is out of range".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid data in train.csv on row 7: label 4 is out of range"
        );
    }
}
