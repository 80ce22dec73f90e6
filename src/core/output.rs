use crate::core::evaluation::ConfusionMatrix;
use crate::prelude::*;
use csv::Writer;

/// Renders a confusion matrix as a CSV block: a heading line, a header row of
/// predicted classes, then one row per true class.
pub fn confusion_matrix_csv(matrix: &ConfusionMatrix) -> Result<String> {
    let mut wtr = Writer::from_writer(vec![]);

    let mut header = vec![String::new()];
    header.extend((0..matrix.classes()).map(|c| c.to_string()));
    wtr.write_record(&header)?;

    for (actual, row) in matrix.counts().outer_iter().enumerate() {
        let mut record = vec![actual.to_string()];
        record.extend(row.iter().map(|x| x.to_string()));
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|e| NNError::IoError(e.into_error()))?;
    Ok(format!("Confusion Matrix\n{}", String::from_utf8_lossy(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_true_classes() {
        let mut matrix = ConfusionMatrix::new(2);
        matrix.record(0, 0);
        matrix.record(0, 0);
        matrix.record(1, 0);
        matrix.record(1, 1);
        let text = confusion_matrix_csv(&matrix).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Confusion Matrix", ",0,1", "0,2,0", "1,1,1"]);
    }
}
