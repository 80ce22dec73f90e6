use crate::prelude::*;

/// Half the summed squared error between `output` and `target`.
pub fn squared_error(output: &Array1<f64>, target: &Array1<f64>) -> f64 {
    debug_assert_eq!(output.len(), target.len());
    0.5 * output
        .iter()
        .zip(target.iter())
        .map(|(o, t)| (t - o).powi(2))
        .sum::<f64>()
}

/// Output error terms `o * (1 - o) * (t - o)`.
pub fn output_error_terms(output: &Array1<f64>, target: &Array1<f64>) -> Array1<f64> {
    debug_assert_eq!(output.len(), target.len());
    output
        .iter()
        .zip(target.iter())
        .map(|(&o, &t)| o * (1.0 - o) * (t - o))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_error_of_soft_target() {
        let output = array![0.5, 0.5];
        let target = array![0.9, 0.1];
        let loss = squared_error(&output, &target);
        assert!((loss - 0.5 * (0.16 + 0.16)).abs() < 1e-12);
        assert_eq!(squared_error(&target, &target), 0.0);
    }

    #[test]
    fn output_terms_point_toward_target() {
        let output = array![0.5, 0.5, 0.9];
        let target = array![0.9, 0.1, 0.9];
        let terms = output_error_terms(&output, &target);
        assert!((terms[0] - 0.25 * 0.4).abs() < 1e-12);
        assert!((terms[1] + 0.25 * 0.4).abs() < 1e-12);
        assert_eq!(terms[2], 0.0);
    }
}
