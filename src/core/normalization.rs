use ndarray::Array1;

pub trait Normalization {
    fn to_unity(&mut self, lb: f64, ub: f64);
}

impl Normalization for Array1<f64> {
    /// Maps `[lb, ub]` onto `[0, 1]` with `(x - lb) / (ub - lb)`.
    fn to_unity(&mut self, lb: f64, ub: f64) {
        let range = ub - lb;

        // If the range is zero or nearly zero, all values become 0.0
        if range.abs() < f64::EPSILON {
            self.fill(0.0);
        } else {
            self.mapv_inplace(|val| (val - lb) / range);
        }
    }
}
