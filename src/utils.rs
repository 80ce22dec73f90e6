#[allow(unused)]
use crate::prelude::*;

/// Half-width of the uniform range new weights are drawn from.
pub const INIT_RANGE: f64 = 0.05;

#[macro_export]
macro_rules! rand_array {
    ($rng:expr; $($x:expr),*) => {
        {
            Array2::random_using(
                ($($x,)*),
                Uniform::new_inclusive(-$crate::utils::INIT_RANGE, $crate::utils::INIT_RANGE),
                $rng,
            )
        }
    };
}

/// Seeded when a seed is configured, otherwise from OS entropy.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rand_array_stays_in_init_range() {
        let mut rng = seeded_rng(Some(3));
        let w: Array2<f64> = rand_array!(&mut rng; 20, 30);
        assert_eq!(w.dim(), (20, 30));
        assert!(w.iter().all(|x| (-INIT_RANGE..=INIT_RANGE).contains(x)));
        // not all identical
        assert!(w.iter().any(|&x| x != w[[0, 0]]));
    }

    #[test]
    fn same_seed_same_draws() {
        let mut a = seeded_rng(Some(11));
        let mut b = seeded_rng(Some(11));
        let wa: Array2<f64> = rand_array!(&mut a; 3, 4);
        let wb: Array2<f64> = rand_array!(&mut b; 3, 4);
        assert_eq!(wa, wb);
    }
}
