//! Utilities related to numbers.

use num;
use std::fmt;

/// Floating point marker trait for easier control over trait bounds.
pub trait BFloat: Sync + Send + num::Float + num::cast::FromPrimitive + fmt::Debug {}

impl BFloat for f32 {}
impl BFloat for f64 {}

/// Computes the arithmetic mean of the given values, or `None` if there are none.
pub fn mean<F, I>(values: I) -> Option<F>
where
    F: BFloat,
    I: IntoIterator<Item = F>,
{
    let (sum, count) = values
        .into_iter()
        .fold((F::zero(), 0_usize), |(sum, count), value| {
            (sum + value, count + 1)
        });
    if count == 0 {
        None
    } else {
        F::from_usize(count).map(|count| sum / count)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn mean_of_values_works() {
        assert_eq!(mean(vec![1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean(Vec::<f64>::new()), None);
    }
}
