//! Geometric utility objects.

use crate::num::BFloat;
use std::{
    fmt,
    ops::{Add, Div, Index, Mul, Sub},
};

#[cfg(feature = "for-testing")]
use approx::{AbsDiffEq, RelativeEq};

/// Denotes the x-, y- or z-dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Dim3 {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Dim3 {
    /// Creates an array for iterating over the x-, y- and z-dimensions.
    pub fn slice() -> [Self; 3] {
        [Self::X, Self::Y, Self::Z]
    }

    /// Returns the number of the dimension.
    pub fn num(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dim3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => "x",
                Self::Y => "y",
                Self::Z => "z",
            }
        )
    }
}

use Dim3::{X, Y, Z};

/// A 3D vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3<F>([F; 3]);

impl<F: BFloat> Vec3<F> {
    /// Creates a new 3D vector given the three components.
    pub fn new(x: F, y: F, z: F) -> Self {
        Self([x, y, z])
    }

    /// Creates a new 3D vector by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(mut create_component: C) -> Self
    where
        C: FnMut(Dim3) -> F,
    {
        Self::new(
            create_component(X),
            create_component(Y),
            create_component(Z),
        )
    }

    /// Creates a new 3D vector from the first three values of the given slice.
    ///
    /// Returns `None` if the slice holds fewer than three values.
    pub fn from_slice(values: &[F]) -> Option<Self> {
        match values {
            [x, y, z, ..] => Some(Self::new(*x, *y, *z)),
            _ => None,
        }
    }

    /// Creates a new zero vector.
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    /// Computes the squared length of the vector.
    pub fn squared_length(&self) -> F {
        self[X] * self[X] + self[Y] * self[Y] + self[Z] * self[Z]
    }

    /// Computes the length of the vector.
    pub fn length(&self) -> F {
        self.squared_length().sqrt()
    }

    /// Computes the length of the projection of the vector onto the xy-plane.
    pub fn length_xy(&self) -> F {
        (self[X] * self[X] + self[Y] * self[Y]).sqrt()
    }

    /// Whether all components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self[X].is_zero() && self[Y].is_zero() && self[Z].is_zero()
    }

    /// Whether all components are finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|component| component.is_finite())
    }

    /// Computes the cross product of the vector with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self[Y] * other[Z] - self[Z] * other[Y],
            self[Z] * other[X] - self[X] * other[Z],
            self[X] * other[Y] - self[Y] * other[X],
        )
    }
}

impl<F: BFloat> Index<Dim3> for Vec3<F> {
    type Output = F;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<'a, F: BFloat> Add<&'a Vec3<F>> for &'a Vec3<F> {
    type Output = Vec3<F>;
    fn add(self, other: &'a Vec3<F>) -> Self::Output {
        Vec3::new(self[X] + other[X], self[Y] + other[Y], self[Z] + other[Z])
    }
}

impl<F: BFloat> Add<Vec3<F>> for Vec3<F> {
    type Output = Vec3<F>;
    fn add(self, other: Vec3<F>) -> Self::Output {
        &self + &other
    }
}

impl<F: BFloat> Add<&Vec3<F>> for Vec3<F> {
    type Output = Vec3<F>;
    fn add(self, other: &Vec3<F>) -> Self::Output {
        &self + other
    }
}

impl<'a, F: BFloat> Sub<&'a Vec3<F>> for &'a Vec3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: &'a Vec3<F>) -> Self::Output {
        Vec3::new(self[X] - other[X], self[Y] - other[Y], self[Z] - other[Z])
    }
}

impl<F: BFloat> Sub<Vec3<F>> for Vec3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Vec3<F>) -> Self::Output {
        &self - &other
    }
}

impl<F: BFloat> Sub<&Vec3<F>> for Vec3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: &Vec3<F>) -> Self::Output {
        &self - other
    }
}

impl<F: BFloat> Mul<F> for &Vec3<F> {
    type Output = Vec3<F>;
    fn mul(self, factor: F) -> Self::Output {
        Vec3::new(factor * self[X], factor * self[Y], factor * self[Z])
    }
}

impl<F: BFloat> Mul<F> for Vec3<F> {
    type Output = Vec3<F>;
    fn mul(self, factor: F) -> Self::Output {
        &self * factor
    }
}

impl<F: BFloat> Div<F> for &Vec3<F> {
    type Output = Vec3<F>;
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, divisor: F) -> Self::Output {
        let factor = F::one() / divisor;
        self * factor
    }
}

impl<F: BFloat> Div<F> for Vec3<F> {
    type Output = Vec3<F>;
    fn div(self, divisor: F) -> Self::Output {
        &self / divisor
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Vec3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        fmt::Display::fmt(&self[X], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Y], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Z], f)?;
        f.write_str("]")
    }
}

impl<F: BFloat + fmt::LowerExp> fmt::LowerExp for Vec3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        fmt::LowerExp::fmt(&self[X], f)?;
        f.write_str(", ")?;
        fmt::LowerExp::fmt(&self[Y], f)?;
        f.write_str(", ")?;
        fmt::LowerExp::fmt(&self[Z], f)?;
        f.write_str("]")
    }
}

#[cfg(feature = "for-testing")]
impl<F> AbsDiffEq for Vec3<F>
where
    F: BFloat + AbsDiffEq,
    F::Epsilon: Copy,
{
    type Epsilon = <F as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        F::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        F::abs_diff_eq(&self[X], &other[X], epsilon)
            && F::abs_diff_eq(&self[Y], &other[Y], epsilon)
            && F::abs_diff_eq(&self[Z], &other[Z], epsilon)
    }
}

#[cfg(feature = "for-testing")]
impl<F> RelativeEq for Vec3<F>
where
    F: BFloat + RelativeEq,
    F::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        F::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        F::relative_eq(&self[X], &other[X], epsilon, max_relative)
            && F::relative_eq(&self[Y], &other[Y], epsilon, max_relative)
            && F::relative_eq(&self[Z], &other[Z], epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn cross_product_of_unit_vectors_is_right_handed() {
        let x_hat = Vec3::new(1.0, 0.0, 0.0);
        let y_hat = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x_hat.cross(&y_hat), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(y_hat.cross(&x_hat), Vec3::new(0.0, 0.0, -1.0));
        assert!(x_hat.cross(&x_hat).is_zero());
    }

    #[test]
    fn lengths_are_correct() {
        let v = Vec3::new(3.0, 4.0, 12.0);
        assert_eq!(v.squared_length(), 169.0);
        assert_eq!(v.length(), 13.0);
        assert_eq!(v.length_xy(), 5.0);
    }

    #[test]
    fn construction_from_short_slice_fails() {
        assert_eq!(Vec3::from_slice(&[1.0, 2.0]), None);
        assert_eq!(
            Vec3::from_slice(&[1.0, 2.0, 3.0]),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );
    }
}
