//! Fixed-size 2x2 matrices.
//!
//! The transition model only ever needs 2x2 products and powers, so this keeps the
//! arithmetic explicit instead of pulling in a dense linear algebra crate.

use crate::traits::Scalar;
use std::ops::Mul;

/// A 2x2 matrix stored in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2<T: Scalar> {
    pub rows: [[T; 2]; 2],
}

impl<T: Scalar> Matrix2<T> {
    pub fn new(a: T, b: T, c: T, d: T) -> Self {
        Self {
            rows: [[a, b], [c, d]],
        }
    }

    pub fn identity() -> Self {
        Self::new(T::one(), T::zero(), T::zero(), T::one())
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.rows[row][col]
    }

    pub fn multiply(&self, other: &Self) -> Self {
        let a = &self.rows;
        let b = &other.rows;
        Self::new(
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        )
    }

    /// Raises the matrix to a non-negative integer power by repeated squaring.
    ///
    /// `pow(0)` is the identity, so applying it leaves any state untouched.
    pub fn pow(&self, exponent: u32) -> Self {
        let mut result = Self::identity();
        let mut base = *self;
        let mut remaining = exponent;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.multiply(&base);
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.multiply(&base);
            }
        }
        result
    }

    /// Computes the row-vector product `v * M`.
    pub fn left_apply(&self, v: [T; 2]) -> [T; 2] {
        let m = &self.rows;
        [
            v[0] * m[0][0] + v[1] * m[1][0],
            v[0] * m[0][1] + v[1] * m[1][1],
        ]
    }

    pub fn row_sums(&self) -> [T; 2] {
        [
            self.rows[0][0] + self.rows[0][1],
            self.rows[1][0] + self.rows[1][1],
        ]
    }

    /// True when every entry is non-negative and each row sums to one within `tolerance`.
    pub fn is_row_stochastic(&self, tolerance: T) -> bool {
        let non_negative = self.rows.iter().flatten().all(|v| *v >= T::zero());
        non_negative
            && self
                .row_sums()
                .iter()
                .all(|sum| (*sum - T::one()).abs() <= tolerance)
    }
}

impl<T: Scalar> Mul for Matrix2<T> {
    type Output = Matrix2<T>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}
