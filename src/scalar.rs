//! Scalar trait for the numeric domains a store can hold
//!
//! Every store is generic over a `Scalar` element type. Three domains are
//! supported out of the box: `f32`, `f64` and `Complex64`. The trait
//! deliberately stays small: enough arithmetic to run the multiply kernels,
//! an f64 round trip for the primitive fast path, and the conjugation hook
//! the Hermitian views need.

use num_complex::Complex64;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Shared tolerance below which a stored sparse value counts as zero
///
/// Any mutation that leaves a sparse entry's magnitude at or below this
/// bound evicts the entry instead of retaining it.
pub const ZERO_TOLERANCE: f64 = 1e-14;

/// Trait for types that can be elements of a store
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - basic requirements for parallel kernels
/// - Arithmetic operators with `Output = Self`, plus the assign forms
/// - `Neg` - every supported domain is signed
/// - `PartialEq` - needed by the generic nonzero scan
pub trait Scalar:
    Copy
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + PartialEq
    + fmt::Debug
{
    /// The additive identity
    const ZERO: Self;

    /// The multiplicative identity
    const ONE: Self;

    /// Convert to f64 for the primitive fast path
    ///
    /// For real domains this is the value itself. For `Complex64` it is the
    /// real part, so `value_f64` stays an additive homomorphism and agrees
    /// with `get` on every real-valued complex store.
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type
    ///
    /// For `Complex64` this creates a real number (imaginary part zero).
    fn from_f64(v: f64) -> Self;

    /// Complex conjugate; identity for real domains
    fn conjugate(self) -> Self;

    /// Magnitude, used by the zero-eviction rule
    fn magnitude(self) -> f64;

    /// True when the magnitude is within `tolerance` of zero
    #[inline]
    fn is_small(self, tolerance: f64) -> bool {
        self.magnitude() <= tolerance
    }
}

impl Scalar for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn conjugate(self) -> Self {
        self
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.abs()
    }
}

impl Scalar for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn conjugate(self) -> Self {
        self
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.abs() as f64
    }
}

impl Scalar for Complex64 {
    const ZERO: Self = Complex64::new(0.0, 0.0);
    const ONE: Self = Complex64::new(1.0, 0.0);

    #[inline]
    fn to_f64(self) -> f64 {
        self.re
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        Complex64::new(v, 0.0)
    }

    #[inline]
    fn conjugate(self) -> Self {
        self.conj()
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.norm()
    }
}
