//! Integers as BONE sees them.
//!
//! The wire format covers every integer whose magnitude fits in a `u64`, i.e. the range
//! `[-(2^64 - 1), 2^64 - 1]`. That does not fit in any single primitive, so [`Inum`] keeps
//! small values in an `i64` and falls back to a [`BigInt`] for the rest.

use crate::{errors::Error, from_as, from_fn};
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use std::{
    cmp::Ordering,
    convert::TryFrom,
    fmt,
    hash::{Hash, Hasher},
};

/// `Inum`s are either `i64` or `BigInt`s (i.e., big integers).
///
/// Equality, ordering and hashing are by mathematical value, so `I64(5)` and `Int(5)` are
/// the same number. The `From` conversions always produce the `I64` variant when the value
/// fits.
#[derive(Clone, Debug)]
pub enum Inum {
    I64(i64),
    Int(BigInt),
}

use Inum::*;

from_fn!(Inum, i64, I64);
from_fn!(Inum, u64, |u: u64| match i64::try_from(u) {
    Ok(i) => I64(i),
    Err(_) => Int(BigInt::from(u)),
});
from_fn!(Inum, i128, |i: i128| match i64::try_from(i) {
    Ok(i) => I64(i),
    Err(_) => Int(BigInt::from(i)),
});
from_fn!(Inum, u128, |u: u128| match i64::try_from(u) {
    Ok(i) => I64(i),
    Err(_) => Int(BigInt::from(u)),
});
from_fn!(Inum, BigInt, |i: BigInt| i.to_i64().map_or_else(|| Int(i), I64));

from_as!(Inum, isize, i64);
from_as!(Inum, usize, u64);

#[macro_export]
/// Implements `From` for the primitive integer types narrower than 64 bits.
macro_rules! from_prims {
    ($to:tt) => {
        $crate::from_as!($to, i32, i64);
        $crate::from_as!($to, i16, i64);
        $crate::from_as!($to, i8, i64);

        $crate::from_as!($to, u32, i64);
        $crate::from_as!($to, u16, i64);
        $crate::from_as!($to, u8, i64);
    };
}

from_prims!(Inum);

impl From<Inum> for BigInt {
    fn from(i: Inum) -> BigInt {
        match i {
            I64(i) => BigInt::from(i),
            Int(i) => i,
        }
    }
}

impl TryFrom<Inum> for i64 {
    type Error = Inum;

    fn try_from(n: Inum) -> Result<Self, Inum> { n.to_i64().ok_or(n) }
}

impl TryFrom<Inum> for u64 {
    type Error = Inum;

    fn try_from(n: Inum) -> Result<Self, Inum> { n.to_u64().ok_or(n) }
}

impl Inum {
    /// Produces an `i64` if the value fits, otherwise returns `None`.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            I64(i) => Some(*i),
            Int(i) => i.to_i64(),
        }
    }

    /// Produces a `u64` if the value is non-negative and fits, otherwise returns `None`.
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            I64(i) => u64::try_from(*i).ok(),
            Int(i) => i.to_u64(),
        }
    }

    /// Produces an `i128` if the value fits, otherwise returns `None`.
    ///
    /// Every value BONE can encode fits.
    pub fn to_i128(&self) -> Option<i128> {
        match self {
            I64(i) => Some(i128::from(*i)),
            Int(i) => i.to_i128(),
        }
    }

    /// Produces a `BigInt`.
    pub fn to_bigint(&self) -> BigInt {
        match self {
            I64(i) => BigInt::from(*i),
            Int(i) => i.clone(),
        }
    }

    /// Splits the value into a sign and a magnitude, failing if the magnitude does not fit
    /// in a `u64`.
    ///
    /// # Example
    ///
    /// ```
    /// use bone::Inum;
    ///
    /// assert_eq!(Inum::from(-3).sign_magnitude().unwrap(), (true, 3));
    /// assert_eq!(Inum::from(u64::max_value()).sign_magnitude().unwrap(), (false, u64::max_value()));
    /// ```
    pub fn sign_magnitude(&self) -> Result<(bool, u64), Error> {
        match self {
            I64(i) => Ok((*i < 0, i.unsigned_abs())),
            Int(i) => match i.magnitude().to_u64() {
                Some(m) => Ok((i.sign() == Sign::Minus, m)),
                None => Err(Error::IntegerOutOfRange { value: i.clone() }),
            },
        }
    }

    /// Rebuilds an integer from a sign and a magnitude.
    pub fn from_sign_magnitude(negative: bool, magnitude: u64) -> Inum {
        if negative {
            Inum::from(-i128::from(magnitude))
        } else {
            Inum::from(magnitude)
        }
    }
}

impl PartialEq for Inum {
    fn eq(&self, other: &Inum) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for Inum {}

impl PartialOrd for Inum {
    fn partial_cmp(&self, other: &Inum) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Inum {
    fn cmp(&self, other: &Inum) -> Ordering {
        match (self, other) {
            (I64(a), I64(b)) => a.cmp(b),
            _ => self.to_bigint().cmp(&other.to_bigint()),
        }
    }
}

impl Hash for Inum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.to_i64() {
            Some(i) => i.hash(state),
            None => self.to_bigint().hash(state),
        }
    }
}

impl PartialEq<i64> for Inum {
    fn eq(&self, other: &i64) -> bool { self.to_i64() == Some(*other) }
}

impl PartialOrd<i64> for Inum {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.cmp(&I64(*other)))
    }
}

impl fmt::Display for Inum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            I64(i) => write!(f, "{}", i),
            Int(i) => write!(f, "{}", i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(i: &Inum) -> u64 {
        let mut h = DefaultHasher::new();
        i.hash(&mut h);
        h.finish()
    }

    #[test]
    fn variants_agree() {
        let small = I64(5);
        let big = Int(BigInt::from(5));
        assert_eq!(small, big);
        assert_eq!(hash_of(&small), hash_of(&big));
        assert!(Int(BigInt::from(-5)) < small);
    }

    #[test]
    fn canonical_from() {
        match Inum::from(u64::max_value()) {
            Int(_) => {}
            I64(_) => panic!("u64::MAX does not fit in an i64"),
        }
        match Inum::from(BigInt::from(7)) {
            I64(7) => {}
            other => panic!("expected I64(7), got {:?}", other),
        }
    }

    #[test]
    fn magnitude_limits() {
        let max = Inum::from(u64::max_value());
        assert_eq!(max.sign_magnitude().unwrap(), (false, u64::max_value()));

        let min = Inum::from(-i128::from(u64::max_value()));
        assert_eq!(min.sign_magnitude().unwrap(), (true, u64::max_value()));

        let too_big = Inum::from(BigInt::from(u64::max_value()) + 1);
        match too_big.sign_magnitude() {
            Err(Error::IntegerOutOfRange { .. }) => {}
            other => panic!("expected IntegerOutOfRange, got {:?}", other),
        }

        assert_eq!(Inum::from(i64::min_value()).sign_magnitude().unwrap(), (true, 1 << 63));
    }

    #[test]
    fn sign_magnitude_inverse() {
        for n in &[0i128, 1, -1, 255, -256, i128::from(u64::max_value()), -i128::from(u64::max_value())] {
            let i = Inum::from(*n);
            let (neg, mag) = i.sign_magnitude().unwrap();
            assert_eq!(Inum::from_sign_magnitude(neg, mag), i);
        }
    }
}
