use crate::errors::Error;
use std::{cmp::Ordering, convert::TryFrom, fmt};

const SIGN_BIT: u64 = 1 << 63;

/// A double-precision float, stored as its IEEE-754 bit pattern.
///
/// Storing the bits lets [`Value`](crate::Value) be `Eq` and `Hash`. Two floats are equal
/// exactly when their bits are, so `-0.0` and `0.0` are different values (and encode
/// differently). NaN can be stored but is rejected by the encoder.
#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug)]
pub struct Float(u64);

impl Float {
    /// The IEEE-754 bit pattern.
    pub fn to_bits(self) -> u64 { self.0 }

    /// Builds a float from an IEEE-754 bit pattern.
    pub fn from_bits(bits: u64) -> Float { Float(bits) }

    /// The value as an `f64`.
    pub fn to_f64(self) -> f64 { f64::from_bits(self.0) }

    /// Whether this float is NaN.
    pub fn is_nan(self) -> bool { self.to_f64().is_nan() }

    /// Maps the float onto eight bytes whose unsigned order is the float's numeric order.
    ///
    /// Non-negative values get their sign bit set; negative values are complemented.
    ///
    /// # Example
    ///
    /// ```
    /// use bone::Float;
    ///
    /// let neg = Float::from(-1.5).to_ordered_bytes().unwrap();
    /// let pos = Float::from(1.5).to_ordered_bytes().unwrap();
    /// assert!(neg < pos);
    /// ```
    pub fn to_ordered_bytes(self) -> Result<[u8; 8], Error> {
        if self.is_nan() {
            return Err(Error::InvalidFloat);
        }
        let bits = if self.0 & SIGN_BIT == 0 {
            self.0 | SIGN_BIT
        } else {
            !self.0
        };
        Ok(bits.to_be_bytes())
    }

    /// Inverse of [`Float::to_ordered_bytes`].
    pub fn from_ordered_bytes(bytes: [u8; 8]) -> Result<Float, Error> {
        let bits = u64::from_be_bytes(bytes);
        let bits = if bits & SIGN_BIT != 0 {
            bits & !SIGN_BIT
        } else {
            !bits
        };
        let f = Float(bits);
        if f.is_nan() {
            Err(Error::InvalidFloat)
        } else {
            Ok(f)
        }
    }
}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Float) -> Option<Ordering> { Some(self.cmp(other)) }
}

/// IEEE-754 total order, which is also the order of the encoded bytes.
impl Ord for Float {
    fn cmp(&self, other: &Float) -> Ordering { self.to_f64().total_cmp(&other.to_f64()) }
}

impl From<f64> for Float {
    fn from(f: f64) -> Float { Float(f.to_bits()) }
}

impl From<f32> for Float {
    fn from(f: f32) -> Float { Float::from(f64::from(f)) }
}

impl From<Float> for f64 {
    fn from(f: Float) -> f64 { f.to_f64() }
}

impl TryFrom<Float> for f32 {
    type Error = Float;

    /// Succeeds only when the conversion is exact.
    fn try_from(f: Float) -> Result<Self, Float> {
        let narrowed = f.to_f64() as f32;
        if f64::from(narrowed).to_bits() == f.0 {
            Ok(narrowed)
        } else {
            Err(f)
        }
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{:?}", self.to_f64()) }
}
