//! # BONE
//!
//! BONE (Binary Ordered Notation for Everything) is a self-describing binary encoding whose
//! byte order is the value order: comparing two encodings with `memcmp` gives the same answer
//! as comparing the values they encode. That makes encoded values directly usable as keys in
//! ordered byte stores.
//!
//! # Usage
//!
//! Values are built as [`Value`]s, encoded with [`encode`] and read back with [`decode`]:
//!
//! ```
//! use bone::prelude::*;
//!
//! let values = vec![Value::from(-3), Value::from("hello"), Value::list(vec![1.into(), 2.into()])];
//!
//! let bytes = encode(&values).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), values);
//! ```
//!
//! Byte order mirrors value order, and [`compare`] tells you that order without encoding:
//!
//! ```
//! use bone::prelude::*;
//! use std::cmp::Ordering;
//!
//! let a = Value::from(100);
//! let b = Value::from("100");
//!
//! // every integer sorts before every text
//! assert_eq!(compare(&a, &b), Ordering::Less);
//! assert!(encode(&[a]).unwrap() < encode(&[b]).unwrap());
//! ```
//!
//! The [`BoneRep`](rep::BoneRep) trait converts ordinary Rust types to and from [`Value`]:
//!
//! ```
//! use bone::prelude::*;
//!
//! let pair = (7u32, "seven".to_string());
//! let bytes = encode(&[pair.to_bone()]).unwrap();
//!
//! let back = <(u32, String)>::from_bone(decode(&bytes).unwrap().remove(0)).unwrap();
//! assert_eq!(back, pair);
//! ```
//!
//! ## Extensions
//!
//! Everything that is not an integer, boolean, float or text is an [`Extension`]: a code, a
//! level and either bytes or child values. Codes whose low nibble is `0xA..=0xF` are left to
//! applications. An application type `X` is carried as [`Value::Custom`] and lowered to, or
//! raised from, an extension by callbacks:
//!
//! ```
//! use bone::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq, Eq, Hash)]
//! struct Date(u64);
//!
//! fn lower(d: &Date) -> Result<Extension<Date>, Error> {
//!     Ok(Extension::values(0xAA, vec![Value::from(d.0)]))
//! }
//!
//! fn raise(ext: Extension<Date>) -> Result<Value<Date>, Error> {
//!     if ext.code != 0xAA || ext.level != 0 {
//!         return Ok(Value::Extension(ext));
//!     }
//!     match ext.as_values() {
//!         Some([Value::Integer(ms)]) => ms
//!             .to_u64()
//!             .map(|ms| Value::Custom(Date(ms)))
//!             .ok_or_else(|| Error::callback("dates are never negative")),
//!         _ => Err(Error::callback("dates have exactly one integer child")),
//!     }
//! }
//!
//! let values = vec![Value::Custom(Date(1763154064328))];
//!
//! let bytes = encode_with(&values, lower).unwrap();
//! assert_eq!(bytes, vec![0xAA, 0x1D, 0x01, 0x9A, 0x84, 0x2B, 0xF3, 0xC8]);
//!
//! assert_eq!(decode_with(&bytes, raise).unwrap(), values);
//! ```
//!
//! # Format
//!
//! An encoding is a concatenation of values. Each value is an optional run of `0xFF` level
//! escapes, one code byte, and a payload whose extent the code determines. See
//! [`encoding::layout`] for the full table.
//!
//! ## Integers
//!
//! Integers with magnitude up to `2^64 - 1` are supported. `0..=7` live in the code byte
//! (`0x10..=0x17`). Larger positive values use codes `0x18..=0x1F` followed by 1 to 8
//! big-endian magnitude bytes. Negative values use `0x0F` down to `0x08` for 1 to 8 bytes and
//! store the bitwise complement of the magnitude, so that larger magnitudes sort lower.
//! Integers always use their shortest form.
//!
//! | Value      | Encoding               |
//! | ---        | ---                    |
//! | `0`        | `10`                   |
//! | `8`        | `18 08`                |
//! | `256`      | `19 01 00`             |
//! | `-1`       | `0f fe`                |
//!
//! ## Booleans and floats
//!
//! `false` is `0x20` and `true` is `0x21`. Floats are `0x70` followed by eight bytes: the
//! IEEE-754 bits with the sign bit set for non-negative values, or all bits complemented for
//! negative ones. NaN cannot be encoded.
//!
//! ## Text and blobs
//!
//! Text is `0x90` followed by its UTF-8 bytes and a `0x00` terminator. Every `0x00` inside
//! the payload is written as `00 01`. Other blob codes (`0x91..=0x9F`) use the same framing
//! for arbitrary bytes.
//!
//! ## Blocks, tuples and lists
//!
//! Blocks (`0x20..=0x8F`) carry exactly 0, 1, 2, 3, 4, 8 or 16 raw bytes. Tuples
//! (`0xA0..=0xEF`) carry exactly 1, 2, 3, 4 or 8 child values. Lists (`0xF0..=0xFE`) carry
//! child values up to a `0x00` terminator.
//!
//! ## Levels
//!
//! Each `0xFF` in front of a code raises its level by one, which opens up a fresh copy of
//! the extension codes. Only codes from `0x20` up may carry a level, and built-in types only
//! exist at level 0.

#![warn(
//    missing_docs,
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_copy_implementations,
    missing_debug_implementations,
    macro_use_extern_crate,
    unreachable_pub,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]

pub mod compare;
pub mod encoding;
pub mod float;
pub mod inum;
pub mod prelude;
pub mod rep;
pub mod util;

mod errors;

pub use compare::{compare, compare_with};
pub use encoding::{decode, decode_with, encode, encode_into, encode_with, ExtDecode, ExtEncode};
pub use errors::Error;
pub use float::Float;
pub use inum::Inum;

use bytes::Bytes;
use encoding::layout::{block_code, tuple_code, BLOB, LIST};
use num_bigint::BigInt;
use std::{cmp::Ordering, convert::Infallible, fmt, mem};

#[derive(Eq, PartialEq, Clone, Hash, Debug)]
/// A BONE value.
///
/// `X` is the type of application values carried in [`Value::Custom`]. It defaults to
/// [`Infallible`], in which case that variant cannot occur.
///
/// # Example
///
/// ```
/// use bone::prelude::*;
///
/// let b: Value = Value::Boolean(true);
///
/// let val = match b {
///     Value::Boolean(b) => b,
///     _ => panic!(),
/// };
///
/// assert!(val);
/// ```
pub enum Value<X = Infallible> {
    /// Integer with magnitude up to `2^64 - 1`.
    Integer(Inum),
    /// Boolean.
    Boolean(bool),
    /// Double-precision float.
    Float(Float),
    /// UTF-8 text.
    Text(String),
    /// Anything else the wire format can carry.
    ///
    /// # Example
    ///
    /// ```
    /// use bone::prelude::*;
    ///
    /// // an application-defined block of two bytes
    /// let e: Value = Value::Extension(Extension::bytes(0x4A, vec![0x12, 0x34]));
    /// ```
    Extension(Extension<X>),
    /// An application value, lowered to an [`Extension`] when encoded.
    Custom(X),
}

/// A value identified by its code and level rather than by a built-in type.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub struct Extension<X = Infallible> {
    /// The code byte.
    pub code: u8,
    /// The number of level escapes in front of the code.
    pub level: u64,
    /// The payload, which must fit the shape of the code.
    pub payload: Payload<X>,
}

/// The payload of an [`Extension`].
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub enum Payload<X = Infallible> {
    /// Raw bytes of a block or blob, without escapes.
    Bytes(Bytes),
    /// Children of a tuple or list.
    Values(Vec<Value<X>>),
}

impl<X> Payload<X> {
    /// The bytes, if the payload is made of bytes.
    pub fn into_bytes(self) -> Option<Bytes> { self.split().ok() }

    /// The child values, if the payload has them.
    pub fn into_values(self) -> Option<Vec<Value<X>>> { self.split().err() }

    /// Moves the contents out, leaving an empty payload behind for `drop`.
    pub(crate) fn split(mut self) -> Result<Bytes, Vec<Value<X>>> {
        match &mut self {
            Payload::Bytes(b) => Ok(mem::take(b)),
            Payload::Values(vs) => Err(mem::take(vs)),
        }
    }
}

/// Nested values are freed with a work list, so dropping does not grow the call stack with
/// the depth of the value.
impl<X> Drop for Payload<X> {
    fn drop(&mut self) {
        let mut pending = match self {
            Payload::Values(vs) if !vs.is_empty() => mem::take(vs),
            _ => return,
        };
        while let Some(v) = pending.pop() {
            if let Value::Extension(mut e) = v {
                if let Payload::Values(vs) = &mut e.payload {
                    pending.append(vs);
                }
            }
        }
    }
}

/// Extension callbacks for when there are no application values.
///
/// Encoding accepts it only for `Value<Infallible>`; decoding passes every extension through
/// unchanged.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoExt;

impl ExtEncode<Infallible> for NoExt {
    fn encode_ext(&mut self, value: &Infallible) -> Result<Extension<Infallible>, Error> { match *value {} }
}

impl<X> ExtDecode<X> for NoExt {
    fn decode_ext(&mut self, ext: Extension<X>) -> Result<Value<X>, Error> { Ok(Value::Extension(ext)) }
}

impl<X> Extension<X> {
    /// An extension at level 0 with a byte payload.
    pub fn bytes<B: Into<Bytes>>(code: u8, bytes: B) -> Self {
        Extension {
            code,
            level: 0,
            payload: Payload::Bytes(bytes.into()),
        }
    }

    /// An extension at level 0 with child values.
    pub fn values(code: u8, values: Vec<Value<X>>) -> Self {
        Extension {
            code,
            level: 0,
            payload: Payload::Values(values),
        }
    }

    /// The same extension at another level.
    ///
    /// # Example
    ///
    /// ```
    /// use bone::prelude::*;
    ///
    /// let e: Extension = Extension::bytes(0x22, vec![]).with_level(2);
    /// assert_eq!(encode(&[Value::Extension(e)]).unwrap(), vec![0xFF, 0xFF, 0x22]);
    /// ```
    pub fn with_level(self, level: u64) -> Self { Extension { level, ..self } }

    /// The byte payload, if it is one.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.payload {
            Payload::Bytes(b) => Some(b),
            Payload::Values(_) => None,
        }
    }

    /// The child values, if the payload has them.
    pub fn as_values(&self) -> Option<&[Value<X>]> {
        match &self.payload {
            Payload::Values(vs) => Some(vs),
            Payload::Bytes(_) => None,
        }
    }
}

impl<X> Value<X> {
    /// A blob of arbitrary bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use bone::prelude::*;
    ///
    /// let b: Value = Value::blob(vec![1, 0, 2]);
    /// assert_eq!(encode(&[b]).unwrap(), vec![0x91, 1, 0, 1, 2, 0]);
    /// ```
    pub fn blob<B: Into<Bytes>>(bytes: B) -> Self { Value::Extension(Extension::bytes(BLOB, bytes)) }

    /// A list of any length.
    pub fn list(values: Vec<Value<X>>) -> Self { Value::Extension(Extension::values(LIST, values)) }

    /// A tuple of 1, 2, 3, 4 or 8 values.
    ///
    /// # Example
    ///
    /// ```
    /// use bone::prelude::*;
    ///
    /// let t: Value = Value::tuple(vec![true.into(), 3.into()]).unwrap();
    /// assert_eq!(encode(&[t]).unwrap(), vec![0xB0, 0x21, 0x13]);
    ///
    /// assert!(Value::<std::convert::Infallible>::tuple(vec![]).is_err());
    /// ```
    pub fn tuple(values: Vec<Value<X>>) -> Result<Self, Error> {
        match tuple_code(values.len()) {
            Some(code) => Ok(Value::Extension(Extension::values(code, values))),
            None => Err(Error::shape(LIST, format!("no tuple holds {} values", values.len()))),
        }
    }

    /// A block of exactly 1, 2, 3, 4, 8 or 16 raw bytes.
    pub fn block<B: Into<Bytes>>(bytes: B) -> Result<Self, Error> {
        let bytes = bytes.into();
        match block_code(bytes.len()) {
            Some(code) => Ok(Value::Extension(Extension::bytes(code, bytes))),
            None => Err(Error::shape(BLOB, format!("no block holds {} bytes", bytes.len()))),
        }
    }

    /// Returns the boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    pub fn as_inum(&self) -> Option<&Inum> {
        match self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the integer as an `i64`, if this is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> { self.as_inum().and_then(Inum::to_i64) }

    /// Returns the integer as a `u64`, if this is an integer that fits.
    pub fn as_u64(&self) -> Option<u64> { self.as_inum().and_then(Inum::to_u64) }

    /// Returns the float, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f.to_f64()),
            _ => None,
        }
    }

    /// Returns the text, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the extension, if this is one.
    pub fn as_extension(&self) -> Option<&Extension<X>> {
        match self {
            Value::Extension(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the byte payload of an extension (a block or a blob).
    pub fn as_bytes(&self) -> Option<&Bytes> { self.as_extension().and_then(Extension::as_bytes) }

    /// Returns the children of an extension (a tuple or a list).
    ///
    /// # Example
    ///
    /// ```
    /// use bone::prelude::*;
    ///
    /// let l: Value = Value::list(vec![1.into(), 2.into()]);
    /// assert_eq!(l.as_values().unwrap().len(), 2);
    /// ```
    pub fn as_values(&self) -> Option<&[Value<X>]> { self.as_extension().and_then(Extension::as_values) }

    /// Returns the application value, if this is one.
    pub fn as_custom(&self) -> Option<&X> {
        match self {
            Value::Custom(x) => Some(x),
            _ => None,
        }
    }

    /// Indicates whether the value is an integer.
    pub fn is_integer(&self) -> bool { self.as_inum().is_some() }

    /// Indicates whether the value is a boolean.
    pub fn is_bool(&self) -> bool { self.as_bool().is_some() }

    /// Indicates whether the value is a float.
    pub fn is_float(&self) -> bool { self.as_f64().is_some() }

    /// Indicates whether the value is text.
    pub fn is_text(&self) -> bool { self.as_str().is_some() }

    /// Indicates whether the value is an extension.
    pub fn is_extension(&self) -> bool { self.as_extension().is_some() }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> { Some(self.cmp(other)) }
}

/// The order of the encodings.
impl Ord for Value {
    fn cmp(&self, other: &Value) -> Ordering { compare(self, other) }
}

fn fmt_bytes(bytes: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("<")?;
    for b in bytes {
        write!(f, "{:02x}", b)?;
    }
    f.write_str(">")
}

impl<X: fmt::Display> fmt::Display for Value<X> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Extension(e) => write!(f, "{}", e),
            Value::Custom(x) => write!(f, "{}", x),
        }
    }
}

impl<X: fmt::Display> fmt::Display for Extension<X> {
    /// Formats as `^level:` (when nonzero), the code in hex, then the payload.
    ///
    /// # Example
    ///
    /// ```
    /// use bone::prelude::*;
    ///
    /// let v: Value = Value::list(vec![Value::from(1), Value::from("a"), Value::blob(vec![0xAB])]);
    /// assert_eq!(v.to_string(), r#"0xf0[1, "a", 0x91<ab>]"#);
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.level > 0 {
            write!(f, "^{}:", self.level)?;
        }
        write!(f, "{:#04x}", self.code)?;
        match &self.payload {
            Payload::Bytes(b) => fmt_bytes(b, f),
            Payload::Values(vs) => {
                f.write_str("[")?;
                for (i, v) in vs.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Implements `From` for `Value<X>` by way of one of its variants.
macro_rules! value_from {
    ($variant:ident, $mid:ty, $($from:ty),*) => {
        $(
            impl<X> From<$from> for Value<X> {
                fn from(f: $from) -> Self { Value::$variant(<$mid>::from(f)) }
            }
        )*
    };
}

// Integers
value_from!(Integer, Inum, Inum, BigInt, isize, usize, i64, u64, i128, u128, i32, u32, i16, u16, i8, u8);

// Floats
value_from!(Float, float::Float, float::Float, f64, f32);

value_from!(Boolean, bool, bool);
value_from!(Text, String, String, &str);

impl<X> From<Extension<X>> for Value<X> {
    fn from(e: Extension<X>) -> Self { Value::Extension(e) }
}
