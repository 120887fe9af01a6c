//! # BONE binary encoder and decoder
//!
//! Encode and decode functions for BONE.
//!
//! # Example
//!
//! ```
//! use bone::prelude::*;
//!
//! let values = vec![Value::from(1), Value::from("one")];
//!
//! // encode into a fresh vector
//! let enc = encode(&values).unwrap();
//!
//! // or append to an existing one
//! let mut out = vec![0x21];
//! encode_into(&values, &mut out, NoExt).unwrap();
//! assert_eq!(out[1..], enc[..]);
//!
//! // decode everything at once...
//! assert_eq!(decode(&enc).unwrap(), values);
//!
//! // ...or a byte at a time
//! let mut dec = Decoder::new();
//! for b in &enc {
//!     dec.accept(*b).unwrap();
//! }
//! assert_eq!(dec.finish().unwrap(), values);
//! ```

pub mod de;
pub mod layout;
pub mod ser;

pub use de::{Decoder, ExtDecode};
pub use ser::ExtEncode;

use crate::{errors::Error, NoExt, Value};
use ser::Encoder;
use tracing::trace;

/// Encodes a sequence of values.
///
/// # Example
///
/// ```
/// use bone::prelude::*;
///
/// let enc = encode(&[Value::from(true), Value::from(false)]).unwrap();
/// assert_eq!(enc, vec![0x21, 0x20]);
///
/// // NaN has no encoding
/// assert!(encode(&[Value::from(std::f64::NAN)]).is_err());
/// ```
pub fn encode(values: &[Value]) -> Result<Vec<u8>, Error> { encode_with(values, NoExt) }

/// Encodes a sequence of values, lowering [`Value::Custom`]s with `ext`.
pub fn encode_with<X, E: ExtEncode<X>>(values: &[Value<X>], ext: E) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    encode_into(values, &mut out, ext)?;
    Ok(out)
}

/// Appends the encoding of `values` to `out`.
///
/// On error, `out` is left as it was before the call.
pub fn encode_into<X, E: ExtEncode<X>>(values: &[Value<X>], out: &mut Vec<u8>, ext: E) -> Result<(), Error> {
    let start = out.len();
    let res = {
        let mut enc = Encoder::new(out, ext);
        values.iter().try_for_each(|v| enc.put(v))
    };
    if let Err(e) = &res {
        trace!(error = %e, "rejecting value");
        out.truncate(start);
    }
    res
}

/// Decodes a complete buffer.
///
/// # Example
///
/// ```
/// use bone::prelude::*;
///
/// let dec = decode(&[0x10, 0x90, b'h', b'i', 0x00]).unwrap();
/// assert_eq!(dec, vec![Value::from(0), Value::from("hi")]);
///
/// // the text is missing its terminator
/// assert!(decode(&[0x90, b'h', b'i']).is_err());
/// ```
pub fn decode<B: AsRef<[u8]>>(bytes: B) -> Result<Vec<Value>, Error> { decode_with(bytes, NoExt) }

/// Decodes a complete buffer, handing user-space extensions to `ext`.
pub fn decode_with<B: AsRef<[u8]>, X, F: ExtDecode<X>>(bytes: B, ext: F) -> Result<Vec<Value<X>>, Error> {
    let mut dec = Decoder::with_ext(ext);
    dec.accept_slice(bytes.as_ref())?;
    dec.finish()
}
