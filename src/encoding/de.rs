use super::layout::*;
use crate::{
    errors::Error,
    float::Float,
    inum::Inum,
    util::digits_to_u64,
    Extension, NoExt, Payload, Value,
};
use bytes::{Buf, Bytes};
use smallvec::SmallVec;
use std::{convert::Infallible, mem};
use tracing::trace;

/// Interprets user-space extensions while decoding.
///
/// The decoder calls this for every extension whose code is in user-extension space. It may
/// return a [`Value::Custom`], any other value, or the extension unchanged.
///
/// Closures of type `FnMut(Extension<X>) -> Result<Value<X>, Error>` implement this trait.
pub trait ExtDecode<X> {
    /// Interprets `ext`.
    fn decode_ext(&mut self, ext: Extension<X>) -> Result<Value<X>, Error>;
}

impl<X, F> ExtDecode<X> for F
where
    F: FnMut(Extension<X>) -> Result<Value<X>, Error>,
{
    fn decode_ext(&mut self, ext: Extension<X>) -> Result<Value<X>, Error> { self(ext) }
}

/// A value whose bytes have started arriving but which isn't complete yet.
#[derive(Debug)]
enum Partial<X> {
    Block {
        code: u8,
        level: u64,
        bytes: Vec<u8>,
        len: usize,
    },
    Blob {
        code: u8,
        level: u64,
        bytes: Vec<u8>,
        /// The last byte was a `0x00` that may turn out to be the terminator.
        zero: bool,
    },
    Tuple {
        code: u8,
        level: u64,
        values: Vec<Value<X>>,
        arity: usize,
    },
    List {
        code: u8,
        level: u64,
        values: Vec<Value<X>>,
    },
}

/// Push-based BONE decoder.
///
/// Feed it one byte at a time with [`Decoder::accept`] (or a slice/buffer at a time), then
/// call [`Decoder::finish`]. The decoder keeps a stack of partially decoded values instead of
/// recursing, and never needs to look more than one byte ahead.
///
/// Once any call has failed, the decoder keeps returning that error.
///
/// # Example
///
/// ```
/// use bone::{encoding::Decoder, Value};
///
/// let mut dec = Decoder::new();
/// for b in &[0x21, 0x90, b'h', b'i', 0x00] {
///     dec.accept(*b).unwrap();
/// }
///
/// // `true` is done, but the text might still be followed by an escaped NUL
/// assert_eq!(dec.take_ready(), vec![Value::Boolean(true)]);
/// assert_eq!(dec.finish().unwrap(), vec![Value::from("hi")]);
/// ```
#[derive(Debug)]
pub struct Decoder<X = Infallible, F = NoExt> {
    /// Level escapes seen since the last code.
    level: u64,
    stack: Vec<Partial<X>>,
    ready: Vec<Value<X>>,
    ext: F,
    /// Offset of the next byte.
    offset: usize,
    failed: Option<Error>,
}

impl Decoder {
    /// Creates a decoder that passes every extension through unchanged.
    pub fn new() -> Self { Decoder::with_ext(NoExt) }
}

impl Default for Decoder {
    fn default() -> Self { Decoder::new() }
}

impl<X, F: ExtDecode<X>> Decoder<X, F> {
    /// Creates a decoder that hands user-space extensions to `ext`.
    pub fn with_ext(ext: F) -> Self {
        Decoder {
            level: 0,
            stack: Vec::new(),
            ready: Vec::new(),
            ext,
            offset: 0,
            failed: None,
        }
    }

    /// Consumes one byte.
    pub fn accept(&mut self, byte: u8) -> Result<(), Error> {
        if let Some(e) = &self.failed {
            return Err(e.clone());
        }
        let res = self.step(byte);
        self.offset += 1;
        res.map_err(|e| self.fail(e))
    }

    /// Consumes a slice of bytes.
    pub fn accept_slice(&mut self, bytes: &[u8]) -> Result<(), Error> {
        for b in bytes {
            self.accept(*b)?;
        }
        Ok(())
    }

    /// Consumes everything remaining in `buf`.
    pub fn accept_buf<B: Buf>(&mut self, mut buf: B) -> Result<(), Error> {
        while buf.has_remaining() {
            let chunk = buf.chunk();
            let n = chunk.len();
            self.accept_slice(chunk)?;
            buf.advance(n);
        }
        Ok(())
    }

    /// Takes the top-level values completed so far.
    pub fn take_ready(&mut self) -> Vec<Value<X>> { mem::take(&mut self.ready) }

    /// Whether the decoder is between top-level values.
    pub fn is_idle(&self) -> bool { self.stack.is_empty() && self.level == 0 }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> usize { self.offset }

    /// Signals the end of input and returns every top-level value not yet taken.
    pub fn finish(mut self) -> Result<Vec<Value<X>>, Error> {
        if let Some(e) = self.failed {
            return Err(e);
        }
        // a blob's last byte is only known to be its terminator once nothing follows it
        if let Some(Partial::Blob { zero: true, .. }) = self.stack.last() {
            if let Err(e) = self.complete() {
                return Err(self.fail(e));
            }
        }
        if !self.is_idle() {
            let e = Error::TruncatedInput {
                offset: self.offset,
                open: self.stack.len(),
            };
            return Err(self.fail(e));
        }
        Ok(self.ready)
    }

    fn fail(&mut self, e: Error) -> Error {
        trace!(offset = self.offset, error = %e, "aborting decode");
        self.failed = Some(e.clone());
        e
    }

    fn step(&mut self, byte: u8) -> Result<(), Error> {
        match self.stack.last_mut() {
            Some(Partial::Block { bytes, len, .. }) => {
                bytes.push(byte);
                if bytes.len() == *len {
                    self.complete()?;
                }
                return Ok(());
            }
            Some(Partial::Blob { bytes, zero, .. }) => {
                if *zero {
                    if byte == ESCAPE {
                        bytes.push(TERMINATOR);
                        *zero = false;
                        return Ok(());
                    }
                    // the pending zero was the terminator, and `byte` belongs to whatever
                    // comes next
                    self.complete()?;
                } else {
                    if byte == TERMINATOR {
                        *zero = true;
                    } else {
                        bytes.push(byte);
                    }
                    return Ok(());
                }
            }
            _ => {}
        }
        self.start(byte)
    }

    /// Handles a byte in a position where a new value (or a list terminator) may begin.
    fn start(&mut self, byte: u8) -> Result<(), Error> {
        if byte == LEVEL_ESCAPE {
            self.level = match self.level.checked_add(1) {
                Some(level) => level,
                None => return Err(self.illegal(byte)),
            };
            return Ok(());
        }

        if byte == TERMINATOR {
            if self.level == 0 {
                if let Some(Partial::List { .. }) = self.stack.last() {
                    return self.complete();
                }
            }
            return Err(self.illegal(byte));
        }

        let shape = match shape(byte) {
            Some(shape) if is_legal_leading(self.level, byte) => shape,
            _ => return Err(self.illegal(byte)),
        };

        let code = byte;
        let level = mem::replace(&mut self.level, 0);
        match shape {
            Shape::Block(len) => {
                self.stack.push(Partial::Block {
                    code,
                    level,
                    bytes: Vec::with_capacity(len),
                    len,
                });
                if len == 0 {
                    self.complete()?;
                }
            }
            Shape::Blob => self.stack.push(Partial::Blob {
                code,
                level,
                bytes: Vec::new(),
                zero: false,
            }),
            Shape::Tuple(arity) => self.stack.push(Partial::Tuple {
                code,
                level,
                values: Vec::with_capacity(arity),
                arity,
            }),
            Shape::List => self.stack.push(Partial::List {
                code,
                level,
                values: Vec::new(),
            }),
        }
        Ok(())
    }

    fn illegal(&self, code: u8) -> Error {
        Error::IllegalLeadingCode {
            code,
            level: self.level,
            offset: self.offset,
        }
    }

    /// Pops the (complete) top of the stack and appends it to its parent, repeating for
    /// every ancestor it completes in turn.
    fn complete(&mut self) -> Result<(), Error> {
        while let Some(partial) = self.stack.pop() {
            let value = self.build(partial)?;
            match self.stack.last_mut() {
                None => {
                    self.ready.push(value);
                    return Ok(());
                }
                Some(Partial::Tuple { values, arity, .. }) => {
                    values.push(value);
                    if values.len() < *arity {
                        return Ok(());
                    }
                }
                Some(Partial::List { values, .. }) => {
                    values.push(value);
                    return Ok(());
                }
                Some(Partial::Block { .. }) | Some(Partial::Blob { .. }) => {
                    unreachable!("byte payloads have no children")
                }
            }
        }
        Ok(())
    }

    fn build(&mut self, partial: Partial<X>) -> Result<Value<X>, Error> {
        let (code, level, payload) = match partial {
            Partial::Block {
                code,
                level: 0,
                bytes,
                ..
            } if is_int_code(code) => return self.build_int(code, &bytes).map(Value::Integer),
            Partial::Block {
                code: FALSE, level: 0, ..
            } => return Ok(Value::Boolean(false)),
            Partial::Block {
                code: TRUE, level: 0, ..
            } => return Ok(Value::Boolean(true)),
            Partial::Block {
                code: FLOAT64,
                level: 0,
                bytes,
                ..
            } => {
                let mut raw = [0; 8];
                raw.copy_from_slice(&bytes);
                return Float::from_ordered_bytes(raw).map(Value::Float);
            }
            Partial::Blob {
                code: TEXT,
                level: 0,
                bytes,
                ..
            } => {
                // blobs complete one byte after their terminator
                return String::from_utf8(bytes).map(Value::Text).map_err(|_| Error::InvalidUtf8 {
                    offset: self.offset - 1,
                })
            }
            Partial::Block {
                code, level, bytes, ..
            }
            | Partial::Blob {
                code, level, bytes, ..
            } => (code, level, Payload::Bytes(Bytes::from(bytes))),
            Partial::Tuple {
                code, level, values, ..
            }
            | Partial::List {
                code, level, values, ..
            } => (code, level, Payload::Values(values)),
        };

        let ext = Extension {
            code,
            level,
            payload,
        };
        if is_user_code(code) {
            self.ext.decode_ext(ext)
        } else {
            Ok(Value::Extension(ext))
        }
    }

    fn build_int(&self, code: u8, bytes: &[u8]) -> Result<Inum, Error> {
        if (ZERO..ZERO + 8).contains(&code) {
            return Ok(Inum::from(code - ZERO));
        }
        let negative = code < ZERO;
        let digits: SmallVec<[u8; 8]> = if negative {
            bytes.iter().map(|b| !b).collect()
        } else {
            SmallVec::from_slice(bytes)
        };
        let magnitude = digits_to_u64(&digits);
        let minimal = digits[0] != 0 && (negative || magnitude > MAX_SMALL_INT);
        if minimal {
            Ok(Inum::from_sign_magnitude(negative, magnitude))
        } else {
            Err(Error::NonCanonicalInteger {
                code,
                offset: self.offset,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(bytes: &[u8]) -> Result<Vec<Value>, Error> {
        let mut d = Decoder::new();
        d.accept_slice(bytes)?;
        d.finish()
    }

    #[test]
    fn zero_lookahead() {
        // blob terminator followed directly by the next value
        assert_eq!(
            feed(&[0x90, 0x00, 0x90, 0x00, 0x01, 0x00]).unwrap(),
            vec![Value::from(""), Value::from("\0")]
        );
        // blob terminator followed by the list terminator
        assert_eq!(
            feed(&[0xF0, 0x90, b'a', 0x00, 0x00]).unwrap(),
            vec![Value::list(vec![Value::from("a")])]
        );
        // blob terminator followed by a level escape
        let lvl = Extension::bytes(0x22, vec![]).with_level(1);
        assert_eq!(
            feed(&[0x90, 0x00, 0xFF, 0x22]).unwrap(),
            vec![Value::from(""), Value::Extension(lvl)]
        );
    }

    #[test]
    fn tuple_completes_ancestors() {
        // ((1)) as nested one-tuples, then a trailing `true`
        let out = feed(&[0xA0, 0xA0, 0x11, 0x21]).unwrap();
        let inner = Extension::values(0xA0, vec![Value::from(1)]);
        let outer = Extension::values(0xA0, vec![Value::Extension(inner)]);
        assert_eq!(out, vec![Value::Extension(outer), Value::Boolean(true)]);
    }

    #[test]
    fn ready_values_are_released_early() {
        let mut d = Decoder::new();
        d.accept_slice(&[0x11, 0xF0, 0x12]).unwrap();
        assert_eq!(d.take_ready(), vec![Value::from(1)]);
        assert!(!d.is_idle());
        d.accept(0x00).unwrap();
        assert!(d.is_idle());
        assert_eq!(d.finish().unwrap(), vec![Value::list(vec![Value::from(2)])]);
    }

    #[test]
    fn level_escape_rules() {
        match feed(&[0xFF, 0x10]) {
            Err(Error::IllegalLeadingCode { code: 0x10, level: 1, offset: 1 }) => {}
            other => panic!("expected IllegalLeadingCode, got {:?}", other),
        }
        match feed(&[0xF0, 0xFF, 0x00]) {
            Err(Error::IllegalLeadingCode { code: 0x00, level: 1, .. }) => {}
            other => panic!("expected IllegalLeadingCode, got {:?}", other),
        }
        match feed(&[0xFF, 0xFF]) {
            Err(Error::TruncatedInput { offset: 2, open: 0 }) => {}
            other => panic!("expected TruncatedInput, got {:?}", other),
        }
    }

    #[test]
    fn non_canonical_integers() {
        for bytes in &[&[0x18, 0x05][..], &[0x19, 0x00, 0xFF][..], &[0x0E, 0xFF, 0x00][..], &[0x0F, 0xFF][..]] {
            match feed(bytes) {
                Err(Error::NonCanonicalInteger { .. }) => {}
                other => panic!("expected NonCanonicalInteger for {:x?}, got {:?}", bytes, other),
            }
        }
    }

    #[test]
    fn poisoned_after_error() {
        let mut d = Decoder::new();
        let e = d.accept(0x03).unwrap_err();
        assert_eq!(d.accept(0x21), Err(e.clone()));
        assert_eq!(d.finish(), Err(e));
    }

    #[test]
    fn accepts_bufs() {
        let mut d = Decoder::new();
        let buf = Buf::chain(&[0x90, b'h'][..], &[b'i', 0x00][..]);
        d.accept_buf(buf).unwrap();
        assert_eq!(d.finish().unwrap(), vec![Value::from("hi")]);
    }

    #[test]
    fn deep_values_are_freed() {
        let depth = 200_000;
        let mut input = vec![LIST; depth];
        input.resize(2 * depth, TERMINATOR);
        let vs = feed(&input).unwrap();
        assert_eq!(vs.len(), 1);
        drop(vs);

        // finished values are thrown away along with the error
        input.push(0x01);
        assert!(feed(&input).is_err());
    }

    #[test]
    fn invalid_payloads() {
        assert_eq!(feed(&[0x90, 0xC3, 0x28, 0x00]), Err(Error::InvalidUtf8 { offset: 3 }));
        assert_eq!(
            feed(&[0x11, 0x90, 0xC3, 0x28, 0x00, 0x12]),
            Err(Error::InvalidUtf8 { offset: 4 })
        );
        assert_eq!(feed(&[0x70, 0, 0, 0, 0, 0, 0, 0, 0]), Err(Error::InvalidFloat));
    }
}
