use super::layout::*;
use crate::{
    errors::Error,
    float::Float,
    inum::Inum,
    util::u64_to_digits,
    Extension, Payload, Value,
};
use std::{slice, vec};

/// Turns application values into extensions while encoding.
///
/// The encoder calls this for every [`Value::Custom`] it meets. The returned extension must
/// use a code in user-extension space; its children may themselves be custom values.
///
/// Closures of type `FnMut(&X) -> Result<Extension<X>, Error>` implement this trait.
pub trait ExtEncode<X> {
    /// Lowers `value` to an extension.
    fn encode_ext(&mut self, value: &X) -> Result<Extension<X>, Error>;
}

impl<X, F> ExtEncode<X> for F
where
    F: FnMut(&X) -> Result<Extension<X>, Error>,
{
    fn encode_ext(&mut self, value: &X) -> Result<Extension<X>, Error> { self(value) }
}

/// A value either borrowed from the input or produced by a callback.
pub(crate) enum Item<'a, X> {
    Ref(&'a Value<X>),
    Own(Value<X>),
}

/// The remaining children of a tuple or list.
pub(crate) enum Children<'a, X> {
    Borrowed(slice::Iter<'a, Value<X>>),
    Owned(vec::IntoIter<Value<X>>),
}

impl<'a, X> Children<'a, X> {
    pub(crate) fn len(&self) -> usize {
        match self {
            Children::Borrowed(it) => it.len(),
            Children::Owned(it) => it.len(),
        }
    }

    pub(crate) fn next(&mut self) -> Option<Item<'a, X>> {
        match self {
            Children::Borrowed(it) => it.next().map(Item::Ref),
            Children::Owned(it) => it.next().map(Item::Own),
        }
    }
}

/// Lowers an application value, checking that the callback stayed in user-extension space.
pub(crate) fn lower<X, E: ExtEncode<X>>(ext: &mut E, x: &X) -> Result<Extension<X>, Error> {
    let e = ext.encode_ext(x)?;
    if is_user_code(e.code) {
        Ok(e)
    } else {
        Err(Error::ExtensionCodeOutOfRange { code: e.code })
    }
}

enum Body<'b, 'a, X> {
    Bytes(&'b [u8]),
    Children(Children<'a, X>),
}

impl<'a, X> Body<'a, 'a, X> {
    fn of(payload: &'a Payload<X>) -> Self {
        match payload {
            Payload::Bytes(b) => Body::Bytes(b),
            Payload::Values(vs) => Body::Children(Children::Borrowed(vs.iter())),
        }
    }
}

struct Frame<'a, X> {
    children: Children<'a, X>,
    /// Lists end with a terminator, tuples don't.
    terminated: bool,
}

/// Depth-first encoder with an explicit stack, so nesting depth is bounded by memory
/// rather than by the call stack.
pub(crate) struct Encoder<'a, 'o, X, E> {
    out: &'o mut Vec<u8>,
    stack: Vec<Frame<'a, X>>,
    ext: E,
}

impl<'a, 'o, X, E: ExtEncode<X>> Encoder<'a, 'o, X, E> {
    pub(crate) fn new(out: &'o mut Vec<u8>, ext: E) -> Self {
        Encoder {
            out,
            stack: Vec::new(),
            ext,
        }
    }

    /// Writes one top-level value, including all of its descendants.
    pub(crate) fn put(&mut self, value: &'a Value<X>) -> Result<(), Error> {
        self.put_item(Item::Ref(value))?;
        while let Some(frame) = self.stack.last_mut() {
            match frame.children.next() {
                Some(child) => self.put_item(child)?,
                None => {
                    let terminated = frame.terminated;
                    self.stack.pop();
                    if terminated {
                        self.out.push(TERMINATOR);
                    }
                }
            }
        }
        Ok(())
    }

    fn put_item(&mut self, item: Item<'a, X>) -> Result<(), Error> {
        match item {
            Item::Ref(v) => match v {
                Value::Integer(i) => self.put_int(i),
                Value::Boolean(b) => self.put_bool(*b),
                Value::Float(f) => self.put_float(*f),
                Value::Text(s) => self.put_text(s),
                Value::Extension(e) => self.put_ext(e.code, e.level, Body::of(&e.payload)),
                Value::Custom(x) => {
                    let e = self.lower(x)?;
                    self.put_owned_ext(e)
                }
            },
            Item::Own(v) => match v {
                Value::Integer(i) => self.put_int(&i),
                Value::Boolean(b) => self.put_bool(b),
                Value::Float(f) => self.put_float(f),
                Value::Text(s) => self.put_text(&s),
                Value::Extension(e) => self.put_owned_ext(e),
                Value::Custom(x) => {
                    let e = self.lower(&x)?;
                    self.put_owned_ext(e)
                }
            },
        }
    }

    fn put_int(&mut self, i: &Inum) -> Result<(), Error> {
        let (negative, magnitude) = i.sign_magnitude()?;
        if !negative && magnitude <= MAX_SMALL_INT {
            self.out.push(ZERO + magnitude as u8);
            return Ok(());
        }
        let digs = u64_to_digits(magnitude);
        if negative {
            self.out.push(neg_int_code(digs.len()));
            self.out.extend(digs.iter().map(|d| !d));
        } else {
            self.out.push(pos_int_code(digs.len()));
            self.out.extend_from_slice(&digs);
        }
        Ok(())
    }

    fn put_bool(&mut self, b: bool) -> Result<(), Error> {
        self.out.push(if b { TRUE } else { FALSE });
        Ok(())
    }

    fn put_float(&mut self, f: Float) -> Result<(), Error> {
        let bytes = f.to_ordered_bytes()?;
        self.out.push(FLOAT64);
        self.out.extend_from_slice(&bytes);
        Ok(())
    }

    fn put_text(&mut self, s: &str) -> Result<(), Error> {
        self.out.push(TEXT);
        self.put_escaped(s.as_bytes());
        Ok(())
    }

    /// Writes `bytes` with every `0x00` followed by `0x01`, then the terminator.
    fn put_escaped(&mut self, bytes: &[u8]) {
        for chunk in bytes.split_inclusive(|b| *b == TERMINATOR) {
            self.out.extend_from_slice(chunk);
            if chunk.last() == Some(&TERMINATOR) {
                self.out.push(ESCAPE);
            }
        }
        self.out.push(TERMINATOR);
    }

    fn lower(&mut self, x: &X) -> Result<Extension<X>, Error> { lower(&mut self.ext, x) }

    fn put_owned_ext(&mut self, e: Extension<X>) -> Result<(), Error> {
        let Extension {
            code,
            level,
            payload,
        } = e;
        match payload.split() {
            Ok(b) => self.put_ext(code, level, Body::Bytes(&b)),
            Err(vs) => self.put_ext(code, level, Body::Children(Children::Owned(vs.into_iter()))),
        }
    }

    fn put_ext(&mut self, code: u8, level: u64, body: Body<'_, 'a, X>) -> Result<(), Error> {
        let shape = match shape(code) {
            Some(shape) if is_legal_leading(level, code) => shape,
            _ => {
                return Err(Error::IllegalLeadingCode {
                    code,
                    level,
                    offset: 0,
                })
            }
        };
        if is_builtin(level, code) {
            return Err(Error::BuiltinCode { code });
        }

        let frame = match (shape, body) {
            (Shape::Block(len), Body::Bytes(b)) if b.len() == len => {
                self.put_header(code, level)?;
                self.out.extend_from_slice(b);
                None
            }
            (Shape::Blob, Body::Bytes(b)) => {
                self.put_header(code, level)?;
                self.put_escaped(b);
                None
            }
            (Shape::Tuple(arity), Body::Children(c)) if c.len() == arity => Some(Frame {
                children: c,
                terminated: false,
            }),
            (Shape::List, Body::Children(c)) => Some(Frame {
                children: c,
                terminated: true,
            }),
            (Shape::Block(len), Body::Bytes(b)) => {
                return Err(Error::shape(code, format!("expected {} bytes, found {}", len, b.len())))
            }
            (Shape::Tuple(arity), Body::Children(c)) => {
                return Err(Error::shape(code, format!("expected {} values, found {}", arity, c.len())))
            }
            (_, Body::Bytes(_)) => return Err(Error::shape(code, "expected values, found bytes")),
            (_, Body::Children(_)) => return Err(Error::shape(code, "expected bytes, found values")),
        };

        if let Some(frame) = frame {
            self.put_header(code, level)?;
            self.stack.push(frame);
        }
        Ok(())
    }

    fn put_header(&mut self, code: u8, level: u64) -> Result<(), Error> {
        let too_large = Error::LevelTooLarge { level };
        let escapes = usize::try_from(level).map_err(|_| too_large.clone())?;
        let needed = escapes.checked_add(1).ok_or_else(|| too_large.clone())?;
        self.out.try_reserve(needed).map_err(|_| too_large)?;
        let len = self.out.len() + escapes;
        self.out.resize(len, LEVEL_ESCAPE);
        self.out.push(code);
        Ok(())
    }
}
