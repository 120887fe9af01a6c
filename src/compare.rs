//! Comparing values in the order of their encodings.
//!
//! [`compare`] answers `encode(a) <=> encode(b)` without encoding anything. It walks both
//! values side by side with explicit stacks and stops at the first difference.
//!
//! # Example
//!
//! ```
//! use bone::prelude::*;
//! use std::cmp::Ordering;
//!
//! let mut values: Vec<Value> = vec![
//!     Value::from("b"),
//!     Value::from(true),
//!     Value::from(-10),
//!     Value::from(2.5),
//!     Value::from("a"),
//! ];
//! values.sort();
//!
//! assert_eq!(
//!     values,
//!     vec![
//!         Value::from(-10),
//!         Value::from(true),
//!         Value::from(2.5),
//!         Value::from("a"),
//!         Value::from("b"),
//!     ]
//! );
//!
//! let encoded: Vec<Vec<u8>> = values.iter().map(|v| encode(&[v.clone()]).unwrap()).collect();
//! assert!(encoded.windows(2).all(|w| w[0].cmp(&w[1]) == Ordering::Less));
//! ```

use crate::{
    encoding::{
        layout::{shape, Shape, FALSE, FLOAT64, TEXT, TRUE},
        ser::{lower, Children, Item},
        ExtEncode,
    },
    errors::Error,
    float::Float,
    inum::Inum,
    Extension, Payload, Value,
};
use std::{borrow::Cow, cmp::Ordering, convert::Infallible};

/// Compares two values in the order of their encodings.
///
/// Integers sort before booleans, and everything else sorts by level and then by code.
/// Within a type, integers and floats sort numerically, text and blobs by their bytes, and
/// tuples and lists element by element.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    let lower = |x: &Infallible| -> Result<Extension, Infallible> { match *x {} };
    match Walk::new(lower).run(a, b) {
        Ok(ord) => ord,
        Err(e) => match e {},
    }
}

/// Compares two values in the order of their encodings, lowering [`Value::Custom`]s with
/// `ext` first.
///
/// # Example
///
/// ```
/// use bone::prelude::*;
/// use std::cmp::Ordering;
///
/// // a custom type which encodes as a two-byte block
/// fn lower(x: &u16) -> Result<Extension<u16>, Error> {
///     Ok(Extension::bytes(0x4A, x.to_be_bytes().to_vec()))
/// }
///
/// let a = Value::Custom(300);
/// let b = Value::Custom(20);
/// assert_eq!(compare_with(&a, &b, lower).unwrap(), Ordering::Greater);
/// ```
pub fn compare_with<X, E: ExtEncode<X>>(a: &Value<X>, b: &Value<X>, mut ext: E) -> Result<Ordering, Error> {
    Walk::new(|x: &X| lower(&mut ext, x)).run(a, b)
}

/// What the first bytes of an encoding decide.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum Key {
    /// Integers, whose codes all sort below everything else.
    Int,
    /// Every other value. `ext` only separates extensions that illegally reuse a built-in
    /// code from the built-in itself.
    Code { level: u64, code: u8, ext: bool },
}

impl Key {
    fn builtin(code: u8) -> Key {
        Key::Code {
            level: 0,
            code,
            ext: false,
        }
    }
}

enum Body<'a, X> {
    Int(Cow<'a, Inum>),
    Float(Float),
    Empty,
    Bytes(Cow<'a, [u8]>),
    Values(Children<'a, X>),
}

impl<'a, X> Body<'a, X> {
    fn rank(&self) -> u8 {
        match self {
            Body::Int(_) => 0,
            Body::Float(_) => 1,
            Body::Empty => 2,
            Body::Bytes(_) => 3,
            Body::Values(_) => 4,
        }
    }
}

struct Node<'a, X> {
    key: Key,
    body: Body<'a, X>,
}

impl<'a, X> Node<'a, X> {
    fn builtin(code: u8, body: Body<'a, X>) -> Self {
        Node {
            key: Key::builtin(code),
            body,
        }
    }

    fn borrowed(e: &'a Extension<X>) -> Self {
        let body = match &e.payload {
            Payload::Bytes(b) => Body::Bytes(Cow::Borrowed(&b[..])),
            Payload::Values(vs) => Body::Values(Children::Borrowed(vs.iter())),
        };
        Node {
            key: Key::Code {
                level: e.level,
                code: e.code,
                ext: true,
            },
            body,
        }
    }

    fn owned(e: Extension<X>) -> Self {
        let body = match e.payload.split() {
            Ok(b) => Body::Bytes(Cow::Owned(b.to_vec())),
            Err(vs) => Body::Values(Children::Owned(vs.into_iter())),
        };
        Node {
            key: Key::Code {
                level: e.level,
                code: e.code,
                ext: true,
            },
            body,
        }
    }
}

struct Frame<'a, X> {
    children: Children<'a, X>,
    list: bool,
}

enum Step<'a, X> {
    Next(Item<'a, X>, Item<'a, X>),
    Done(Ordering),
}

/// Walks two values in lockstep. Both stacks always have the same depth.
struct Walk<'a, X, L> {
    lower: L,
    left: Vec<Frame<'a, X>>,
    right: Vec<Frame<'a, X>>,
}

impl<'a, X, L, E> Walk<'a, X, L>
where
    L: FnMut(&X) -> Result<Extension<X>, E>,
{
    fn new(lower: L) -> Self {
        Walk {
            lower,
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    fn run(mut self, a: &'a Value<X>, b: &'a Value<X>) -> Result<Ordering, E> {
        let (mut x, mut y) = (Item::Ref(a), Item::Ref(b));
        loop {
            let nx = self.node(x)?;
            let ny = self.node(y)?;
            let ord = match nx.key.cmp(&ny.key) {
                Ordering::Equal => self.bodies(nx.key, nx.body, ny.body),
                ord => ord,
            };
            if ord != Ordering::Equal {
                return Ok(ord);
            }
            match self.advance() {
                Step::Next(nx, ny) => {
                    x = nx;
                    y = ny;
                }
                Step::Done(ord) => return Ok(ord),
            }
        }
    }

    fn node(&mut self, item: Item<'a, X>) -> Result<Node<'a, X>, E> {
        let node = match item {
            Item::Ref(v) => match v {
                Value::Integer(i) => Node {
                    key: Key::Int,
                    body: Body::Int(Cow::Borrowed(i)),
                },
                Value::Boolean(b) => Node::builtin(if *b { TRUE } else { FALSE }, Body::Empty),
                Value::Float(f) => Node::builtin(FLOAT64, Body::Float(*f)),
                Value::Text(s) => Node::builtin(TEXT, Body::Bytes(Cow::Borrowed(s.as_bytes()))),
                Value::Extension(e) => Node::borrowed(e),
                Value::Custom(x) => Node::owned((self.lower)(x)?),
            },
            Item::Own(v) => match v {
                Value::Integer(i) => Node {
                    key: Key::Int,
                    body: Body::Int(Cow::Owned(i)),
                },
                Value::Boolean(b) => Node::builtin(if b { TRUE } else { FALSE }, Body::Empty),
                Value::Float(f) => Node::builtin(FLOAT64, Body::Float(f)),
                Value::Text(s) => Node::builtin(TEXT, Body::Bytes(Cow::Owned(s.into_bytes()))),
                Value::Extension(e) => Node::owned(e),
                Value::Custom(x) => Node::owned((self.lower)(&x)?),
            },
        };
        Ok(node)
    }

    /// Compares the payloads of two nodes with equal keys.
    fn bodies(&mut self, key: Key, x: Body<'a, X>, y: Body<'a, X>) -> Ordering {
        let code = match key {
            Key::Int => 0,
            Key::Code { code, .. } => code,
        };
        match (x, y) {
            (Body::Int(a), Body::Int(b)) => a.cmp(&b),
            (Body::Float(a), Body::Float(b)) => a.cmp(&b),
            (Body::Empty, Body::Empty) => Ordering::Equal,
            (Body::Bytes(a), Body::Bytes(b)) => {
                if shape(code) == Some(Shape::Blob) {
                    self.escaped(&a, &b)
                } else {
                    a.cmp(&b)
                }
            }
            (Body::Values(a), Body::Values(b)) => {
                let list = shape(code) == Some(Shape::List);
                self.left.push(Frame { children: a, list });
                self.right.push(Frame { children: b, list });
                Ordering::Equal
            }
            (x, y) => x.rank().cmp(&y.rank()),
        }
    }

    /// Compares two blob payloads as their escaped, terminated encodings would compare.
    fn escaped(&self, a: &[u8], b: &[u8]) -> Ordering {
        let n = a.len().min(b.len());
        match a[..n].cmp(&b[..n]) {
            Ordering::Equal => {}
            ord => return ord,
        }
        if a.len() == b.len() {
            Ordering::Equal
        } else if a.len() < b.len() {
            // the shorter side's terminator meets the longer side's escaped NUL, `00 01`
            if b[n] == 0 {
                after_terminator(&self.left)
            } else {
                Ordering::Less
            }
        } else if a[n] == 0 {
            after_terminator(&self.right).reverse()
        } else {
            Ordering::Greater
        }
    }

    /// Moves to the next pair of siblings, closing finished tuples and lists on the way.
    fn advance(&mut self) -> Step<'a, X> {
        loop {
            let (l, r) = match (self.left.last_mut(), self.right.last_mut()) {
                (Some(l), Some(r)) => (l, r),
                _ => return Step::Done(Ordering::Equal),
            };
            match (l.children.next(), r.children.next()) {
                (Some(x), Some(y)) => return Step::Next(x, y),
                (None, None) => {
                    self.left.pop();
                    self.right.pop();
                }
                // a terminator sorts below any value
                (None, Some(_)) => return Step::Done(Ordering::Less),
                (Some(_), None) => return Step::Done(Ordering::Greater),
            }
        }
    }
}

/// How a blob that has just been terminated compares against an escape byte (`0x01`), given
/// what follows it in its enclosing values.
fn after_terminator<X>(stack: &[Frame<'_, X>]) -> Ordering {
    for frame in stack.iter().rev() {
        if frame.children.len() > 0 {
            // the next sibling starts with a code byte
            return Ordering::Greater;
        }
        if frame.list {
            return Ordering::Less;
        }
    }
    // end of input
    Ordering::Less
}
