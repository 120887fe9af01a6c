use crate::{
    encoding::layout::{tuple_code, BLOB, LIST},
    Extension, Float, Inum, Value,
};
use bytes::Bytes;
use num_bigint::BigInt;
use std::{
    convert::TryFrom,
    net::{Ipv4Addr, SocketAddrV4},
};

/// A value representable as a BONE [`Value`].
pub trait BoneRep: Clone + Sized {
    /// Converts value into a [`Value`].
    ///
    /// # Example
    ///
    /// ```
    /// use bone::rep::*;
    ///
    /// let b_num = 1.to_bone();
    /// ```
    fn to_bone(&self) -> Value { self.clone().into_bone() }

    /// Consumes value, converting it into a [`Value`].
    ///
    /// # Example
    ///
    /// ```
    /// use bone::rep::*;
    ///
    /// let b_num = 1.into_bone();
    /// ```
    fn into_bone(self) -> Value { self.to_bone() }

    /// Converts value from a [`Value`], returning `None` if it has the wrong shape.
    ///
    /// # Example
    ///
    /// ```
    /// use bone::rep::*;
    ///
    /// let b_str = "foo".to_string().into_bone();
    ///
    /// assert_eq!(String::from_bone(b_str.clone()).unwrap(), "foo");
    /// assert_eq!(u8::from_bone(b_str), None);
    /// ```
    fn from_bone(v: Value) -> Option<Self>;
}

impl Value {
    /// Converts into any [`BoneRep`] type.
    ///
    /// # Example
    ///
    /// ```
    /// use bone::prelude::*;
    ///
    /// let v = vec![1u16, 2, 3].into_bone();
    /// let back: Vec<u16> = v.into_rep().unwrap();
    /// assert_eq!(back, vec![1, 2, 3]);
    /// ```
    pub fn into_rep<T: BoneRep>(self) -> Option<T> { T::from_bone(self) }
}

/// The children of a level-0 extension with the given code.
fn values_of(v: Value, code: u8) -> Option<Vec<Value>> {
    match v {
        Value::Extension(Extension {
            code: c,
            level: 0,
            payload,
        }) if c == code => payload.into_values(),
        _ => None,
    }
}

macro_rules! int_rep {
    ($($t:ty),*) => {
        $(
            impl BoneRep for $t {
                fn into_bone(self) -> Value { Value::from(self) }

                fn from_bone(v: Value) -> Option<Self> {
                    v.as_inum()?.to_i128().and_then(|i| <$t>::try_from(i).ok())
                }
            }
        )*
    };
}

int_rep!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl BoneRep for Inum {
    fn into_bone(self) -> Value { Value::Integer(self) }

    fn from_bone(v: Value) -> Option<Self> {
        match v {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }
}

impl BoneRep for BigInt {
    fn into_bone(self) -> Value { Value::from(self) }

    fn from_bone(v: Value) -> Option<Self> { Inum::from_bone(v).map(BigInt::from) }
}

impl BoneRep for bool {
    fn into_bone(self) -> Value { Value::Boolean(self) }

    fn from_bone(v: Value) -> Option<Self> { v.as_bool() }
}

impl BoneRep for Float {
    fn into_bone(self) -> Value { Value::Float(self) }

    fn from_bone(v: Value) -> Option<Self> {
        match v {
            Value::Float(f) => Some(f),
            _ => None,
        }
    }
}

impl BoneRep for f64 {
    fn into_bone(self) -> Value { Value::from(self) }

    fn from_bone(v: Value) -> Option<Self> { v.as_f64() }
}

impl BoneRep for f32 {
    fn into_bone(self) -> Value { Value::from(self) }

    /// Only succeeds if the float is exactly representable as an `f32`.
    fn from_bone(v: Value) -> Option<Self> { f32::try_from(Float::from_bone(v)?).ok() }
}

impl BoneRep for String {
    fn into_bone(self) -> Value { Value::Text(self) }

    fn to_bone(&self) -> Value { Value::Text(self.clone()) }

    fn from_bone(v: Value) -> Option<Self> {
        match v {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Bytes are blobs.
impl BoneRep for Bytes {
    fn into_bone(self) -> Value { Value::blob(self) }

    fn from_bone(v: Value) -> Option<Self> {
        match v {
            Value::Extension(Extension {
                code: BLOB,
                level: 0,
                payload,
            }) => payload.into_bytes(),
            _ => None,
        }
    }
}

impl BoneRep for Value {
    fn into_bone(self) -> Value { self }

    fn from_bone(v: Value) -> Option<Self> { Some(v) }
}

/// Vectors are lists.
impl<T: BoneRep> BoneRep for Vec<T> {
    fn into_bone(self) -> Value { Value::list(self.into_iter().map(T::into_bone).collect()) }

    fn to_bone(&self) -> Value { Value::list(self.iter().map(T::to_bone).collect()) }

    fn from_bone(v: Value) -> Option<Self> { values_of(v, LIST)?.into_iter().map(T::from_bone).collect() }
}

/// `None` is the empty list, `Some(x)` the list holding `x`.
impl<T: BoneRep> BoneRep for Option<T> {
    fn into_bone(self) -> Value { Value::list(self.into_iter().map(T::into_bone).collect()) }

    fn to_bone(&self) -> Value { Value::list(self.iter().map(T::to_bone).collect()) }

    fn from_bone(v: Value) -> Option<Self> {
        let mut iter = values_of(v, LIST)?.into_iter();
        match (iter.next(), iter.next()) {
            (None, _) => Some(None),
            (Some(x), None) => Some(Some(T::from_bone(x)?)),
            (Some(_), Some(_)) => None,
        }
    }
}

impl BoneRep for () {
    fn into_bone(self) -> Value { Value::list(vec![]) }

    fn from_bone(v: Value) -> Option<()> {
        if values_of(v, LIST)?.is_empty() {
            Some(())
        } else {
            None
        }
    }
}

/// Builds the fixed tuple holding `values`, which must have an arity with a tuple code.
fn tuple(values: Vec<Value>) -> Value {
    let code = tuple_code(values.len()).unwrap_or(LIST);
    Value::Extension(Extension::values(code, values))
}

/// The children of a fixed tuple of `arity` values.
fn tuple_values(v: Value, arity: usize) -> Option<std::vec::IntoIter<Value>> {
    let vs = values_of(v, tuple_code(arity)?)?;
    if vs.len() == arity {
        Some(vs.into_iter())
    } else {
        None
    }
}

impl<A: BoneRep, B: BoneRep> BoneRep for (A, B) {
    fn into_bone(self) -> Value { tuple(vec![self.0.into_bone(), self.1.into_bone()]) }

    fn from_bone(v: Value) -> Option<Self> {
        let mut iter = tuple_values(v, 2)?;
        Some((A::from_bone(iter.next()?)?, B::from_bone(iter.next()?)?))
    }
}

impl<A: BoneRep, B: BoneRep, C: BoneRep> BoneRep for (A, B, C) {
    fn into_bone(self) -> Value { tuple(vec![self.0.into_bone(), self.1.into_bone(), self.2.into_bone()]) }

    fn from_bone(v: Value) -> Option<Self> {
        let mut iter = tuple_values(v, 3)?;
        Some((
            A::from_bone(iter.next()?)?,
            B::from_bone(iter.next()?)?,
            C::from_bone(iter.next()?)?,
        ))
    }
}

impl<A: BoneRep, B: BoneRep, C: BoneRep, D: BoneRep> BoneRep for (A, B, C, D) {
    fn into_bone(self) -> Value {
        tuple(vec![
            self.0.into_bone(),
            self.1.into_bone(),
            self.2.into_bone(),
            self.3.into_bone(),
        ])
    }

    fn from_bone(v: Value) -> Option<Self> {
        let mut iter = tuple_values(v, 4)?;
        Some((
            A::from_bone(iter.next()?)?,
            B::from_bone(iter.next()?)?,
            C::from_bone(iter.next()?)?,
            D::from_bone(iter.next()?)?,
        ))
    }
}

/// Addresses are 4-byte blocks, so they sort numerically.
impl BoneRep for Ipv4Addr {
    fn into_bone(self) -> Value { Value::Extension(Extension::bytes(0x60, self.octets().to_vec())) }

    fn from_bone(v: Value) -> Option<Self> {
        match v {
            Value::Extension(Extension {
                code: 0x60,
                level: 0,
                payload,
            }) => match payload.into_bytes()?[..] {
                [a, b, c, d] => Some(Ipv4Addr::new(a, b, c, d)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl BoneRep for SocketAddrV4 {
    fn into_bone(self) -> Value { (*self.ip(), self.port()).into_bone() }

    fn from_bone(v: Value) -> Option<Self> {
        let (ip, port) = BoneRep::from_bone(v)?;
        Some(SocketAddrV4::new(ip, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{decode, encode};

    fn through_bytes<T: BoneRep + PartialEq + std::fmt::Debug>(t: T) {
        let enc = encode(&[t.to_bone()]).unwrap();
        let mut dec = decode(&enc).unwrap();
        assert_eq!(dec.len(), 1);
        assert_eq!(T::from_bone(dec.remove(0)), Some(t));
    }

    #[test]
    fn round_trips() {
        through_bytes(0u8);
        through_bytes(-129i16);
        through_bytes(u64::max_value());
        through_bytes(-i128::from(u64::max_value()));
        through_bytes(BigInt::from(-5));
        through_bytes(true);
        through_bytes(1.5f32);
        through_bytes(-0.0f64);
        through_bytes("tea\0pot".to_string());
        through_bytes(Bytes::from_static(b"\x00\x01\x02"));
        through_bytes(vec![vec![1u8], vec![], vec![2, 3]]);
        through_bytes(Some(7i32));
        through_bytes(None::<i32>);
        through_bytes(());
        through_bytes((1u8, "one".to_string()));
        through_bytes((1u8, 2u16, 3u32));
        through_bytes((1u8, false, 3u32, (4i8, 5i8)));
        through_bytes("127.0.0.1:8080".parse::<SocketAddrV4>().unwrap());
    }

    #[test]
    fn wrong_shapes() {
        assert_eq!(u8::from_bone(Value::from(256)), None);
        assert_eq!(u64::from_bone(Value::from(-1)), None);
        assert_eq!(String::from_bone(Value::blob(&b"abc"[..])), None);
        assert_eq!(Bytes::from_bone(Value::from("abc")), None);
        assert_eq!(<(u8, u8)>::from_bone(vec![1u8, 2].into_bone()), None);
        assert_eq!(Vec::<u8>::from_bone((1u8, 2u8).into_bone()), None);
        assert_eq!(Option::<u8>::from_bone(vec![1u8, 2].into_bone()), None);
        assert_eq!(f32::from_bone(Value::from(0.1f64)), None);
    }

    #[test]
    fn addresses_sort_numerically() {
        let a: Ipv4Addr = "9.255.0.0".parse().unwrap();
        let b: Ipv4Addr = "10.0.0.1".parse().unwrap();
        assert!(a.to_bone() < b.to_bone());
    }
}
