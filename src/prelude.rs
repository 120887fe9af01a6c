pub use crate::{
    compare::{compare, compare_with},
    encoding::{decode, decode_with, encode, encode_into, encode_with, Decoder, ExtDecode, ExtEncode},
    float::Float,
    inum::Inum,
    rep::*,
    Error, Extension, NoExt, Payload, Value,
};
pub use bytes::Bytes;
pub use num_bigint::BigInt;
pub use std::convert::TryFrom;
