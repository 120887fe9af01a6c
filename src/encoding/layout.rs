//! The type-code layout.
//!
//! Every value starts with an optional run of `0xFF` level escapes followed by a single code
//! byte. The code alone determines how the rest of the value is delimited:
//!
//! | Code          | Meaning                                  | Payload                          |
//! | ---           | ---                                      | ---                              |
//! | `0x00`        | terminator                               | only inside blobs and lists      |
//! | `0x01..=0x07` | reserved                                 | illegal                          |
//! | `0x08..=0x0F` | negative integer, `0x10 - len` bytes     | complemented big-endian magnitude |
//! | `0x10..=0x17` | integer `0..=7`                          | none                             |
//! | `0x18..=0x1F` | positive integer, `code - 0x17` bytes    | big-endian magnitude             |
//! | `0x20..=0x2F` | `false`, `true`, reserved                | none                             |
//! | `0x30..=0x8F` | fixed block of 1, 2, 3, 4, 8, 16 bytes   | raw bytes (`0x70` is a float64)  |
//! | `0x90..=0x9F` | blob (`0x90` is text)                    | escaped bytes, `0x00`-terminated |
//! | `0xA0..=0xEF` | tuple of 1, 2, 3, 4, 8 values            | child values                     |
//! | `0xF0..=0xFE` | list                                     | child values, `0x00`-terminated  |
//! | `0xFF`        | level escape                             | never a code                     |
//!
//! Codes whose low nibble is `0xA..=0xF` (from `0x20` up) are left to applications.

/// Ends a blob or a list.
pub const TERMINATOR: u8 = 0x00;
/// Follows a literal `0x00` inside a blob.
pub const ESCAPE: u8 = 0x01;
/// Raises the level of the next code by one.
pub const LEVEL_ESCAPE: u8 = 0xFF;

/// Lowest code that may start a value.
pub const MIN_CODE: u8 = 0x08;
/// Code of the integer zero; `0..=7` are `ZERO + n`.
pub const ZERO: u8 = 0x10;
/// Codes below this are integers, which never carry a level.
pub const MIN_LEVEL_CODE: u8 = 0x20;

/// `false`.
pub const FALSE: u8 = 0x20;
/// `true`.
pub const TRUE: u8 = 0x21;
/// An order-transformed IEEE-754 double.
pub const FLOAT64: u8 = 0x70;
/// UTF-8 text.
pub const TEXT: u8 = 0x90;
/// Raw bytes of any length.
pub const BLOB: u8 = 0x91;
/// A list of any length.
pub const LIST: u8 = 0xF0;

/// Integers from `0` up to this are encoded in the code byte alone.
pub const MAX_SMALL_INT: u64 = 7;

/// How the payload following a code is delimited.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Shape {
    /// Exactly this many raw bytes.
    Block(usize),
    /// Escaped bytes up to an unescaped terminator.
    Blob,
    /// Exactly this many child values.
    Tuple(usize),
    /// Child values up to a terminator.
    List,
}

/// The shape of a code, or `None` if the code cannot start a value.
///
/// # Example
///
/// ```
/// use bone::encoding::layout::{shape, Shape};
///
/// assert_eq!(shape(0x19), Some(Shape::Block(2)));
/// assert_eq!(shape(0x70), Some(Shape::Block(8)));
/// assert_eq!(shape(0xE5), Some(Shape::Tuple(8)));
/// assert_eq!(shape(0x03), None);
/// ```
pub fn shape(code: u8) -> Option<Shape> {
    let shape = match code {
        0x00..=0x07 | 0xFF => return None,
        0x08..=0x0F => Shape::Block((ZERO - code) as usize),
        0x10..=0x17 => Shape::Block(0),
        0x18..=0x1F => Shape::Block((code - 0x17) as usize),
        0x20..=0x2F => Shape::Block(0),
        0x30..=0x3F => Shape::Block(1),
        0x40..=0x4F => Shape::Block(2),
        0x50..=0x5F => Shape::Block(3),
        0x60..=0x6F => Shape::Block(4),
        0x70..=0x7F => Shape::Block(8),
        0x80..=0x8F => Shape::Block(16),
        0x90..=0x9F => Shape::Blob,
        0xA0..=0xAF => Shape::Tuple(1),
        0xB0..=0xBF => Shape::Tuple(2),
        0xC0..=0xCF => Shape::Tuple(3),
        0xD0..=0xDF => Shape::Tuple(4),
        0xE0..=0xEF => Shape::Tuple(8),
        0xF0..=0xFE => Shape::List,
    };
    Some(shape)
}

/// Whether `code` is in user-extension space.
pub fn is_user_code(code: u8) -> bool { code >= MIN_LEVEL_CODE && code & 0x0F >= 0x0A && code != LEVEL_ESCAPE }

/// Whether `code` is an integer code.
pub fn is_int_code(code: u8) -> bool { (MIN_CODE..MIN_LEVEL_CODE).contains(&code) }

/// Whether `(level, code)` is decoded as a built-in value rather than an extension.
pub fn is_builtin(level: u64, code: u8) -> bool {
    level == 0 && (is_int_code(code) || code == FALSE || code == TRUE || code == FLOAT64 || code == TEXT)
}

/// Whether `code` may be preceded by `level` escapes.
pub fn is_legal_leading(level: u64, code: u8) -> bool {
    shape(code).is_some() && (level == 0 || code >= MIN_LEVEL_CODE)
}

/// The code for a non-negative integer whose magnitude takes `len` bytes.
pub(crate) fn pos_int_code(len: usize) -> u8 {
    debug_assert!((1..=8).contains(&len));
    0x17 + len as u8
}

/// The code for a negative integer whose magnitude takes `len` bytes.
pub(crate) fn neg_int_code(len: usize) -> u8 {
    debug_assert!((1..=8).contains(&len));
    ZERO - len as u8
}

/// The fixed-block code for `len` raw bytes, if there is one.
///
/// Eight-byte blocks use `0x71` since `0x70` is taken by floats.
pub fn block_code(len: usize) -> Option<u8> {
    match len {
        1 => Some(0x30),
        2 => Some(0x40),
        3 => Some(0x50),
        4 => Some(0x60),
        8 => Some(0x71),
        16 => Some(0x80),
        _ => None,
    }
}

/// The tuple code for `arity` values, if there is one.
pub fn tuple_code(arity: usize) -> Option<u8> {
    match arity {
        1 => Some(0xA0),
        2 => Some(0xB0),
        3 => Some(0xC0),
        4 => Some(0xD0),
        8 => Some(0xE0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_but_reserved_has_a_shape() {
        for code in 0u8..=0xFF {
            assert_eq!(shape(code).is_none(), code < MIN_CODE || code == LEVEL_ESCAPE);
        }
    }

    #[test]
    fn integer_lengths() {
        for len in 1..=8 {
            assert_eq!(shape(pos_int_code(len)), Some(Shape::Block(len)));
            assert_eq!(shape(neg_int_code(len)), Some(Shape::Block(len)));
        }
        assert_eq!(neg_int_code(8), 0x08);
        assert_eq!(pos_int_code(8), 0x1F);
    }

    #[test]
    fn user_space() {
        assert!(is_user_code(0x2A));
        assert!(is_user_code(0xBA));
        assert!(is_user_code(0xFE));
        assert!(!is_user_code(0x1A));
        assert!(!is_user_code(0x90));
        assert!(!is_user_code(0x29));
    }

    #[test]
    fn builtins_only_at_level_zero() {
        assert!(is_builtin(0, TEXT));
        assert!(!is_builtin(1, TEXT));
        assert!(!is_builtin(0, BLOB));
        assert!(!is_legal_leading(1, 0x10));
        assert!(is_legal_leading(1, 0x20));
        assert!(!is_legal_leading(0, TERMINATOR));
    }

    #[test]
    fn constructor_codes_are_not_builtin() {
        for len in &[1, 2, 3, 4, 8, 16] {
            let code = block_code(*len).unwrap();
            assert!(!is_builtin(0, code));
            assert_eq!(shape(code), Some(Shape::Block(*len)));
        }
        for arity in &[1, 2, 3, 4, 8] {
            assert_eq!(shape(tuple_code(*arity).unwrap()), Some(Shape::Tuple(*arity)));
        }
    }
}
