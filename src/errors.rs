use failure::Fail;
use num_bigint::BigInt;

#[derive(Debug, Fail, Clone, PartialEq, Eq)]
/// Everything that can make an encode, decode or extension callback fail.
///
/// Errors abort the whole call: there is no partial output and no attempt to
/// resynchronise on a malformed buffer.
pub enum Error {
    /// The magnitude of an integer is larger than `2^64 - 1`.
    #[fail(display = "integer {} is outside of [-(2^64 - 1), 2^64 - 1]", value)]
    IntegerOutOfRange {
        /// The offending integer.
        value: BigInt,
    },
    /// A float was NaN, either on its way in or after decoding its payload.
    #[fail(display = "NaN is not an encodable float")]
    InvalidFloat,
    /// A code that cannot start a value was found (or asked for) at this position.
    #[fail(display = "illegal leading code {:#04x} at level {} (offset {})", code, level, offset)]
    IllegalLeadingCode {
        /// The code byte.
        code: u8,
        /// The number of `0xFF` escapes in front of it.
        level: u64,
        /// Byte offset into the input, `0` when encoding.
        offset: usize,
    },
    /// The input ended inside a value or inside a run of level escapes.
    #[fail(display = "input truncated after {} bytes ({} values still open)", offset, open)]
    TruncatedInput {
        /// Number of bytes consumed.
        offset: usize,
        /// Number of composite values that were still being built.
        open: usize,
    },
    /// An extension callback produced a code outside of user-extension space.
    #[fail(display = "extension code {:#04x} is not in user-extension space", code)]
    ExtensionCodeOutOfRange {
        /// The code returned by the callback.
        code: u8,
    },
    /// An `Extension` at level 0 used a code that belongs to a built-in type.
    #[fail(display = "code {:#04x} is reserved for a built-in type at level 0", code)]
    BuiltinCode {
        /// The reserved code.
        code: u8,
    },
    /// An extension's level escapes cannot be written out.
    #[fail(display = "level {} is too large to encode", level)]
    LevelTooLarge {
        /// The requested level.
        level: u64,
    },
    /// An extension's payload does not have the form or size its code requires.
    #[fail(display = "payload of extension {:#04x} does not match its shape: {}", code, reason)]
    ShapeMismatch {
        /// The extension code.
        code: u8,
        /// What was wrong with the payload.
        reason: String,
    },
    /// An integer was not encoded with its minimal representation.
    #[fail(display = "non-canonical integer with code {:#04x} at offset {}", code, offset)]
    NonCanonicalInteger {
        /// The integer code.
        code: u8,
        /// Byte offset of the last payload byte.
        offset: usize,
    },
    /// A text payload was not valid UTF-8.
    #[fail(display = "text ending at offset {} is not valid UTF-8", offset)]
    InvalidUtf8 {
        /// Byte offset of the terminator.
        offset: usize,
    },
    /// An extension callback refused a value.
    #[fail(display = "extension callback failed: {}", _0)]
    Callback(String),
}

impl Error {
    /// Shorthand for [`Error::Callback`], for use inside extension callbacks.
    ///
    /// # Example
    ///
    /// ```
    /// use bone::Error;
    ///
    /// let e = Error::callback("dates need exactly one child");
    /// assert_eq!(e, Error::Callback("dates need exactly one child".into()));
    /// ```
    pub fn callback<S: Into<String>>(msg: S) -> Self { Error::Callback(msg.into()) }

    pub(crate) fn shape(code: u8, reason: impl Into<String>) -> Self {
        Error::ShapeMismatch {
            code,
            reason: reason.into(),
        }
    }
}
