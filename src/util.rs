use smallvec::SmallVec;

/// Converts a `u64` to the smallest possible vec of digits in big-endian order.
///
/// Zero has no significant digits and produces an empty vec.
///
/// # Arguments
///
/// * `num: u64` - The integer to be converted.
///
/// # Example
///
/// ```
/// use bone::util::u64_to_digits;
///
/// let some_vec = u64_to_digits(256);
///
/// // most significant byte first
/// assert_eq!(&some_vec[..], &[1, 0]);
///
/// assert!(u64_to_digits(0).is_empty());
/// ```
pub fn u64_to_digits(num: u64) -> SmallVec<[u8; 8]> {
    let len = 8 - (num.leading_zeros() / 8) as usize;
    SmallVec::from_slice(&num.to_be_bytes()[8 - len..])
}

/// Reads up to eight big-endian digits back into a `u64`.
///
/// # Example
///
/// ```
/// use bone::util::digits_to_u64;
///
/// assert_eq!(digits_to_u64(&[1, 0]), 256);
/// assert_eq!(digits_to_u64(&[]), 0);
/// ```
pub fn digits_to_u64(digits: &[u8]) -> u64 {
    debug_assert!(digits.len() <= 8);
    digits.iter().fold(0, |acc, d| (acc << 8) | u64::from(*d))
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_as {
    ($to:tt, $from:ty, $as:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $to::from(f as $as) }
        }
    };
}
