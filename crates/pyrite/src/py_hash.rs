//! Deterministic, CPython-compatible hash helpers.
//!
//! Hashing is equivalent to CPython under `PYTHONHASHSEED=0`: text hashes
//! with SipHash-1-3 and a zeroed key, numbers hash with the Mersenne-prime
//! modular algorithm from `Objects/longobject.c`. Determinism keeps dict and
//! set iteration order reproducible across runs.
//!
//! The `hash()` builtin does not expose the full-width value: it truncates
//! via [`truncate_hash`] so the result always fits the small-int range.

/// CPython reduces numeric hashes modulo the Mersenne prime `2^61 - 1`.
const HASH_BITS: u32 = 61;
const HASH_PRIME: u64 = (1 << HASH_BITS) - 1;

/// Truncates a full-width hash to the small-int range.
///
/// The strategy is low-bits masking: the value is reduced to its low 61 bits
/// (the width of the numeric-hash modulus), so `hash(int)` values pass
/// through unchanged and string hashes lose only their top three bits.
#[must_use]
pub(crate) fn truncate_hash(h: u64) -> i64 {
    (h & HASH_PRIME) as i64
}

/// Hashes raw bytes using CPython's `PYTHONHASHSEED=0` SipHash-1-3 behavior.
///
/// Two CPython conventions apply:
/// - empty input hashes to `0`
/// - a computed hash of `-1` is remapped to `-2`
#[must_use]
pub(crate) fn hash_bytes_seed0(data: &[u8]) -> u64 {
    if data.is_empty() {
        return 0;
    }
    let raw = sip13_zero_key(data) as i64;
    let fixed = if raw == -1 { -2 } else { raw };
    fixed as u64
}

/// Hashes UTF-8 string content with the deterministic seed-0 algorithm.
#[must_use]
pub(crate) fn hash_str_seed0(value: &str) -> u64 {
    hash_bytes_seed0(value.as_bytes())
}

/// Hashes a signed 64-bit integer using CPython's modular algorithm.
///
/// The result is the magnitude modulo the prime, carrying the input's sign,
/// with `-1` remapped to `-2` (CPython reserves `-1` as an internal error
/// sentinel).
#[must_use]
pub(crate) fn hash_int(value: i64) -> u64 {
    int_hash_signed(value) as u64
}

fn int_hash_signed(n: i64) -> i64 {
    // unsigned_abs also covers i64::MIN, whose magnitude has no i64 form.
    let reduced = (n.unsigned_abs() % HASH_PRIME) as i64;
    let h = if n < 0 { -reduced } else { reduced };
    if h == -1 { -2 } else { h }
}

/// Hashes an `f64` using CPython's float hashing algorithm
/// (`_Py_HashDouble`).
///
/// The mantissa folds into the accumulator 28 bits at a time modulo the
/// prime and the exponent becomes a final 61-bit rotation. Because that
/// computes `m * 2^e mod (2^61 - 1)` exactly, integral floats land on the
/// same value as [`hash_int`] with no special casing, which is what makes
/// `hash(1) == hash(1.0)` hold.
#[cfg(feature = "float")]
#[must_use]
pub(crate) fn hash_float(value: f64) -> u64 {
    float_hash_signed(value) as u64
}

#[cfg(feature = "float")]
fn float_hash_signed(x: f64) -> i64 {
    if x.is_nan() {
        // sys.hash_info.nan on CPython 3.10+.
        return 0;
    }
    if x.is_infinite() {
        return if x > 0.0 { 314_159 } else { -314_159 };
    }
    if x == 0.0 {
        return 0;
    }

    let negative = x < 0.0;
    let (mut frac, mut exp) = split_frac_exp(x.abs());

    let mut acc: u64 = 0;
    while frac > 0.0 {
        // Shift the accumulator left by 28 within the 61-bit ring, then
        // take the next 28 mantissa bits as an integer digit.
        acc = ((acc << 28) & HASH_PRIME) | (acc >> (HASH_BITS - 28));
        frac *= f64::from(1_u32 << 28);
        let digit = frac as u64;
        frac -= digit as f64;
        acc += digit;
        if acc >= HASH_PRIME {
            acc -= HASH_PRIME;
        }
        exp -= 28;
    }

    // Apply the remaining exponent as a rotation of the 61-bit ring.
    let shift = exp.rem_euclid(HASH_BITS as i32) as u32;
    acc = ((acc << shift) & HASH_PRIME) | (acc >> (HASH_BITS - shift));

    let h = if negative { -(acc as i64) } else { acc as i64 };
    if h == -1 { -2 } else { h }
}

/// Splits a positive finite float into `(m, e)` with `x == m * 2^e` and
/// `0.5 <= m < 1.0`.
#[cfg(feature = "float")]
fn split_frac_exp(x: f64) -> (f64, i32) {
    debug_assert!(x > 0.0 && x.is_finite());
    let bits = x.to_bits();
    let exp_field = ((bits >> 52) & 0x7ff) as i32;
    if exp_field == 0 {
        // Subnormal: scaling by 2^53 is exact and makes the value normal.
        let (m, e) = split_frac_exp(x * 9_007_199_254_740_992.0);
        return (m, e - 53);
    }
    // Overwrite the exponent field with bias - 1, keeping the mantissa
    // bits; that places the value in [0.5, 1).
    let m = f64::from_bits((bits & !(0x7ff_u64 << 52)) | (1022_u64 << 52));
    (m, exp_field - 1022)
}

/// SipHash-1-3 state. The key is fixed to zero (the seed-0 convention), so
/// the initial state is just the SipHash initialization constants.
struct Sip13 {
    s0: u64,
    s1: u64,
    s2: u64,
    s3: u64,
}

impl Sip13 {
    fn new() -> Self {
        // The little-endian chunks of "somepseudorandomlygeneratedbytes",
        // unperturbed because k0 = k1 = 0.
        Self {
            s0: 0x736f_6d65_7073_6575,
            s1: 0x646f_7261_6e64_6f6d,
            s2: 0x6c79_6765_6e65_7261,
            s3: 0x7465_6462_7974_6573,
        }
    }

    /// One ARX round, the two half-rounds interleaved: additions first,
    /// then the dependent rotate-and-xor updates.
    fn round(&mut self) {
        self.s0 = self.s0.wrapping_add(self.s1);
        self.s2 = self.s2.wrapping_add(self.s3);
        self.s1 = self.s1.rotate_left(13) ^ self.s0;
        self.s3 = self.s3.rotate_left(16) ^ self.s2;
        self.s0 = self.s0.rotate_left(32);

        self.s0 = self.s0.wrapping_add(self.s3);
        self.s2 = self.s2.wrapping_add(self.s1);
        self.s3 = self.s3.rotate_left(21) ^ self.s0;
        self.s1 = self.s1.rotate_left(17) ^ self.s2;
        self.s2 = self.s2.rotate_left(32);
    }

    /// Absorbs one message word with a single compression round (the "1"
    /// in 1-3).
    fn absorb(&mut self, word: u64) {
        self.s3 ^= word;
        self.round();
        self.s0 ^= word;
    }

    /// Finalization: the 0xff tweak followed by three rounds (the "3" in
    /// 1-3), collapsing the state by xor.
    fn finish(mut self) -> u64 {
        self.s2 ^= 0xff;
        for _ in 0..3 {
            self.round();
        }
        self.s0 ^ self.s1 ^ self.s2 ^ self.s3
    }
}

/// SipHash-1-3 over `data` with a zero key.
fn sip13_zero_key(data: &[u8]) -> u64 {
    let mut state = Sip13::new();

    let mut words = data.chunks_exact(8);
    for word in words.by_ref() {
        state.absorb(u64::from_le_bytes(word.try_into().expect("chunk is 8 bytes")));
    }

    // The final word holds the trailing bytes little-endian, with the total
    // length in the top byte.
    let mut last = (data.len() as u64) << 56;
    for (i, &byte) in words.remainder().iter().enumerate() {
        last |= u64::from(byte) << (8 * i);
    }
    state.absorb(last);

    state.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_hash_matches_cpython_small_values() {
        // Values below the modulus hash to themselves.
        assert_eq!(hash_int(0), 0);
        assert_eq!(hash_int(1), 1);
        assert_eq!(hash_int(12345), 12345);
        assert_eq!(hash_int(-7), (-7_i64) as u64);
    }

    #[test]
    fn minus_one_is_remapped() {
        assert_eq!(hash_int(-1), (-2_i64) as u64);
    }

    #[test]
    fn int_hash_reduces_modulo_the_prime() {
        // 2^61 - 1 itself reduces to zero; one past it wraps to one.
        assert_eq!(hash_int(HASH_PRIME as i64), 0);
        assert_eq!(hash_int(HASH_PRIME as i64 + 1), 1);
        // i64::MIN: 2^63 = 4 * (2^61 - 1) + 4, negated.
        assert_eq!(hash_int(i64::MIN), (-4_i64) as u64);
    }

    #[test]
    fn empty_string_hashes_to_zero() {
        assert_eq!(hash_str_seed0(""), 0);
    }

    #[test]
    fn string_hashes_are_deterministic() {
        assert_eq!(hash_str_seed0("spam"), hash_str_seed0("spam"));
        assert_ne!(hash_str_seed0("spam"), hash_str_seed0("eggs"));
    }

    #[test]
    fn truncation_keeps_small_int_hashes_intact() {
        let h = hash_int(9999);
        assert_eq!(truncate_hash(h), 9999);
        // Truncated hashes always fit in 61 bits.
        assert!(truncate_hash(hash_str_seed0("hello")) < (1 << 61));
        assert!(truncate_hash(hash_str_seed0("hello")) >= 0);
    }

    #[cfg(feature = "float")]
    #[test]
    fn integral_floats_hash_like_ints() {
        assert_eq!(hash_float(1.0), hash_int(1));
        assert_eq!(hash_float(42.0), hash_int(42));
        assert_eq!(hash_float(-3.0), hash_int(-3));
    }

    #[cfg(feature = "float")]
    #[test]
    fn float_special_values() {
        assert_eq!(hash_float(0.0), 0);
        assert_eq!(hash_float(f64::INFINITY), 314_159_u64);
        assert_eq!(hash_float(f64::NEG_INFINITY), (-314_159_i64) as u64);
        assert_eq!(hash_float(f64::NAN), 0);
    }

    #[cfg(feature = "float")]
    #[test]
    fn fraction_splitting_round_trips() {
        let (m, e) = split_frac_exp(42.0);
        assert!((0.5..1.0).contains(&m));
        assert_eq!(m * (e as f64).exp2(), 42.0);

        // Subnormals renormalize correctly.
        let tiny = f64::MIN_POSITIVE / 4.0;
        let (m, e) = split_frac_exp(tiny);
        assert!((0.5..1.0).contains(&m));
        assert_eq!(m * (e as f64).exp2(), tiny);
    }
}
