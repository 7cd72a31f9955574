//! Select the n-th set bit of a 64-bit word.
//!
//! Two implementations sit behind one entry point: a PDEP + CTZ fast path on
//! x86-64 parts with BMI2, and a portable byte-table walk everywhere else.
//! The dispatch happens at runtime; feature detection is cached by the
//! standard library.

/// Per-byte population counts, built at compile time.
const POP8: [u8; 256] = build_pop8();

/// `SEL8[v][k]` is the bit position (0..8) of the k-th set bit of the byte
/// `v`, LSB first. Out-of-range entries hold `0xff` and are never read.
const SEL8: [[u8; 8]; 256] = build_sel8();

const fn build_pop8() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut value = 0usize;
    while value < 256 {
        table[value] = (value as u8).count_ones() as u8;
        value += 1;
    }
    table
}

const fn build_sel8() -> [[u8; 8]; 256] {
    let mut table = [[0xffu8; 8]; 256];
    let mut value = 0usize;
    while value < 256 {
        let mut rank = 0usize;
        let mut bit = 0u8;
        while bit < 8 {
            if value & (1usize << bit) != 0 {
                table[value][rank] = bit;
                rank += 1;
            }
            bit += 1;
        }
        value += 1;
    }
    table
}

/// Returns the 0-based position of the `n`-th set bit of `word`, counting
/// from the least significant end, or `None` when `n >= word.count_ones()`.
///
/// # Examples
///
/// ```
/// use tickbook::orderbook::select::select_nth_set_bit;
///
/// assert_eq!(select_nth_set_bit(0b1011, 0), Some(0));
/// assert_eq!(select_nth_set_bit(0b1011, 2), Some(3));
/// assert_eq!(select_nth_set_bit(0b1011, 3), None);
/// ```
#[inline]
#[must_use]
pub fn select_nth_set_bit(word: u64, n: u32) -> Option<u32> {
    if n >= word.count_ones() {
        return None;
    }

    #[cfg(target_arch = "x86_64")]
    if std::is_x86_feature_detected!("bmi2") {
        // Safe to call: the bmi2 check just passed.
        return Some(unsafe { select_bmi2(word, n) });
    }

    Some(select_portable(word, n))
}

/// PDEP deposits the single bit of `1 << n` into the n-th set-bit position
/// of `word`; trailing zeros of the result is the answer.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "bmi2")]
unsafe fn select_bmi2(word: u64, n: u32) -> u32 {
    use std::arch::x86_64::_pdep_u64;

    let routed = _pdep_u64(1u64 << n, word);
    routed.trailing_zeros()
}

/// Byte-table walk: skip whole bytes by their popcount, then finish the
/// target byte with the select table. At most eight iterations.
fn select_portable(word: u64, n: u32) -> u32 {
    let mut remaining = n;
    let mut shifted = word;
    let mut base = 0u32;
    loop {
        let byte = (shifted & 0xff) as usize;
        let ones = u32::from(POP8[byte]);
        if remaining < ones {
            return base + u32::from(SEL8[byte][remaining as usize]);
        }
        remaining -= ones;
        shifted >>= 8;
        base += 8;
        debug_assert!(base < 64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference implementation: linear scan.
    fn select_naive(word: u64, n: u32) -> Option<u32> {
        let mut seen = 0;
        for bit in 0..64 {
            if word & (1u64 << bit) != 0 {
                if seen == n {
                    return Some(bit);
                }
                seen += 1;
            }
        }
        None
    }

    #[test]
    fn empty_word_has_no_bits() {
        assert_eq!(select_nth_set_bit(0, 0), None);
    }

    #[test]
    fn single_bit_positions() {
        for bit in 0..64 {
            let word = 1u64 << bit;
            assert_eq!(select_nth_set_bit(word, 0), Some(bit));
            assert_eq!(select_nth_set_bit(word, 1), None);
        }
    }

    #[test]
    fn all_bits_set() {
        for n in 0..64 {
            assert_eq!(select_nth_set_bit(u64::MAX, n), Some(n));
        }
        assert_eq!(select_nth_set_bit(u64::MAX, 64), None);
    }

    #[test]
    fn alternating_pattern() {
        let word = 0xaaaa_aaaa_aaaa_aaaau64;
        for n in 0..32 {
            assert_eq!(select_nth_set_bit(word, n), Some(2 * n + 1));
        }
        assert_eq!(select_nth_set_bit(word, 32), None);
    }

    #[test]
    fn rank_at_popcount_is_rejected() {
        let word = 0b1011_0100u64;
        let ones = word.count_ones();
        assert_eq!(select_nth_set_bit(word, ones), None);
        assert_eq!(select_nth_set_bit(word, ones + 17), None);
    }

    #[test]
    fn portable_path_matches_naive() {
        let words = [
            0x0000_0000_0000_0001u64,
            0x8000_0000_0000_0000,
            0x0123_4567_89ab_cdef,
            0xdead_beef_cafe_f00d,
            0x0000_ffff_0000_ffff,
            0xf0f0_f0f0_0f0f_0f0f,
        ];
        for &word in &words {
            for n in 0..word.count_ones() {
                assert_eq!(Some(select_portable(word, n)), select_naive(word, n));
            }
        }
    }

    #[test]
    fn dispatch_matches_naive() {
        let mut state = 0x9e37_79b9_7f4a_7c15u64;
        for _ in 0..200 {
            // xorshift64 keeps the word mix deterministic
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            for n in 0..state.count_ones() {
                assert_eq!(select_nth_set_bit(state, n), select_naive(state, n));
            }
        }
    }
}
