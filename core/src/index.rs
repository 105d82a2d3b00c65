//! Filename prefixes that pin the merge order of uploaded documents.
//!
//! The conversion service merges same-field files in the order of their
//! names. Prefixing each upload with a token from an `IndexGenerator`, taken
//! in argument order, makes that order the caller's.

use std::sync::OnceLock;
use std::time::Instant;

/// Width of an `HrtimeIndex` token: the decimal length of `u64::MAX`.
pub const HRTIME_WIDTH: usize = 20;

/// Produces strictly increasing tokens, one per call.
pub trait IndexGenerator {
    fn next_token(&mut self) -> String;
}

impl<F: FnMut() -> String> IndexGenerator for F {
    fn next_token(&mut self) -> String {
        self()
    }
}

/// Converts a 1-based index into its base-26 letter form.
///
/// `1 → "A"`, `26 → "Z"`, `27 → "AA"`, `702 → "ZZ"`, `703 → "AAA"`.
/// Zero has no letter form and yields an empty string.
pub fn to_alpha(index: u64) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    while n != 0 {
        let rem = (n - 1) % 26;
        n = (n - rem) / 26;
        letters.push(b'A' + rem as u8);
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Letter tokens `A, B, ..., Z, AA, ...`.
///
/// Only safe for merge ordering up to 26 files. The 27th token is `AA`, which
/// sorts before `Z` as a string, so a service ordering uploads by name would
/// misplace every file from the 27th on. Use [`HrtimeIndex`] for longer lists.
#[derive(Debug, Clone, Default)]
pub struct AlphaIndex {
    count: u64,
}

impl AlphaIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndexGenerator for AlphaIndex {
    fn next_token(&mut self) -> String {
        self.count += 1;
        to_alpha(self.count)
    }
}

/// Nanoseconds on a monotonic clock, zero-padded to [`HRTIME_WIDTH`] digits.
///
/// Padding makes string order and numeric order agree. Two calls landing on
/// the same clock reading still yield distinct, increasing tokens.
#[derive(Debug, Clone, Default)]
pub struct HrtimeIndex {
    last: Option<u64>,
}

impl HrtimeIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndexGenerator for HrtimeIndex {
    fn next_token(&mut self) -> String {
        let mut now = monotonic_nanos();
        if let Some(last) = self.last {
            if now <= last {
                now = last + 1;
            }
        }
        self.last = Some(now);
        format!("{now:0width$}", width = HRTIME_WIDTH)
    }
}

fn monotonic_nanos() -> u64 {
    static ANCHOR: OnceLock<Instant> = OnceLock::new();
    let anchor = *ANCHOR.get_or_init(Instant::now);
    u64::try_from(anchor.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_tokens_sort_only_within_first_26() {
        let mut index = AlphaIndex::new();
        let tokens: Vec<String> = (0..27).map(|_| index.next_token()).collect();

        let first = &tokens[..26];
        assert!(first.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(tokens[25], "Z");
        assert_eq!(tokens[26], "AA");
        assert!(tokens[26] < tokens[25]);
    }

    #[test]
    fn alpha_table() {
        for (n, expected) in [
            (0, ""),
            (1, "A"),
            (2, "B"),
            (26, "Z"),
            (27, "AA"),
            (52, "AZ"),
            (53, "BA"),
            (702, "ZZ"),
            (703, "AAA"),
        ] {
            assert_eq!(to_alpha(n), expected, "index {n}");
        }
    }

    #[test]
    fn alpha_index_counts_from_one() {
        let mut index = AlphaIndex::new();
        let tokens: Vec<String> = (0..3).map(|_| index.next_token()).collect();
        assert_eq!(tokens, vec!["A", "B", "C"]);
    }

    #[test]
    fn hrtime_tokens_increase() {
        let mut index = HrtimeIndex::new();
        let tokens: Vec<String> = (0..100).map(|_| index.next_token()).collect();
        for pair in tokens.windows(2) {
            let prev: u64 = pair[0].parse().unwrap();
            let next: u64 = pair[1].parse().unwrap();
            assert!(next > prev, "{} !> {}", pair[1], pair[0]);
            assert!(pair[1] > pair[0], "lexicographic order broken");
        }
    }

    #[test]
    fn hrtime_tokens_are_fixed_width() {
        let mut index = HrtimeIndex::new();
        let token = index.next_token();
        assert_eq!(token.len(), HRTIME_WIDTH);
        assert!(token.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn closures_are_generators() {
        let mut tokens = vec!["Y".to_string(), "X".to_string()];
        let mut generator = move || tokens.pop().unwrap_or_default();
        assert_eq!(generator.next_token(), "X");
        assert_eq!(generator.next_token(), "Y");
    }
}
