//! Filler alphabets and source-character acceptance rules.

use rand::Rng;

const DIGITS: &[u8] = b"0123456789";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS_LOWER: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Character set random filler is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdAlphabet {
    /// `0-9`.
    Numeric,
    /// `a-z`.
    Alpha,
    /// `0-9` followed by `a-z`.
    AlphaNumeric,
}

impl IdAlphabet {
    /// The characters of this alphabet, as ASCII bytes.
    pub fn symbols(self) -> &'static [u8] {
        match self {
            Self::Numeric => DIGITS,
            Self::Alpha => LOWER,
            Self::AlphaNumeric => DIGITS_LOWER,
        }
    }

    /// `true` if `c` belongs to this alphabet.
    pub fn contains(self, c: char) -> bool {
        c.is_ascii() && self.symbols().contains(&(c as u8))
    }

    /// Draw one character uniformly at random.
    pub fn pick<R: Rng>(self, rng: &mut R) -> char {
        let symbols = self.symbols();
        symbols[rng.random_range(0..symbols.len())] as char
    }
}

/// Append `len` characters drawn independently and uniformly from
/// `alphabet` to `out`.
pub fn push_random<R: Rng>(out: &mut String, rng: &mut R, alphabet: IdAlphabet, len: usize) {
    out.reserve(len);
    for _ in 0..len {
        out.push(alphabet.pick(rng));
    }
}

/// A string of `len` characters drawn uniformly from `alphabet`.
pub fn random_string<R: Rng>(rng: &mut R, alphabet: IdAlphabet, len: usize) -> String {
    let mut out = String::with_capacity(len);
    push_random(&mut out, rng, alphabet, len);
    out
}

/// Which source characters a sample may keep.
#[derive(Clone, Copy, Debug, Default)]
pub enum AcceptChars {
    /// Every character.
    #[default]
    Any,
    /// Alphabetic or numeric characters, any case.
    LetterOrDigit,
    /// Letters, digits, and `:`, `_`, `-`.
    UriLike,
    /// A caller-supplied predicate.
    Custom(fn(char) -> bool),
}

impl AcceptChars {
    /// `true` if `c` may be kept.
    pub fn accepts(&self, c: char) -> bool {
        match self {
            Self::Any => true,
            Self::LetterOrDigit => c.is_alphanumeric(),
            Self::UriLike => c.is_alphanumeric() || matches!(c, ':' | '_' | '-'),
            Self::Custom(predicate) => predicate(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn alphabets_have_expected_sizes() {
        assert_eq!(IdAlphabet::Numeric.symbols().len(), 10);
        assert_eq!(IdAlphabet::Alpha.symbols().len(), 26);
        assert_eq!(IdAlphabet::AlphaNumeric.symbols().len(), 36);
        assert!(IdAlphabet::AlphaNumeric.contains('z'));
        assert!(!IdAlphabet::Alpha.contains('Z'));
        assert!(!IdAlphabet::Numeric.contains('ù'));
    }

    #[test]
    fn random_string_stays_in_alphabet() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for alphabet in [IdAlphabet::Numeric, IdAlphabet::Alpha, IdAlphabet::AlphaNumeric] {
            let s = random_string(&mut rng, alphabet, 64);
            assert_eq!(s.len(), 64);
            assert!(s.chars().all(|c| alphabet.contains(c)), "{s}");
        }
    }

    #[test]
    fn acceptance_rules() {
        assert!(AcceptChars::Any.accepts(' '));
        assert!(AcceptChars::LetterOrDigit.accepts('Ç'));
        assert!(!AcceptChars::LetterOrDigit.accepts(':'));
        assert!(AcceptChars::UriLike.accepts(':'));
        assert!(AcceptChars::UriLike.accepts('-'));
        assert!(!AcceptChars::UriLike.accepts(' '));
        assert!(AcceptChars::Custom(|c| c.is_ascii_uppercase()).accepts('Q'));
    }
}
