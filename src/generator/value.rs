use super::normalize_range;
use rand::distr::{Alphanumeric, Distribution};
use rand::Rng;

/// Default length range for generated keys and values
pub const DEFAULT_LEN_RANGE: (usize, usize) = (2, 10);

/// Generator for one string at a time: either a pick from a fixed vocabulary
/// or a random alphanumeric string of random length.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueGen {
    Vocabulary(Vec<String>),
    Random { min_len: usize, max_len: usize },
}

impl ValueGen {
    /// A non-empty vocabulary wins; the length bounds only apply to random strings.
    pub fn new(vocabulary: Vec<String>, min_len: Option<usize>, max_len: Option<usize>) -> Self {
        if vocabulary.is_empty() {
            let (min_len, max_len) = normalize_range(min_len, max_len, DEFAULT_LEN_RANGE);
            ValueGen::Random { min_len, max_len }
        } else {
            ValueGen::Vocabulary(vocabulary)
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self {
            ValueGen::Vocabulary(values) => {
                let idx = rng.random_range(0..values.len());
                values[idx].clone()
            }
            ValueGen::Random { min_len, max_len } => {
                let len = rng.random_range(*min_len..=*max_len);
                random_string(rng, len)
            }
        }
    }
}

/// Random alphanumeric string of exactly `len` characters.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(Alphanumeric.sample(rng)))
        .collect()
}
