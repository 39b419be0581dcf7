//! Random name generation for objects stamped out from templates.

use std::sync::{Mutex, OnceLock};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Suffix alphabet. Vowels and look-alike digits are omitted so random
/// suffixes cannot spell words.
const ALPHANUMS: &[u8] = b"bcdfghjklmnpqrstvwxz2456789";

const MAX_NAME_LENGTH: usize = 63;
const RANDOM_LENGTH: usize = 5;

/// Longest base that still leaves room for the random suffix.
pub const MAX_GENERATED_NAME_LENGTH: usize = MAX_NAME_LENGTH - RANDOM_LENGTH;

fn rng() -> &'static Mutex<StdRng> {
    static RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();
    RNG.get_or_init(|| Mutex::new(StdRng::from_entropy()))
}

/// Appends a five character random suffix to `base`, truncating the base
/// first so the result never exceeds the 63 character name limit.
pub fn generate_name(base: &str) -> String {
    let mut base = base;
    if base.len() > MAX_GENERATED_NAME_LENGTH {
        let mut end = MAX_GENERATED_NAME_LENGTH;
        while !base.is_char_boundary(end) {
            end -= 1;
        }
        base = &base[..end];
    }
    format!("{base}{}", random_string(RANDOM_LENGTH))
}

/// Random string of length `n` over the suffix alphabet.
pub fn random_string(n: usize) -> String {
    let mut rng = rng().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    (0..n)
        .map(|_| ALPHANUMS[rng.gen_range(0..ALPHANUMS.len())] as char)
        .collect()
}

/// Uniform index below `len`, drawn from the shared generator. `len` must
/// be non-zero.
pub fn random_index(len: usize) -> usize {
    let mut rng = rng().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    rng.gen_range(0..len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_uses_only_the_alphabet() {
        for _ in 0..100 {
            let suffix = random_string(RANDOM_LENGTH);
            assert_eq!(suffix.len(), RANDOM_LENGTH);
            assert!(suffix.bytes().all(|b| ALPHANUMS.contains(&b)), "{suffix}");
        }
    }

    #[test]
    fn generated_names_keep_the_base() {
        let name = generate_name("frontend-");
        assert!(name.starts_with("frontend-"));
        assert_eq!(name.len(), "frontend-".len() + RANDOM_LENGTH);
    }

    #[test]
    fn long_bases_are_truncated_to_the_limit() {
        let base = "x".repeat(MAX_NAME_LENGTH + 10);
        let name = generate_name(&base);
        assert_eq!(name.len(), MAX_NAME_LENGTH);
        assert!(name.starts_with(&"x".repeat(MAX_GENERATED_NAME_LENGTH)));
    }

    #[test]
    fn random_index_stays_in_range() {
        for _ in 0..100 {
            assert!(random_index(3) < 3);
        }
        assert_eq!(random_index(1), 0);
    }
}
