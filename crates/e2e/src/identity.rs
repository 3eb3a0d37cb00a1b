//! Generated test identities
//!
//! The remote database is never reset, so every account a case registers
//! needs an address no earlier run has used. Randomness makes cross-run
//! collisions unlikely; the factory makes in-run collisions impossible.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 8;

/// Credentials for one registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIdentity {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Hands out identities with pairwise distinct emails
pub struct IdentityFactory {
    rng: StdRng,
    issued: HashSet<String>,
}

impl IdentityFactory {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic factory
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            issued: HashSet::new(),
        }
    }

    /// `test<8 lowercase-or-digit chars>@example.com`, never repeated
    pub fn email(&mut self) -> String {
        loop {
            let suffix: String = (0..SUFFIX_LEN)
                .map(|_| SUFFIX_CHARSET[self.rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
                .collect();
            let email = format!("test{}@example.com", suffix);
            if self.issued.insert(email.clone()) {
                return email;
            }
        }
    }

    pub fn identity(&mut self, name: &str, password: &str) -> GeneratedIdentity {
        GeneratedIdentity {
            name: name.to_string(),
            email: self.email(),
            password: password.to_string(),
        }
    }

    /// Number of emails handed out so far
    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}

impl Default for IdentityFactory {
    fn default() -> Self {
        Self::new()
    }
}
