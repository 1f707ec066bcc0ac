use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Token;

/// Supplies fresh tokens for the initial fill and for top-row refills.
pub trait TokenSource: Send {
    /// Draws one token from a palette of `palette_size` colors.
    /// A zero palette is treated as a single color.
    fn next_token(&mut self, palette_size: u8) -> Token;
}

/// Uniform draws from a seeded `StdRng`. Same seed, same board.
#[derive(Debug, Clone)]
pub struct SeededTokenSource {
    rng: StdRng,
}

impl SeededTokenSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TokenSource for SeededTokenSource {
    fn next_token(&mut self, palette_size: u8) -> Token {
        Token::new(self.rng.gen_range(0..palette_size.max(1)))
    }
}

/// Replays a fixed token sequence, wrapping around at the end.
/// Values are reduced modulo the requested palette.
#[derive(Debug, Clone)]
pub struct ScriptedTokenSource {
    script: Vec<u8>,
    cursor: usize,
}

impl ScriptedTokenSource {
    pub fn new(script: Vec<u8>) -> Self {
        Self { script, cursor: 0 }
    }

    /// Number of tokens drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl TokenSource for ScriptedTokenSource {
    fn next_token(&mut self, palette_size: u8) -> Token {
        let value = if self.script.is_empty() {
            0
        } else {
            self.script[self.cursor % self.script.len()]
        };
        self.cursor += 1;
        Token::new(value % palette_size.max(1))
    }
}
