//! Deterministic rng for battle tests, shared with the integration tests.

use std::collections::VecDeque;

use rand::RngCore;

/// Rng whose `random_bool(0.5)` calls return the scripted answers in order (then `false`).
pub struct Scripted(VecDeque<bool>);

impl Scripted {
    pub fn new(rolls: &[bool]) -> Self {
        Scripted(rolls.iter().copied().collect())
    }
}

impl RngCore for Scripted {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        if self.0.pop_front().unwrap_or(false) { 0 } else { u64::MAX }
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}
