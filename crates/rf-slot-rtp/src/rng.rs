//! Random source capability
//!
//! The engine needs exactly one primitive: a uniform integer in `[0, bound)`.
//! Anything implementing [`RandomSource`] can drive a run; production runs
//! use [`SeededSource`] over ChaCha8.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{RtpError, RtpResult};

/// Uniform integer supplier
pub trait RandomSource {
    /// Draw an integer uniformly from `[0, bound)`
    fn next_int(&mut self, bound: u32) -> RtpResult<u32>;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_int(&mut self, bound: u32) -> RtpResult<u32> {
        (**self).next_int(bound)
    }
}

/// Adapter from any `rand` generator to [`RandomSource`]
#[derive(Debug, Clone)]
pub struct SeededSource<R: RngCore = ChaCha8Rng> {
    rng: R,
}

impl SeededSource<ChaCha8Rng> {
    /// ChaCha8 source, seeded for reproducible runs or from OS entropy
    pub fn chacha(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self { rng }
    }

    /// ChaCha8 source on its own stream
    ///
    /// Workers sharing a seed but using distinct `stream` values never
    /// overlap, which keeps rounds independent across threads.
    pub fn with_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng }
    }
}

impl<R: RngCore> RandomSource for SeededSource<R> {
    #[inline]
    fn next_int(&mut self, bound: u32) -> RtpResult<u32> {
        if bound == 0 {
            return Err(RtpError::InvalidRandomBound);
        }
        Ok(self.rng.random_range(0..bound))
    }
}

/// Replays a fixed list of draws, then reports exhaustion
///
/// Values are reduced modulo the requested bound so scripts stay valid for
/// any table size.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: std::collections::VecDeque<u32>,
    draws: usize,
}

impl ScriptedSource {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            draws: 0,
        }
    }

    /// Number of draws served so far
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Values still queued
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_int(&mut self, bound: u32) -> RtpResult<u32> {
        if bound == 0 {
            return Err(RtpError::InvalidRandomBound);
        }
        let value = self
            .values
            .pop_front()
            .ok_or(RtpError::RandomSourceExhausted)?;
        self.draws += 1;
        Ok(value % bound)
    }
}
