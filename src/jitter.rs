// src/jitter.rs

//! Host-stable start delay.
//!
//! Every host draws its delay from a generator seeded with a hash of its own
//! hostname: a given box runs the job at the same offset every time, while a
//! fleet running the same crontab spreads out across the window.

use std::io;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Delay in whole seconds, uniformly drawn from `[0, bound)`.
///
/// A zero bound (or one shorter than a second) returns zero without
/// consulting the generator.
pub fn compute_delay(bound: Duration, hostname: &str) -> Duration {
    let bound_secs = bound.as_secs();
    if bound_secs == 0 {
        return Duration::ZERO;
    }

    let mut rng = StdRng::seed_from_u64(host_seed(hostname));
    Duration::from_secs(rng.gen_range(0..bound_secs))
}

/// First eight bytes of the hostname's BLAKE3 digest.
pub fn host_seed(hostname: &str) -> u64 {
    let digest = blake3::hash(hostname.as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_be_bytes(seed)
}

/// The local machine's hostname.
///
/// A name that is not valid UTF-8 is converted lossily; only its bytes feed
/// the seed, so the delay stays stable either way.
pub fn hostname() -> io::Result<String> {
    let name = ::hostname::get()?;
    Ok(name.to_string_lossy().into_owned())
}
