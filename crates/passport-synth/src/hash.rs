//! Stable string hashing for deterministic, seed-driven choices.
//!
//! Identical seeds always produce identical outputs across runs and
//! platforms, so cached passports and test expectations stay stable.

/// `h = h * 31 + unit (mod 2^32)` over the UTF-16 code units of `input`.
#[must_use]
pub fn stable_hash(input: &str) -> u32 {
    input
        .encode_utf16()
        .fold(0u32, |hash, unit| hash.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// `stable_hash(seed) % modulo`. A zero modulo yields zero.
#[must_use]
pub fn seeded_index(seed: &str, modulo: usize) -> usize {
    if modulo == 0 {
        return 0;
    }
    stable_hash(seed) as usize % modulo
}

/// Integer in `min..=max` chosen by `seed`.
#[must_use]
pub fn seeded_range(seed: &str, min: u32, max: u32) -> u32 {
    if max <= min {
        return min;
    }
    min + stable_hash(seed) % (max - min + 1)
}

/// Picks `count` distinct entries of `pool` by re-hashing `seed:i` for
/// `i = 0, 1, …`. Collisions move to the next free slot, so the result is
/// always `min(count, pool.len())` long.
#[must_use]
pub fn sample_distinct<'a, T>(seed: &str, pool: &'a [T], count: usize) -> Vec<&'a T> {
    let wanted = count.min(pool.len());
    let mut taken = vec![false; pool.len()];
    let mut picked = Vec::with_capacity(wanted);
    let mut round = 0usize;
    while picked.len() < wanted {
        let mut index = seeded_index(&format!("{seed}:{round}"), pool.len());
        while taken[index] {
            index = (index + 1) % pool.len();
        }
        taken[index] = true;
        picked.push(&pool[index]);
        round += 1;
    }
    picked
}
