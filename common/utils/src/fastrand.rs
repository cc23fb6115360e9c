// Copyright (C) 2024 Huawei Device Co., Ltd.
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A simple fast pseudorandom implementation.
//!
//! Thread-local xorshift* generator producing values over the full `u64`
//! range. Not suitable for cryptographic use.
//!
//! Reference: xorshift* <https://dl.acm.org/doi/10.1145/2845077>

use std::cell::Cell;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::num::Wrapping;

/// Generates a pseudorandom 64-bit unsigned integer.
///
/// # Examples
///
/// ```rust
/// use mirror_utils::fastrand::fast_random;
///
/// let value = fast_random();
/// let bounded = value % 100; // value in [0, 99]
/// ```
pub fn fast_random() -> u64 {
    thread_local! {
        static RNG: Cell<Wrapping<u64>> = Cell::new(Wrapping(seed()));
    }

    RNG.with(|rng| {
        let mut s = rng.get();
        s ^= s >> 12;
        s ^= s << 25;
        s ^= s >> 27;
        rng.set(s);
        // Multiply by a large prime to improve distribution properties
        s.0.wrapping_mul(0x2545_f491_4f6c_dd1d)
    })
}

// Xorshift* requires a non-zero seed to generate a proper sequence.
fn seed() -> u64 {
    let seed = RandomState::new();

    let mut out = 0;
    let mut count = 0;
    while out == 0 {
        count += 1;
        let mut hasher = seed.build_hasher();
        hasher.write_usize(count);
        out = hasher.finish();
    }
    out
}
