// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use libfuzzer_sys::fuzz_target;
use thumbscore::classify::classify;
use thumbscore::scoring::decode_response;

fuzz_target!(|data: &[u8]| {
    if let Ok(result) = decode_response(data) {
        assert!((0.0..=100.0).contains(&result.score));
        for (_, value) in result.breakdown.iter() {
            assert!((0.0..=100.0).contains(&value));
            let _ = classify(value);
        }
    }
});
