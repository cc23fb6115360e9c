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

//! Common utilities for the mirror service.
//!
//! This crate provides the helpers shared by the mirror server: logging
//! macro re-exports, a fast pseudorandom generator used for handle
//! generation, and test logger setup.

#![warn(missing_docs)]
#![allow(clippy::new_without_default)]

/// Fast pseudorandom number generation utilities.
pub mod fastrand;

pub use log::{debug, error, info, warn};

/// Initializes the process-wide logger for test binaries.
///
/// Safe to call from multiple tests; only the first call takes effect.
pub fn test_logger() {
    static ONCE: std::sync::Once = std::sync::Once::new();
    ONCE.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
