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

use super::*;

// @tc.name: ut_fast_random_nonconstant
// @tc.desc: Test fast_random does not return the same value repeatedly
// @tc.precon: NA
// @tc.step: 1. Generate a batch of random values
// 2. Verify at least two distinct values appear
// @tc.expect: Generated sequence contains more than one distinct value
// @tc.type: FUNC
// @tc.require: issueNumber
#[test]
fn ut_fast_random_nonconstant() {
    let first = fast_random();
    let distinct = (0..64).map(|_| fast_random()).any(|v| v != first);
    assert!(distinct);
}

// @tc.name: ut_fast_random_thread_local
// @tc.desc: Test fast_random works independently across threads
// @tc.precon: NA
// @tc.step: 1. Generate values on two different threads
// 2. Verify both threads produce values without panicking
// @tc.expect: Both threads complete and return values
// @tc.type: FUNC
// @tc.require: issueNumber
#[test]
fn ut_fast_random_thread_local() {
    let handle = std::thread::spawn(|| fast_random());
    let _local = fast_random();
    assert!(handle.join().is_ok());
}
