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

use std::collections::HashSet;

use super::*;

// @tc.name: ut_generator_spread
// @tc.desc: Test that generated handles are well spread
// @tc.precon: NA
// @tc.step: 1. Generate a batch of handles
// @tc.expect: No collisions within the batch
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_generator_spread() {
    let handles: HashSet<u64> = (0..256).map(|_| HandleGenerator::generate()).collect();
    assert_eq!(handles.len(), 256);
}
