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

use tokio::sync::oneshot::channel;

use super::*;

// @tc.name: ut_utils_recv_get
// @tc.desc: Test the blocking oneshot receiver wrapper
// @tc.precon: NA
// @tc.step: 1. Send a value and retrieve it through Recv
//           2. Drop a sender and retrieve from its Recv
// @tc.expect: The sent value comes back, a dropped sender yields None
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_utils_recv_get() {
    let (tx, rx) = channel::<u32>();
    tx.send(17).unwrap();
    assert_eq!(Recv::new(rx).get(), Some(17));

    let (tx, rx) = channel::<u32>();
    drop(tx);
    assert_eq!(Recv::new(rx).get(), None);
}

// @tc.name: ut_utils_get_current_timestamp
// @tc.desc: Test millisecond timestamp retrieval
// @tc.precon: NA
// @tc.step: 1. Take two timestamps in sequence
// @tc.expect: Timestamps are non-zero and non-decreasing
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_utils_get_current_timestamp() {
    let first = get_current_timestamp();
    let second = get_current_timestamp();
    assert!(first > 0);
    assert!(second >= first);
}
