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

macro_rules! cvt_res_error {
    ($res: expr, $($args:tt)*) => {{
        match $res {
            Ok(value) => value,
            Err(e) => {
                error!($($args)*);
                error!("Error msg: {:?}", e);
                return Err(e);
            }
        }
    }}
}

// Failures on the storage recovery path must stay visible in release logs,
// even when the batch itself continues.
macro_rules! log_critical {
    ($($args:tt)*) => {{
        error!("CRITICAL: {}", format_args!($($args)*));
    }}
}
