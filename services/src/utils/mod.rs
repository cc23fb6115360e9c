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

//! Utility helpers shared across the mirror service.

pub(crate) mod generator;

use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::oneshot::Receiver;
use tokio::task::JoinHandle;

/// A wrapper around a oneshot receiver that provides a blocking API.
///
/// Callers on the service interface block on the manager loop's reply
/// without having to be async themselves.
pub(crate) struct Recv<T> {
    rx: Receiver<T>,
}

impl<T> Recv<T> {
    pub(crate) fn new(rx: Receiver<T>) -> Self {
        Self { rx }
    }

    /// Retrieves the value, blocking the current thread.
    ///
    /// Returns `None` if the sender was dropped before replying.
    pub(crate) fn get(self) -> Option<T> {
        self.rx.blocking_recv().ok()
    }
}

/// Retrieves the current system time as milliseconds since UNIX EPOCH.
///
/// # Panics
///
/// Panics if the system time is set before the UNIX EPOCH.
pub(crate) fn get_current_timestamp() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(n) => n.as_millis() as u64,
        Err(_) => panic!("SystemTime before UNIX EPOCH!"),
    }
}

/// Spawns a future on the runtime, returning a join handle.
pub(crate) fn runtime_spawn<F: Future<Output = ()> + Send + 'static>(fut: F) -> JoinHandle<()> {
    tokio::spawn(fut)
}
