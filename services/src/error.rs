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

use core::fmt;

/// Error codes surfaced to mirror service callers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorCode {
    /// Operation succeeded.
    ErrOk = 0,
    /// A caller-supplied parameter failed validation.
    ParameterCheck = 401,
    /// The capture target could not be resolved.
    InvalidTarget = 21910001,
    /// The referenced capture session does not exist.
    SessionNotFound = 21910002,
    /// The capture session was already stopped by its owner.
    SessionStopped = 21910003,
    /// Taking the pre-rotation screenshot failed.
    SnapshotUnavailable = 21910004,
    /// A storage backend operation failed.
    StorageBackendFailure = 21910005,
}

/// Failure reported by the graphics backend for capture operations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CaptureError {
    /// The compositor could not allocate a buffer or surface.
    OutOfResources,
    /// The captured region was removed while the call was in flight.
    TargetGone,
}

impl From<CaptureError> for ErrorCode {
    fn from(value: CaptureError) -> Self {
        match value {
            CaptureError::OutOfResources => ErrorCode::SnapshotUnavailable,
            CaptureError::TargetGone => ErrorCode::InvalidTarget,
        }
    }
}

impl std::error::Error for CaptureError {}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Failure reported by the storage backend.
///
/// The backend owns retries below this layer; the reconciler treats these as
/// per-item failures and keeps the batch going.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StorageError {
    /// Backend-specific error code.
    pub code: i32,
    /// Human-readable description.
    pub message: String,
}

impl StorageError {
    /// Creates an error with a backend code and description.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::error::Error for StorageError {}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "storage backend error {}: {}", self.code, self.message)
    }
}

impl From<StorageError> for ErrorCode {
    fn from(_value: StorageError) -> Self {
        ErrorCode::StorageBackendFailure
    }
}
