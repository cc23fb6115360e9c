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

//! Per-user, per-volume application data management.

pub(crate) mod batch;
pub(crate) mod record;
pub(crate) mod reconciler;

pub use record::{PackageDataRecord, RecordKey, Registry};

use core::fmt;
use std::ops::BitOr;

/// Bitset of storage classes an operation applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StorageFlags(u32);

impl StorageFlags {
    /// Device-encrypted storage, available before user authentication.
    pub const DE: Self = Self(1);
    /// Credential-encrypted storage, available only after unlock.
    pub const CE: Self = Self(1 << 1);

    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns `true` if every class in `other` is present in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no class is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for StorageFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for StorageFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// How file-based encryption is provided on the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FbeMode {
    /// Per-user CE keys managed by the kernel.
    Native,
    /// CE key lifecycle emulated in software on unencrypted media.
    Emulated,
    /// Legacy full-disk encryption, no per-user CE keys.
    Legacy,
}

impl FbeMode {
    /// Returns `true` when the device has per-user CE storage, native or
    /// emulated. Locked CE directories must never be touched on such
    /// devices.
    pub fn has_file_encryption(self) -> bool {
        !matches!(self, FbeMode::Legacy)
    }
}

/// A single storage class, used when scanning on-disk listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageClass {
    /// Device-encrypted.
    De,
    /// Credential-encrypted.
    Ce,
}

impl StorageClass {
    /// The flag bit for this class.
    pub fn flag(self) -> StorageFlags {
        match self {
            StorageClass::De => StorageFlags::DE,
            StorageClass::Ce => StorageFlags::CE,
        }
    }
}
