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

//! The reconciler's registry of prepared storage state.

use std::collections::HashMap;

use super::StorageFlags;

/// Composite lookup key for one package's storage on one volume for one
/// user. Unique within the registry.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct RecordKey {
    /// Package name.
    pub package: String,
    /// User id.
    pub user: u32,
    /// Volume id.
    pub volume: String,
}

impl RecordKey {
    /// Creates a key.
    pub fn new(package: impl Into<String>, user: u32, volume: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            user,
            volume: volume.into(),
        }
    }
}

/// Per-package, per-user storage state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageDataRecord {
    /// Package name.
    pub package_name: String,
    /// User the data belongs to.
    pub user_id: u32,
    /// Volume the data lives on.
    pub volume_id: String,
    /// Which storage classes have been prepared.
    pub storage_classes: StorageFlags,
    /// Inode of the credential-encrypted data root, 0 when unknown.
    pub ce_data_inode: i64,
    /// Security label applied to the directories.
    pub se_label: String,
}

/// Owns every [`PackageDataRecord`]; records are created when storage is
/// prepared and removed on destroy.
///
/// Passed by reference into reconciler operations instead of living as
/// ambient global state.
#[derive(Default)]
pub struct Registry {
    records: HashMap<RecordKey, PackageDataRecord>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record for its key.
    pub fn upsert(&mut self, record: PackageDataRecord) {
        let key = RecordKey::new(
            record.package_name.clone(),
            record.user_id,
            record.volume_id.clone(),
        );
        self.records.insert(key, record);
    }

    /// Looks up a record.
    pub fn get(&self, key: &RecordKey) -> Option<&PackageDataRecord> {
        self.records.get(key)
    }

    /// Removes a record, returning it when present.
    pub fn remove(&mut self, key: &RecordKey) -> Option<PackageDataRecord> {
        self.records.remove(key)
    }

    /// Returns the CE data inode for a key, 0 when unknown.
    pub fn ce_inode(&self, key: &RecordKey) -> i64 {
        self.records.get(key).map(|r| r.ce_data_inode).unwrap_or(0)
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no record is held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
