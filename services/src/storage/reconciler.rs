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

//! Reconciles on-disk per-package data directories with the package
//! registry: prepares what should exist, destroys what should not.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tokio::task::JoinHandle;

use super::batch::{InstallerBatch, PrepareOp};
use super::record::{PackageDataRecord, RecordKey, Registry};
use super::{FbeMode, StorageClass, StorageFlags};
use crate::backend::{PackageRegistry, StorageBackend, UserManager};

/// Volume id of the built-in storage.
pub const INTERNAL_VOLUME: &str = "internal";

/// The user that owns system package data.
pub const SYSTEM_USER: u32 = 0;

/// Keeps per-package data directories consistent with the set of installed
/// packages.
///
/// All filesystem and registry access goes through the injected backends;
/// the reconciler itself only holds its record registry and per-scope
/// install locks.
pub struct AppStorageReconciler {
    storage: Arc<dyn StorageBackend>,
    packages: Arc<dyn PackageRegistry>,
    users: Arc<dyn UserManager>,
    registry: RwLock<Registry>,
    install_locks: Mutex<HashMap<(String, u32), Arc<Mutex<()>>>>,
    fbe: FbeMode,
}

impl AppStorageReconciler {
    /// Creates a reconciler over the given backends.
    pub fn new(
        storage: Arc<dyn StorageBackend>,
        packages: Arc<dyn PackageRegistry>,
        users: Arc<dyn UserManager>,
        fbe: FbeMode,
    ) -> Self {
        Self {
            storage,
            packages,
            users,
            registry: RwLock::new(Registry::new()),
            install_locks: Mutex::new(HashMap::new()),
            fbe,
        }
    }

    /// Number of storage records currently tracked.
    pub fn record_count(&self) -> usize {
        self.registry.read().unwrap().len()
    }

    /// Returns the tracked CE inode for a package's data, 0 when unknown.
    pub fn ce_inode(&self, package: &str, user: u32, volume: &str) -> i64 {
        self.registry
            .read()
            .unwrap()
            .ce_inode(&RecordKey::new(package, user, volume))
    }

    fn install_lock(&self, volume: &str, user: u32) -> Arc<Mutex<()>> {
        let mut locks = self.install_locks.lock().unwrap();
        locks
            .entry((volume.to_string(), user))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn flags_for_user(&self, user: u32) -> Option<StorageFlags> {
        if self.users.is_user_unlocked(user) && self.users.is_ce_storage_prepared(user) {
            Some(StorageFlags::DE | StorageFlags::CE)
        } else if self.users.is_user_running(user) {
            Some(StorageFlags::DE)
        } else {
            None
        }
    }

    /// Prepares data directories for a freshly installed package, for every
    /// user whose storage is currently reachable. All users are flushed as
    /// one batch.
    pub fn prepare_after_install(&self, package: &str) {
        let volume = match self.packages.volume_id(package) {
            Some(volume) => volume,
            None => {
                error!("prepare requested for unknown package {}", package);
                return;
            }
        };
        let mut batch = InstallerBatch::new();
        let mut batch_users = Vec::new();
        for user in self.users.users() {
            if !self.packages.is_installed(package, user) {
                continue;
            }
            let flags = match self.flags_for_user(user) {
                Some(flags) => flags,
                None => continue,
            };
            batch.queue(PrepareOp {
                volume: volume.clone(),
                package: package.to_string(),
                user,
                flags,
                se_label: self.packages.se_label(package),
            });
            batch_users.push(user);
        }
        if batch.is_empty() {
            return;
        }
        // Guards are taken in ascending user order.
        batch_users.sort_unstable();
        let locks: Vec<_> = batch_users
            .into_iter()
            .map(|user| self.install_lock(&volume, user))
            .collect();
        let _guards: Vec<_> = locks.iter().map(|lock| lock.lock().unwrap()).collect();
        self.execute_batch(batch);
    }

    fn execute_batch(&self, batch: InstallerBatch) -> usize {
        if batch.is_empty() {
            return 0;
        }
        let outcomes = batch.flush(self.storage.as_ref());
        let mut prepared = 0;
        let mut registry = self.registry.write().unwrap();
        for outcome in outcomes {
            let inode = match outcome.ce_data_inode {
                Some(inode) => inode,
                None => continue,
            };
            prepared += 1;
            let op = outcome.op;
            registry.upsert(PackageDataRecord {
                package_name: op.package,
                user_id: op.user,
                volume_id: op.volume,
                storage_classes: op.flags,
                ce_data_inode: if op.flags.contains(StorageFlags::CE) {
                    inode
                } else {
                    0
                },
                se_label: op.se_label,
            });
        }
        prepared
    }

    /// Reconciles one user's data on one volume: destroys directories with
    /// no owning installed package, then prepares directories for every
    /// installed package, migrating system package data when asked.
    ///
    /// # Panics
    ///
    /// Panics when CE reconciliation is requested for a locked user on a
    /// device with per-user CE keys, native or emulated; the caller has
    /// violated the storage lifecycle and continuing would destroy every
    /// locked CE directory on the volume.
    pub fn reconcile_volume(&self, volume: &str, user: u32, flags: StorageFlags, migrate: bool) {
        if self.fbe.has_file_encryption()
            && flags.contains(StorageFlags::CE)
            && !self.users.is_ce_storage_prepared(user)
        {
            panic!(
                "attempted CE reconcile on {} before user {} storage was prepared",
                volume, user
            );
        }

        let lock = self.install_lock(volume, user);
        let _guard = lock.lock().unwrap();

        if flags.contains(StorageFlags::DE) {
            self.destroy_stale_dirs(volume, user, StorageClass::De);
        }
        if flags.contains(StorageFlags::CE) {
            self.destroy_stale_dirs(volume, user, StorageClass::Ce);
        }

        let mut batch = InstallerBatch::new();
        let mut candidates = Vec::new();
        for package in self.packages.known_packages(volume) {
            if !self.packages.is_installed(&package, user) {
                continue;
            }
            batch.queue(PrepareOp {
                volume: volume.to_string(),
                package: package.clone(),
                user,
                flags,
                se_label: self.packages.se_label(&package),
            });
            candidates.push(package);
        }
        let total = batch.len();
        let prepared = self.execute_batch(batch);
        info!(
            "reconciled {} on user {}: prepared {}/{} packages",
            volume, user, prepared, total
        );

        if migrate {
            for package in candidates {
                self.migrate_if_needed(&package, user);
            }
        }
    }

    fn destroy_stale_dirs(&self, volume: &str, user: u32, class: StorageClass) {
        for dir in self.storage.list_data_dirs(volume, user, class) {
            let package = self
                .packages
                .resolve_renamed(&dir)
                .unwrap_or_else(|| dir.clone());
            let home = self.packages.volume_id(&package);
            let stale = match home {
                Some(ref home) => home != volume || !self.packages.is_installed(&package, user),
                None => true,
            };
            if !stale {
                continue;
            }
            log_critical!(
                "Destroying orphaned {:?} data {} on {} for user {}",
                class,
                dir,
                volume,
                user
            );
            let inode = self.ce_inode(&package, user, volume);
            if let Err(e) =
                self.storage
                    .destroy_data_dir(volume, &dir, user, class.flag(), inode)
            {
                warn!("failed to destroy {} on {}: {}", dir, volume, e);
            }
        }
    }

    /// Moves a system package's data to its preferred storage class on
    /// devices that emulate file-based encryption. Returns `true` when a
    /// migration was issued.
    pub fn migrate_if_needed(&self, package: &str, user: u32) -> bool {
        if self.fbe != FbeMode::Emulated || !self.packages.is_system(package) {
            return false;
        }
        let volume = match self.packages.volume_id(package) {
            Some(volume) => volume,
            None => return false,
        };
        let target = if self.packages.default_to_device_protected(package) {
            StorageFlags::DE
        } else {
            StorageFlags::CE
        };
        if let Err(e) = self.storage.migrate_data_dir(&volume, package, user, target) {
            log_critical!("Failed to migrate {} for user {}: {}", package, user, e);
            return true;
        }
        // Migration moves files but does not re-label; run the create pass
        // again so ownership and labels are restored.
        let mut batch = InstallerBatch::new();
        batch.queue(PrepareOp {
            volume,
            package: package.to_string(),
            user,
            flags: StorageFlags::DE | StorageFlags::CE,
            se_label: self.packages.se_label(package),
        });
        self.execute_batch(batch);
        true
    }

    /// Clears the contents of a package's data directories. Tolerant of
    /// missing directories.
    pub fn clear_data(&self, package: &str, user: u32, flags: StorageFlags) {
        let volume = match self.packages.volume_id(package) {
            Some(volume) => volume,
            None => return,
        };
        let inode = self.ce_inode(package, user, &volume);
        if let Err(e) = self
            .storage
            .clear_data_dir(&volume, package, user, flags, inode)
        {
            warn!("clear of {} for user {} reported: {}", package, user, e);
        }
    }

    /// Destroys a package's data directories and forgets its record.
    /// Idempotent: a second destroy of the same data is a no-op beyond a
    /// warning from the backend.
    pub fn destroy_data(&self, package: &str, user: u32, flags: StorageFlags) {
        let volume = match self.packages.volume_id(package) {
            Some(volume) => volume,
            None => return,
        };
        let inode = self.ce_inode(package, user, &volume);
        if let Err(e) = self
            .storage
            .destroy_data_dir(&volume, package, user, flags, inode)
        {
            warn!("destroy of {} for user {} reported: {}", package, user, e);
        }
        self.registry
            .write()
            .unwrap()
            .remove(&RecordKey::new(package, user, volume));
    }

    /// Boot-time pass over the internal volume: reconciles the system
    /// user's data synchronously, then schedules the slow ownership and
    /// label repair off the boot path.
    pub fn fixup_on_boot(self: &Arc<Self>) -> JoinHandle<()> {
        // With per-user CE keys the system user may still be locked this
        // early in boot, so only DE is reconciled here.
        let flags = if self.fbe.has_file_encryption() {
            StorageFlags::DE
        } else {
            StorageFlags::DE | StorageFlags::CE
        };
        self.reconcile_volume(INTERNAL_VOLUME, SYSTEM_USER, flags, true);

        let this = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = this
                .storage
                .fixup(INTERNAL_VOLUME, StorageFlags::DE | StorageFlags::CE)
            {
                warn!("boot-time fixup reported: {}", e);
            }
        })
    }
}
