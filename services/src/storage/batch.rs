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

//! Batched directory preparation with per-item recovery.

use super::StorageFlags;
use crate::backend::StorageBackend;

/// One queued directory-preparation request.
#[derive(Clone, Debug)]
pub(crate) struct PrepareOp {
    pub(crate) volume: String,
    pub(crate) package: String,
    pub(crate) user: u32,
    pub(crate) flags: StorageFlags,
    pub(crate) se_label: String,
}

/// Result of flushing one [`PrepareOp`].
///
/// `ce_data_inode` is `Some` when the directories exist after the flush
/// (zero unless CE storage was requested) and `None` when both the create
/// and the destroy-and-retry recovery failed.
pub(crate) struct PrepareOutcome {
    pub(crate) op: PrepareOp,
    pub(crate) ce_data_inode: Option<i64>,
}

/// Accumulates preparation requests so a whole volume (or install) is
/// flushed as one unit.
///
/// A failed item never aborts the batch: the partial directories are torn
/// down, the create is retried once, and the flush moves on either way.
#[derive(Default)]
pub(crate) struct InstallerBatch {
    ops: Vec<PrepareOp>,
}

impl InstallerBatch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn queue(&mut self, op: PrepareOp) {
        self.ops.push(op);
    }

    pub(crate) fn len(&self) -> usize {
        self.ops.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub(crate) fn flush(self, storage: &dyn StorageBackend) -> Vec<PrepareOutcome> {
        let mut outcomes = Vec::with_capacity(self.ops.len());
        for op in self.ops {
            let ce_data_inode = prepare_one(storage, &op);
            outcomes.push(PrepareOutcome { op, ce_data_inode });
        }
        outcomes
    }
}

fn prepare_one(storage: &dyn StorageBackend, op: &PrepareOp) -> Option<i64> {
    match storage.create_data_dir(&op.volume, &op.package, op.user, op.flags, &op.se_label) {
        Ok(inode) => Some(inode),
        Err(e) => {
            log_critical!(
                "Failed to prepare {} for user {}: {}",
                op.package,
                op.user,
                e
            );
            // Whatever half-created state is left behind would poison the
            // retry; tear it down first.
            if let Err(e) =
                storage.destroy_data_dir(&op.volume, &op.package, op.user, op.flags, 0)
            {
                warn!("cleanup before retry failed for {}: {}", op.package, e);
            }
            match storage.create_data_dir(&op.volume, &op.package, op.user, op.flags, &op.se_label)
            {
                Ok(inode) => {
                    info!("recovered storage for {} user {}", op.package, op.user);
                    Some(inode)
                }
                Err(e) => {
                    log_critical!(
                        "Recovery failed for {} user {}: {}",
                        op.package,
                        op.user,
                        e
                    );
                    None
                }
            }
        }
    }
}
