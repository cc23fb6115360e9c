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

//! Backend collaborator interfaces.
//!
//! The mirror service never talks to the compositor, the filesystem, or the
//! package database directly; everything goes through the traits defined
//! here, injected at construction time. Tests substitute mocks.

use crate::error::{CaptureError, StorageError};
use crate::geometry::{Rect, Size};
use crate::mirror::transform::Transform;
use crate::mirror::CaptureTarget;
use crate::storage::{StorageClass, StorageFlags};

/// Opaque handle to a compositor surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceHandle(pub u64);

/// An owned pixel buffer returned by a capture call.
///
/// The holder is responsible for handing the buffer back to the graphics
/// backend via [`GraphicsBackend::release_buffer`] exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Backend identifier of the buffer.
    pub id: u64,
    /// Buffer dimensions.
    pub size: Size,
}

/// Compositor operations consumed by the mirror and rotation subsystems.
pub trait GraphicsBackend: Send + Sync {
    /// Resolves a capture target to its current bounds, or `None` if the
    /// target is unknown or has been removed.
    fn resolve_target(&self, target: &CaptureTarget) -> Option<Rect>;

    /// Captures the pixels of a region (or the whole output when `None`).
    fn capture_region(&self, bounds: Option<Rect>) -> Result<PixelBuffer, CaptureError>;

    /// Creates a mirror surface writing into a destination buffer of the
    /// given size.
    fn create_mirror_surface(&self, size: Size) -> Result<SurfaceHandle, CaptureError>;

    /// Applies a scale/offset transform to a surface.
    fn set_transform(&self, handle: SurfaceHandle, transform: &Transform);

    /// Crops a surface's content to the given size.
    fn set_crop(&self, handle: SurfaceHandle, size: Size);

    /// Makes a surface visible.
    fn show(&self, handle: SurfaceHandle);

    /// Hides a surface without releasing it.
    fn hide(&self, handle: SurfaceHandle);

    /// Releases a surface and its compositor resources.
    fn release_surface(&self, handle: SurfaceHandle);

    /// Returns a captured buffer to the backend.
    fn release_buffer(&self, buffer: PixelBuffer);

    /// Samples the border brightness of a captured buffer, in `[0, 1]`.
    fn buffer_luma(&self, buffer: &PixelBuffer) -> f32;
}

/// Filesystem operations for per-package data directories.
pub trait StorageBackend: Send + Sync {
    /// Creates (or repairs) the data directories for a package, returning
    /// the inode of the credential-encrypted root when CE storage was
    /// requested.
    fn create_data_dir(
        &self,
        volume: &str,
        package: &str,
        user: u32,
        flags: StorageFlags,
        se_label: &str,
    ) -> Result<i64, StorageError>;

    /// Destroys the data directories for a package.
    fn destroy_data_dir(
        &self,
        volume: &str,
        package: &str,
        user: u32,
        flags: StorageFlags,
        ce_data_inode: i64,
    ) -> Result<(), StorageError>;

    /// Clears the contents of a package's data directories, keeping the
    /// directories themselves.
    fn clear_data_dir(
        &self,
        volume: &str,
        package: &str,
        user: u32,
        flags: StorageFlags,
        ce_data_inode: i64,
    ) -> Result<(), StorageError>;

    /// Moves a package's data between storage classes.
    fn migrate_data_dir(
        &self,
        volume: &str,
        package: &str,
        user: u32,
        target: StorageFlags,
    ) -> Result<(), StorageError>;

    /// Lists the package directory names present for one storage class.
    fn list_data_dirs(&self, volume: &str, user: u32, class: StorageClass) -> Vec<String>;

    /// Repairs ownership and labels across a whole volume.
    fn fixup(&self, volume: &str, flags: StorageFlags) -> Result<(), StorageError>;
}

/// Read-only view of the installed-package registry.
pub trait PackageRegistry: Send + Sync {
    /// Returns `true` if the package is installed for the user.
    fn is_installed(&self, package: &str, user: u32) -> bool;

    /// Returns the volume a package's data lives on, or `None` for unknown
    /// packages.
    fn volume_id(&self, package: &str) -> Option<String>;

    /// Returns the security label to apply to the package's directories.
    fn se_label(&self, package: &str) -> String;

    /// Returns `true` for packages shipped with the system image.
    fn is_system(&self, package: &str) -> bool;

    /// Returns `true` if the package opted into device-protected storage as
    /// its default.
    fn default_to_device_protected(&self, package: &str) -> bool;

    /// Lists every package whose data belongs on the given volume.
    fn known_packages(&self, volume: &str) -> Vec<String>;

    /// Maps a possibly-renamed package directory name to the current
    /// package name.
    fn resolve_renamed(&self, package: &str) -> Option<String>;
}

/// Read-only view of user lifecycle state.
pub trait UserManager: Send + Sync {
    /// Lists all known users.
    fn users(&self) -> Vec<u32>;

    /// Returns `true` if the user is running.
    fn is_user_running(&self, user: u32) -> bool;

    /// Returns `true` if the user's storage key is unlocked.
    fn is_user_unlocked(&self, user: u32) -> bool;

    /// Returns `true` if the user's credential-encrypted storage has been
    /// prepared.
    fn is_ce_storage_prepared(&self, user: u32) -> bool;
}
