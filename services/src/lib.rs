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

//! Display Mirror Server Implementation.
//!
//! This system service maintains live mirror sessions of display content,
//! animates screen rotation transitions, and reconciles per-user application
//! data directories against the installed-package registry.

#![allow(unreachable_pub, clippy::new_without_default)]
#![warn(
    missing_docs,
    clippy::redundant_static_lifetimes,
    clippy::enum_variant_names,
    clippy::clone_on_copy,
    clippy::unused_async
)]

#[macro_use]
mod macros;

#[macro_use]
extern crate mirror_utils;

mod backend;
mod error;
mod geometry;
mod manage;
mod mirror;
mod rotation;
mod storage;
mod utils;

pub use backend::{
    GraphicsBackend, PackageRegistry, PixelBuffer, StorageBackend, SurfaceHandle, UserManager,
};
pub use error::{CaptureError, ErrorCode, StorageError};
pub use geometry::{delta_rotation, Point, Rect, Rotation, Size};
pub use manage::{MirrorManager, MirrorManagerTx};
pub use mirror::{
    event_channel, CaptureTarget, EventSender, MirrorEvent, ScalingPolicy, SessionState,
    SurfaceMirror, Transform,
};
pub use rotation::{
    Anim, AnimationHint, AnimationKind, Phase, RotationAnimation, RotationTransition,
    RotationTransitionAnimator, TransitionChange, MAX_ANIMATION_DURATION,
};
pub use storage::reconciler::AppStorageReconciler;
pub use storage::{FbeMode, PackageDataRecord, RecordKey, Registry, StorageClass, StorageFlags};

#[cfg(test)]
pub(crate) fn test_init() {
    mirror_utils::test_logger();
}
