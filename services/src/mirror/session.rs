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

use super::transform::{ScalingPolicy, Transform};
use super::CaptureTarget;
use crate::backend::SurfaceHandle;
use crate::geometry::{Rect, Size};
use crate::utils::get_current_timestamp;

/// Lifecycle state of a capture session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Session created but the mirror surface is not attached yet.
    Uninitialized,
    /// Pixels are flowing into the output surface.
    Recording,
    /// Mirroring suspended; the session can be resumed.
    Paused,
    /// Terminal state; all further operations fail.
    Stopped,
}

/// One active mirroring session.
///
/// State mutations are serialized by the owning [`super::SurfaceMirror`];
/// the session itself is plain data plus bookkeeping helpers.
pub(crate) struct CaptureSession {
    pub(crate) target: CaptureTarget,
    pub(crate) output_surface_size: Size,
    pub(crate) state: SessionState,
    /// Valid whenever `state == Recording`.
    pub(crate) mirror: Option<SurfaceHandle>,
    pub(crate) last_known_content_bounds: Option<Rect>,
    pub(crate) last_transform: Transform,
    pub(crate) policy: ScalingPolicy,
    /// Dedup state for visibility notifications.
    pub(crate) last_visible: Option<bool>,
    /// Bumped on stop; stale async results carrying an older generation are
    /// dropped by the manager.
    pub(crate) generation: u64,
    /// Milliseconds since epoch at creation, for lifetime accounting.
    pub(crate) created_at: u64,
}

impl CaptureSession {
    pub(crate) fn new(
        target: CaptureTarget,
        output_surface_size: Size,
        policy: ScalingPolicy,
    ) -> Self {
        Self {
            target,
            output_surface_size,
            state: SessionState::Uninitialized,
            mirror: None,
            last_known_content_bounds: None,
            last_transform: Transform::identity(),
            policy,
            last_visible: None,
            generation: 0,
            created_at: get_current_timestamp(),
        }
    }

    pub(crate) fn is_recording(&self) -> bool {
        self.state == SessionState::Recording && self.mirror.is_some()
    }

    /// Records the observed visibility and reports whether it actually
    /// changed since the last observation.
    pub(crate) fn note_visibility(&mut self, visible: bool) -> bool {
        let changed = self.last_visible != Some(visible);
        self.last_visible = Some(visible);
        changed
    }
}
