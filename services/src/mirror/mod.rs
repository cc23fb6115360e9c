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

//! Live mirroring of display content into client-provided surfaces.
//!
//! A [`SurfaceMirror`] owns every active [`session::CaptureSession`] and
//! serializes their state transitions; all compositor work goes through the
//! injected [`GraphicsBackend`].

pub(crate) mod notify;
pub(crate) mod session;
pub(crate) mod transform;

use std::collections::HashMap;
use std::sync::Arc;

pub use notify::{event_channel, EventSender, MirrorEvent};
pub use session::SessionState;
pub use transform::{ScalingPolicy, Transform};

use session::CaptureSession;

use crate::backend::GraphicsBackend;
use crate::error::ErrorCode;
use crate::geometry::{Rect, Size};
use crate::utils::{generator::HandleGenerator, get_current_timestamp};

/// What a capture session records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureTarget {
    /// Mirror everything shown on a display.
    WholeDisplay {
        /// Identifier of the display to mirror.
        display_id: u32,
    },
    /// Mirror a single region (task or window) of a display.
    SingleRegion {
        /// Identifier of the region to mirror.
        region_id: u32,
        /// Optional crop overriding the region's own bounds.
        bounds_override: Option<Rect>,
    },
}

/// Owns and drives all capture sessions.
pub struct SurfaceMirror {
    graphics: Arc<dyn GraphicsBackend>,
    sessions: HashMap<u32, CaptureSession>,
    events: EventSender,
}

impl SurfaceMirror {
    /// Creates a mirror bound to a graphics backend and a client event
    /// stream.
    pub fn new(graphics: Arc<dyn GraphicsBackend>, events: EventSender) -> Self {
        Self {
            graphics,
            sessions: HashMap::new(),
            events,
        }
    }

    /// Starts capturing `target` into an output surface of `output_size`.
    ///
    /// On success the session enters `Recording` with its initial transform
    /// applied. Fails with `InvalidTarget` when the target cannot be
    /// resolved or the mirror surface cannot be created.
    pub fn start_capture(
        &mut self,
        target: CaptureTarget,
        output_size: Size,
        policy: ScalingPolicy,
    ) -> Result<u32, ErrorCode> {
        if output_size.is_empty() {
            error!("start_capture with empty output size");
            return Err(ErrorCode::ParameterCheck);
        }
        let content_bounds = match self.graphics.resolve_target(&target) {
            Some(bounds) => bounds,
            None => {
                info!("start_capture: unable to resolve target {:?}", target);
                return Err(ErrorCode::InvalidTarget);
            }
        };

        let handle = match self.graphics.create_mirror_surface(output_size) {
            Ok(handle) => handle,
            Err(e) => {
                error!("start_capture: mirror surface creation failed: {}", e);
                return Err(ErrorCode::InvalidTarget);
            }
        };

        let session_id = self.generate_session_id();
        let mut session = CaptureSession::new(target, output_size, policy);
        session.mirror = Some(handle);
        session.state = SessionState::Recording;

        // Crop out anything larger than the recorded content, then scale
        // and center it into the output surface.
        self.graphics.set_crop(handle, content_bounds.size());
        if let Some(transform) =
            Transform::fit(content_bounds.size(), output_size, policy)
        {
            self.graphics.set_transform(handle, &transform);
            session.last_transform = transform;
        }
        self.graphics.show(handle);
        session.last_known_content_bounds = Some(content_bounds);

        info!(
            "capture session {} recording {:?} into {:?}",
            session_id, session.target, output_size
        );
        self.sessions.insert(session_id, session);
        Ok(session_id)
    }

    /// Recomputes the session transform for new content bounds.
    ///
    /// Zero-sized bounds are absorbed silently and the last transform kept;
    /// they are an expected transient during layout churn. Bounds equal to
    /// the last observed ones are also a no-op.
    pub fn update_transform(
        &mut self,
        session_id: u32,
        new_content_bounds: Rect,
    ) -> Result<(), ErrorCode> {
        let graphics = self.graphics.clone();
        let events = self.events.clone();
        let session = self.session_mut(session_id)?;

        if new_content_bounds.is_empty() {
            debug!(
                "session {} ignoring zero-sized bounds {:?}",
                session_id, new_content_bounds
            );
            return Ok(());
        }
        if session.last_known_content_bounds == Some(new_content_bounds) {
            return Ok(());
        }

        if let Some(transform) = Transform::fit(
            new_content_bounds.size(),
            session.output_surface_size,
            session.policy,
        ) {
            if let Some(handle) = session.mirror {
                graphics.set_crop(handle, new_content_bounds.size());
                graphics.set_transform(handle, &transform);
            }
            session.last_transform = transform;
        }
        session.last_known_content_bounds = Some(new_content_bounds);
        events.content_resized(
            session_id,
            new_content_bounds.width,
            new_content_bounds.height,
        );
        Ok(())
    }

    /// Suspends mirroring, releasing the mirror surface but keeping the
    /// session resumable. No-op when already paused.
    pub fn pause(&mut self, session_id: u32) -> Result<(), ErrorCode> {
        let graphics = self.graphics.clone();
        let session = self.session_mut(session_id)?;
        match session.state {
            SessionState::Paused => Ok(()),
            _ => {
                if let Some(handle) = session.mirror.take() {
                    graphics.release_surface(handle);
                }
                session.state = SessionState::Paused;
                info!("capture session {} paused", session_id);
                Ok(())
            }
        }
    }

    /// Resumes a paused session, recreating the mirror surface and
    /// re-applying the last transform. No-op when already recording.
    pub fn resume(&mut self, session_id: u32) -> Result<(), ErrorCode> {
        let graphics = self.graphics.clone();
        let session = self.session_mut(session_id)?;
        if session.state == SessionState::Recording {
            return Ok(());
        }

        let handle = cvt_res_error!(
            graphics
                .create_mirror_surface(session.output_surface_size)
                .map_err(|_| ErrorCode::InvalidTarget),
            "session {} resume: mirror surface creation failed",
            session_id
        );
        if let Some(bounds) = session.last_known_content_bounds {
            graphics.set_crop(handle, bounds.size());
        }
        graphics.set_transform(handle, &session.last_transform);
        graphics.show(handle);
        session.mirror = Some(handle);
        session.state = SessionState::Recording;
        info!("capture session {} resumed", session_id);
        Ok(())
    }

    /// Stops the session permanently and releases its mirror resource.
    /// Every later operation on the session fails with `SessionStopped`.
    pub fn stop(&mut self, session_id: u32) -> Result<(), ErrorCode> {
        let graphics = self.graphics.clone();
        let session = self.session_mut(session_id)?;
        if let Some(handle) = session.mirror.take() {
            graphics.release_surface(handle);
        }
        session.state = SessionState::Stopped;
        session.generation += 1;
        info!(
            "capture session {} stopped after {}ms",
            session_id,
            get_current_timestamp().saturating_sub(session.created_at)
        );
        Ok(())
    }

    /// Reports a visibility change of the mirrored content.
    ///
    /// Forwards to the compositor and notifies the owning client, at most
    /// once per actual transition.
    pub fn set_content_visibility(
        &mut self,
        session_id: u32,
        visible: bool,
    ) -> Result<(), ErrorCode> {
        let graphics = self.graphics.clone();
        let events = self.events.clone();
        let session = self.session_mut(session_id)?;
        if !session.note_visibility(visible) {
            return Ok(());
        }
        if let Some(handle) = session.mirror {
            if visible {
                graphics.show(handle);
            } else {
                graphics.hide(handle);
            }
        }
        events.visibility_changed(session_id, visible);
        Ok(())
    }

    /// Pauses or resumes recording based on the output display's state:
    /// recording runs only while the display is on and has no content of
    /// its own.
    pub fn update_recording(
        &mut self,
        session_id: u32,
        display_has_own_content: bool,
        display_on: bool,
    ) -> Result<(), ErrorCode> {
        if display_has_own_content || !display_on {
            self.pause(session_id)
        } else {
            self.resume(session_id)
        }
    }

    /// Returns the session's current state.
    pub fn session_state(&self, session_id: u32) -> Result<SessionState, ErrorCode> {
        self.sessions
            .get(&session_id)
            .map(|s| s.state)
            .ok_or(ErrorCode::SessionNotFound)
    }

    /// Returns the session's stop generation, used to drop stale async
    /// results.
    pub(crate) fn generation(&self, session_id: u32) -> Option<u64> {
        self.sessions.get(&session_id).map(|s| s.generation)
    }

    /// Returns the last transform applied for the session.
    pub fn last_transform(&self, session_id: u32) -> Result<Transform, ErrorCode> {
        self.sessions
            .get(&session_id)
            .map(|s| s.last_transform)
            .ok_or(ErrorCode::SessionNotFound)
    }

    fn session_mut(&mut self, session_id: u32) -> Result<&mut CaptureSession, ErrorCode> {
        match self.sessions.get_mut(&session_id) {
            Some(session) if session.state == SessionState::Stopped => {
                Err(ErrorCode::SessionStopped)
            }
            Some(session) => Ok(session),
            None => Err(ErrorCode::SessionNotFound),
        }
    }

    fn generate_session_id(&self) -> u32 {
        loop {
            let id = HandleGenerator::generate() as u32;
            if !self.sessions.contains_key(&id) {
                return id;
            }
        }
    }
}
