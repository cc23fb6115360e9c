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

//! The manager event loop serializing all mirror and rotation work.

pub(crate) mod events;

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use events::{MirrorManagerEvent, RotationEvent, ServiceEvent, StateEvent};

use crate::backend::GraphicsBackend;
use crate::error::ErrorCode;
use crate::geometry::{Rect, Size};
use crate::mirror::{CaptureTarget, EventSender, ScalingPolicy, SessionState, SurfaceMirror};
use crate::rotation::{RotationAnimation, RotationTransitionAnimator, TransitionChange};
use crate::utils::{runtime_spawn, Recv};

/// Single-threaded owner of the mirror sessions and rotation transitions.
///
/// All mutation is funneled through one event loop, so session state never
/// needs its own locking; clients talk to the loop through a
/// [`MirrorManagerTx`].
pub struct MirrorManager {
    pub(crate) mirror: SurfaceMirror,
    pub(crate) rotations: RotationTransitionAnimator,
    pub(crate) rx: MirrorManagerRx,
}

impl MirrorManager {
    /// Starts the manager loop and returns its event handle.
    pub fn init(graphics: Arc<dyn GraphicsBackend>, events: EventSender) -> MirrorManagerTx {
        debug!("MirrorManager init");

        let (tx, rx) = unbounded_channel();
        let tx = MirrorManagerTx::new(tx);
        let rx = MirrorManagerRx::new(rx);

        let manager = Self {
            mirror: SurfaceMirror::new(graphics.clone(), events),
            rotations: RotationTransitionAnimator::new(graphics),
            rx,
        };
        runtime_spawn(manager.run());
        tx
    }

    async fn run(mut self) {
        loop {
            let event = match self.rx.recv().await {
                Some(event) => event,
                None => {
                    info!("MirrorManager channel closed, loop exits");
                    break;
                }
            };

            match event {
                MirrorManagerEvent::Service(event) => self.handle_service_event(event),
                MirrorManagerEvent::State(event) => self.handle_state_event(event),
                MirrorManagerEvent::Rotation(event) => self.handle_rotation_event(event),
            }

            debug!("MirrorManager handles event finished");
        }
    }

    fn handle_service_event(&mut self, event: ServiceEvent) {
        debug!("MirrorManager handles service event {:?}", event);

        match event {
            ServiceEvent::StartCapture(target, size, policy, tx) => {
                let _ = tx.send(self.mirror.start_capture(target, size, policy));
            }
            ServiceEvent::Pause(session_id, tx) => {
                let _ = tx.send(reply_code(self.mirror.pause(session_id)));
            }
            ServiceEvent::Resume(session_id, tx) => {
                let _ = tx.send(reply_code(self.mirror.resume(session_id)));
            }
            ServiceEvent::Stop(session_id, tx) => {
                let _ = tx.send(reply_code(self.mirror.stop(session_id)));
            }
            ServiceEvent::SetVisibility(session_id, visible, tx) => {
                let _ = tx.send(reply_code(
                    self.mirror.set_content_visibility(session_id, visible),
                ));
            }
            ServiceEvent::QueryState(session_id, tx) => {
                let _ = tx.send(self.mirror.session_state(session_id));
            }
        }
    }

    // Content bounds changes retarget the mirror transform only. A rotation
    // transition in flight keeps its original geometry; restarting it here
    // would drop the snapshot mid-animation.
    fn handle_state_event(&mut self, event: StateEvent) {
        match event {
            StateEvent::BoundsChanged {
                session_id,
                bounds,
                generation,
            } => {
                if self.mirror.generation(session_id) != Some(generation) {
                    debug!(
                        "session {} dropping stale bounds change {:?}",
                        session_id, bounds
                    );
                    return;
                }
                if let Err(e) = self.mirror.update_transform(session_id, bounds) {
                    info!("session {} bounds change rejected: {:?}", session_id, e);
                }
            }
            StateEvent::DisplayChanged {
                session_id,
                has_own_content,
                display_on,
            } => {
                if let Err(e) =
                    self.mirror
                        .update_recording(session_id, has_own_content, display_on)
                {
                    info!("session {} display change rejected: {:?}", session_id, e);
                }
            }
        }
    }

    fn handle_rotation_event(&mut self, event: RotationEvent) {
        match event {
            RotationEvent::Begin(change, tx) => {
                let _ = tx.send(self.rotations.begin(*change));
            }
            RotationEvent::BuildAnimation(handle, duration_scale, tx) => {
                let _ = tx.send(self.rotations.build_animation(handle, duration_scale));
            }
            RotationEvent::Frame(handle, elapsed) => {
                self.rotations.on_frame(handle, elapsed);
            }
            RotationEvent::Complete(handle) => self.rotations.complete(handle),
            RotationEvent::Cancel(handle) => self.rotations.cancel(handle),
        }
    }
}

fn reply_code(res: Result<(), ErrorCode>) -> ErrorCode {
    match res {
        Ok(()) => ErrorCode::ErrOk,
        Err(code) => code,
    }
}

/// Sends events into the manager loop.
#[derive(Clone)]
pub struct MirrorManagerTx {
    tx: UnboundedSender<MirrorManagerEvent>,
}

impl MirrorManagerTx {
    pub(crate) fn new(tx: UnboundedSender<MirrorManagerEvent>) -> Self {
        Self { tx }
    }

    pub(crate) fn send_event(&self, event: MirrorManagerEvent) -> bool {
        if self.tx.send(event).is_err() {
            error!("MirrorManager event loop has shut down");
            return false;
        }
        true
    }

    /// Starts a capture session; blocks on the loop's reply.
    pub fn start_capture(
        &self,
        target: CaptureTarget,
        output_size: Size,
        policy: ScalingPolicy,
    ) -> Result<u32, ErrorCode> {
        let (event, rx) = MirrorManagerEvent::start_capture(target, output_size, policy);
        self.send_and_wait(event, rx)
            .unwrap_or(Err(ErrorCode::SessionNotFound))
    }

    /// Pauses a session.
    pub fn pause(&self, session_id: u32) -> ErrorCode {
        let (event, rx) = MirrorManagerEvent::pause(session_id);
        self.send_and_wait(event, rx)
            .unwrap_or(ErrorCode::SessionNotFound)
    }

    /// Resumes a paused session.
    pub fn resume(&self, session_id: u32) -> ErrorCode {
        let (event, rx) = MirrorManagerEvent::resume(session_id);
        self.send_and_wait(event, rx)
            .unwrap_or(ErrorCode::SessionNotFound)
    }

    /// Stops a session for good.
    pub fn stop(&self, session_id: u32) -> ErrorCode {
        let (event, rx) = MirrorManagerEvent::stop(session_id);
        self.send_and_wait(event, rx)
            .unwrap_or(ErrorCode::SessionNotFound)
    }

    /// Reports a visibility change of the mirrored content.
    pub fn set_visibility(&self, session_id: u32, visible: bool) -> ErrorCode {
        let (event, rx) = MirrorManagerEvent::set_visibility(session_id, visible);
        self.send_and_wait(event, rx)
            .unwrap_or(ErrorCode::SessionNotFound)
    }

    /// Queries a session's state.
    pub fn query_state(&self, session_id: u32) -> Result<SessionState, ErrorCode> {
        let (event, rx) = MirrorManagerEvent::query_state(session_id);
        self.send_and_wait(event, rx)
            .unwrap_or(Err(ErrorCode::SessionNotFound))
    }

    /// Reports new content bounds observed at `generation`.
    pub fn notify_bounds_changed(&self, session_id: u32, bounds: Rect, generation: u64) {
        self.send_event(MirrorManagerEvent::bounds_changed(
            session_id, bounds, generation,
        ));
    }

    /// Reports an output display state change.
    pub fn notify_display_changed(
        &self,
        session_id: u32,
        has_own_content: bool,
        display_on: bool,
    ) {
        self.send_event(MirrorManagerEvent::display_changed(
            session_id,
            has_own_content,
            display_on,
        ));
    }

    /// Begins a rotation transition, returning its handle.
    pub fn begin_rotation(&self, change: TransitionChange) -> Option<u64> {
        let (event, rx) = MirrorManagerEvent::begin_rotation(change);
        self.send_and_wait(event, rx)
    }

    /// Builds the timed animations for a rotation transition.
    pub fn build_rotation_animation(
        &self,
        handle: u64,
        duration_scale: f32,
    ) -> Option<RotationAnimation> {
        let (event, rx) = MirrorManagerEvent::build_rotation_animation(handle, duration_scale);
        self.send_and_wait(event, rx).flatten()
    }

    /// Advances a rotation transition by the frame clock.
    pub fn rotation_frame(&self, handle: u64, elapsed: Duration) {
        self.send_event(MirrorManagerEvent::rotation_frame(handle, elapsed));
    }

    /// Completes a rotation transition.
    pub fn complete_rotation(&self, handle: u64) {
        self.send_event(MirrorManagerEvent::complete_rotation(handle));
    }

    /// Cancels a rotation transition.
    pub fn cancel_rotation(&self, handle: u64) {
        self.send_event(MirrorManagerEvent::cancel_rotation(handle));
    }

    fn send_and_wait<T>(&self, event: MirrorManagerEvent, rx: Recv<T>) -> Option<T> {
        if !self.send_event(event) {
            return None;
        }
        rx.get()
    }
}

pub(crate) struct MirrorManagerRx {
    rx: UnboundedReceiver<MirrorManagerEvent>,
}

impl MirrorManagerRx {
    fn new(rx: UnboundedReceiver<MirrorManagerEvent>) -> Self {
        Self { rx }
    }
}

impl Deref for MirrorManagerRx {
    type Target = UnboundedReceiver<MirrorManagerEvent>;

    fn deref(&self) -> &Self::Target {
        &self.rx
    }
}

impl DerefMut for MirrorManagerRx {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.rx
    }
}
