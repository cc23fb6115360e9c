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

//! Events processed by the manager loop, with factory methods pairing each
//! request with its reply channel.

use std::time::Duration;

use tokio::sync::oneshot::{channel, Sender};

use crate::error::ErrorCode;
use crate::geometry::{Rect, Size};
use crate::mirror::{CaptureTarget, ScalingPolicy, SessionState};
use crate::rotation::{RotationAnimation, TransitionChange};
use crate::utils::Recv;

/// Every event the manager loop processes.
#[derive(Debug)]
pub(crate) enum MirrorManagerEvent {
    /// Client-initiated session operations.
    Service(ServiceEvent),
    /// Window-manager state changes.
    State(StateEvent),
    /// Rotation transition control.
    Rotation(RotationEvent),
}

#[derive(Debug)]
pub(crate) enum ServiceEvent {
    StartCapture(
        CaptureTarget,
        Size,
        ScalingPolicy,
        Sender<Result<u32, ErrorCode>>,
    ),
    Pause(u32, Sender<ErrorCode>),
    Resume(u32, Sender<ErrorCode>),
    Stop(u32, Sender<ErrorCode>),
    SetVisibility(u32, bool, Sender<ErrorCode>),
    QueryState(u32, Sender<Result<SessionState, ErrorCode>>),
}

#[derive(Debug)]
pub(crate) enum StateEvent {
    /// The mirrored content changed size or position. Carries the session
    /// generation observed when the change was queued so results that
    /// arrive after a stop are dropped.
    BoundsChanged {
        session_id: u32,
        bounds: Rect,
        generation: u64,
    },
    /// The output display turned on/off or gained/lost its own content.
    DisplayChanged {
        session_id: u32,
        has_own_content: bool,
        display_on: bool,
    },
}

#[derive(Debug)]
pub(crate) enum RotationEvent {
    Begin(Box<TransitionChange>, Sender<u64>),
    BuildAnimation(u64, f32, Sender<Option<RotationAnimation>>),
    Frame(u64, Duration),
    Complete(u64),
    Cancel(u64),
}

impl MirrorManagerEvent {
    pub(crate) fn start_capture(
        target: CaptureTarget,
        output_size: Size,
        policy: ScalingPolicy,
    ) -> (Self, Recv<Result<u32, ErrorCode>>) {
        let (tx, rx) = channel::<Result<u32, ErrorCode>>();
        (
            Self::Service(ServiceEvent::StartCapture(target, output_size, policy, tx)),
            Recv::new(rx),
        )
    }

    pub(crate) fn pause(session_id: u32) -> (Self, Recv<ErrorCode>) {
        let (tx, rx) = channel::<ErrorCode>();
        (Self::Service(ServiceEvent::Pause(session_id, tx)), Recv::new(rx))
    }

    pub(crate) fn resume(session_id: u32) -> (Self, Recv<ErrorCode>) {
        let (tx, rx) = channel::<ErrorCode>();
        (Self::Service(ServiceEvent::Resume(session_id, tx)), Recv::new(rx))
    }

    pub(crate) fn stop(session_id: u32) -> (Self, Recv<ErrorCode>) {
        let (tx, rx) = channel::<ErrorCode>();
        (Self::Service(ServiceEvent::Stop(session_id, tx)), Recv::new(rx))
    }

    pub(crate) fn set_visibility(session_id: u32, visible: bool) -> (Self, Recv<ErrorCode>) {
        let (tx, rx) = channel::<ErrorCode>();
        (
            Self::Service(ServiceEvent::SetVisibility(session_id, visible, tx)),
            Recv::new(rx),
        )
    }

    pub(crate) fn query_state(session_id: u32) -> (Self, Recv<Result<SessionState, ErrorCode>>) {
        let (tx, rx) = channel::<Result<SessionState, ErrorCode>>();
        (
            Self::Service(ServiceEvent::QueryState(session_id, tx)),
            Recv::new(rx),
        )
    }

    pub(crate) fn bounds_changed(session_id: u32, bounds: Rect, generation: u64) -> Self {
        Self::State(StateEvent::BoundsChanged {
            session_id,
            bounds,
            generation,
        })
    }

    pub(crate) fn display_changed(
        session_id: u32,
        has_own_content: bool,
        display_on: bool,
    ) -> Self {
        Self::State(StateEvent::DisplayChanged {
            session_id,
            has_own_content,
            display_on,
        })
    }

    pub(crate) fn begin_rotation(change: TransitionChange) -> (Self, Recv<u64>) {
        let (tx, rx) = channel::<u64>();
        (
            Self::Rotation(RotationEvent::Begin(Box::new(change), tx)),
            Recv::new(rx),
        )
    }

    pub(crate) fn build_rotation_animation(
        handle: u64,
        duration_scale: f32,
    ) -> (Self, Recv<Option<RotationAnimation>>) {
        let (tx, rx) = channel::<Option<RotationAnimation>>();
        (
            Self::Rotation(RotationEvent::BuildAnimation(handle, duration_scale, tx)),
            Recv::new(rx),
        )
    }

    pub(crate) fn rotation_frame(handle: u64, elapsed: Duration) -> Self {
        Self::Rotation(RotationEvent::Frame(handle, elapsed))
    }

    pub(crate) fn complete_rotation(handle: u64) -> Self {
        Self::Rotation(RotationEvent::Complete(handle))
    }

    pub(crate) fn cancel_rotation(handle: u64) -> Self {
        Self::Rotation(RotationEvent::Cancel(handle))
    }
}
