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

//! Scale and position computation for mirrored content.

use crate::geometry::{Point, Rotation, Size};

/// How mirrored content is scaled into the destination surface.
///
/// The two policies reflect the two resize behaviors observed in the
/// compositor: captures fit-and-center, rotation freezes fill uniformly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalingPolicy {
    /// Uniform scale by the smaller axis ratio, centered in the
    /// destination.
    #[default]
    FitCenter,
    /// Uniform scale by the larger axis ratio, anchored at the origin.
    /// Used when both axes grow or both shrink without a rotation change.
    FillUniform,
}

/// A scale/offset/rotation triple applied to a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Horizontal scale factor.
    pub scale_x: f32,
    /// Vertical scale factor.
    pub scale_y: f32,
    /// Post-scale translation.
    pub offset: Point,
    /// Rotation applied before scale and translation.
    pub rotation: Rotation,
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset: Point::default(),
            rotation: Rotation::R0,
        }
    }

    /// Computes the transform that maps `source` content into `dest`.
    ///
    /// Returns `None` when `source` has a zero dimension; callers keep the
    /// last applied transform in that case, since zero-sized bounds are an
    /// expected transient during layout churn.
    pub fn fit(source: Size, dest: Size, policy: ScalingPolicy) -> Option<Self> {
        if source.is_empty() || dest.is_empty() {
            return None;
        }

        let scale_x = dest.width as f32 / source.width as f32;
        let scale_y = dest.height as f32 / source.height as f32;

        match policy {
            ScalingPolicy::FitCenter => {
                let scale = scale_x.min(scale_y);
                let scaled_width = (scale * source.width as f32).round() as i32;
                let scaled_height = (scale * source.height as f32).round() as i32;

                // Shift only the axes that did not fill the destination, so
                // content stays centered.
                let mut offset = Point::default();
                if scaled_width != dest.width as i32 {
                    offset.x = (dest.width as i32 - scaled_width) / 2;
                }
                if scaled_height != dest.height as i32 {
                    offset.y = (dest.height as i32 - scaled_height) / 2;
                }

                Some(Self {
                    scale_x: scale,
                    scale_y: scale,
                    offset,
                    rotation: Rotation::R0,
                })
            }
            ScalingPolicy::FillUniform => {
                let scale = scale_x.max(scale_y);
                Some(Self {
                    scale_x: scale,
                    scale_y: scale,
                    offset: Point::default(),
                    rotation: Rotation::R0,
                })
            }
        }
    }
}
