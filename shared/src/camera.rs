use crate::constants::CROUCH_BLEND_DURATION;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Perspective {
    #[default]
    ThirdPerson,
    FirstPerson,
}

impl Perspective {
    pub fn toggled(self) -> Self {
        match self {
            Perspective::ThirdPerson => Perspective::FirstPerson,
            Perspective::FirstPerson => Perspective::ThirdPerson,
        }
    }
}

/// Eases the camera through the capsule height change when crouching.
///
/// The capsule snaps down instantly; the camera starts at the old height and blends down over
/// `blend_duration`, and blends back the same way when standing up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrouchCameraBlend {
    blend_time: f32,
    blend_duration: f32,
}

impl Default for CrouchCameraBlend {
    fn default() -> Self {
        Self::new(CROUCH_BLEND_DURATION)
    }
}

impl CrouchCameraBlend {
    pub fn new(blend_duration: f32) -> Self {
        Self {
            blend_time: 0.0,
            blend_duration,
        }
    }

    /// Returns the Z offset to add to the camera this frame.
    ///
    /// `crouch_offset_z` is crouched half height minus standing half height (negative).
    pub fn update(&mut self, delta_seconds: f32, crouching: bool, crouch_offset_z: f32) -> f32 {
        let alpha = if self.blend_duration > 0.0 {
            (self.blend_time / self.blend_duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let mut offset = crouch_offset_z * alpha;

        if crouching {
            self.blend_time = (self.blend_time + delta_seconds).clamp(0.0, self.blend_duration);
            offset -= crouch_offset_z;
        } else {
            self.blend_time = (self.blend_time - delta_seconds).clamp(0.0, self.blend_duration);
        }
        offset
    }
}
