use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use serde::Deserialize;
use serde::de::Error as _;
use serde_json::Value;

/// Kind of value an animation drives, as coded by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationDataType {
    Float,
    Vector3,
    Quaternion,
    Matrix,
    Color3,
    Vector2,
    Color4,
}

impl AnimationDataType {
    fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Float),
            1 => Some(Self::Vector3),
            2 => Some(Self::Quaternion),
            3 => Some(Self::Matrix),
            4 => Some(Self::Color3),
            5 => Some(Self::Vector2),
            7 => Some(Self::Color4),
            _ => None,
        }
    }

    /// Number of floats making up one value.
    #[must_use]
    pub fn components(self) -> usize {
        match self {
            Self::Float => 1,
            Self::Vector2 => 2,
            Self::Vector3 | Self::Color3 => 3,
            Self::Quaternion | Self::Color4 => 4,
            Self::Matrix => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    Relative,
    #[default]
    Cycle,
    Constant,
    Yoyo,
}

impl LoopMode {
    fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Relative,
            2 => Self::Constant,
            4 => Self::Yoyo,
            _ => Self::Cycle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationValue {
    Float(f32),
    Vector2(Vec2),
    Vector3(Vec3),
    Quaternion(Quat),
    Color3(Vec3),
    Color4(Vec4),
    Matrix(Mat4),
}

impl AnimationValue {
    fn from_slice(data_type: AnimationDataType, v: &[f32]) -> Self {
        match data_type {
            AnimationDataType::Float => Self::Float(v[0]),
            AnimationDataType::Vector2 => Self::Vector2(Vec2::from_slice(v)),
            AnimationDataType::Vector3 => Self::Vector3(Vec3::from_slice(v)),
            AnimationDataType::Color3 => Self::Color3(Vec3::from_slice(v)),
            AnimationDataType::Quaternion => Self::Quaternion(Quat::from_slice(v)),
            AnimationDataType::Color4 => Self::Color4(Vec4::from_slice(v)),
            AnimationDataType::Matrix => Self::Matrix(Mat4::from_cols_slice(v)),
        }
    }

    /// Linear blend between two values of the same kind; mismatched kinds
    /// step to `end` halfway through.
    #[must_use]
    pub fn lerp(self, end: Self, t: f32) -> Self {
        match (self, end) {
            (Self::Float(a), Self::Float(b)) => Self::Float(a + (b - a) * t),
            (Self::Vector2(a), Self::Vector2(b)) => Self::Vector2(a.lerp(b, t)),
            (Self::Vector3(a), Self::Vector3(b)) => Self::Vector3(a.lerp(b, t)),
            (Self::Color3(a), Self::Color3(b)) => Self::Color3(a.lerp(b, t)),
            (Self::Color4(a), Self::Color4(b)) => Self::Color4(a.lerp(b, t)),
            (Self::Quaternion(a), Self::Quaternion(b)) => Self::Quaternion(a.slerp(b, t)),
            _ if t < 0.5 => self,
            _ => end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationKeyFrame {
    pub frame: f32,
    pub value: AnimationValue,
}

/// Named frame range, e.g. "walk" from 0 to 30.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimationRange {
    pub name: String,
    pub from: f32,
    pub to: f32,
}

/// A keyframed animation of one property.
#[derive(Debug, Clone)]
pub struct Animation {
    pub name: String,
    /// Dotted property path on the target (e.g. `position.x`).
    pub target_property: String,
    pub frames_per_second: f32,
    pub data_type: AnimationDataType,
    pub loop_mode: LoopMode,
    pub keys: Vec<AnimationKeyFrame>,
    pub ranges: Vec<AnimationRange>,
}

impl Animation {
    /// Parses a serialized animation.
    ///
    /// Key values may be stored alone or surrounded by their in/out tangents;
    /// any other length is rejected.
    pub fn parse(value: &Value) -> serde_json::Result<Self> {
        let payload = AnimationPayload::deserialize(value)?;
        let data_type = AnimationDataType::from_code(payload.data_type)
            .ok_or_else(|| serde_json::Error::custom(format!("unknown animation data type {}", payload.data_type)))?;
        let n = data_type.components();

        let keys = payload
            .keys
            .iter()
            .map(|key| {
                let values = match key.values.len() {
                    len if len == n => &key.values[..],
                    len if len == 3 * n => &key.values[n..2 * n],
                    len => {
                        return Err(serde_json::Error::custom(format!(
                            "key at frame {} of '{}' has {len} values, expected {n}",
                            key.frame, payload.name
                        )));
                    }
                };
                Ok(AnimationKeyFrame {
                    frame: key.frame,
                    value: AnimationValue::from_slice(data_type, values),
                })
            })
            .collect::<serde_json::Result<Vec<_>>>()?;

        Ok(Self {
            name: payload.name,
            target_property: payload.property,
            frames_per_second: payload.frame_per_second,
            data_type,
            loop_mode: LoopMode::from_code(payload.loop_behavior),
            keys,
            ranges: payload.ranges,
        })
    }

    /// Last keyed frame.
    #[must_use]
    pub fn last_frame(&self) -> f32 {
        self.keys.iter().map(|k| k.frame).fold(0.0_f32, f32::max)
    }

    /// Duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        if self.frames_per_second > 0.0 {
            self.last_frame() / self.frames_per_second
        } else {
            0.0
        }
    }

    /// Value at `frame`, clamped to the keyed range.
    #[must_use]
    pub fn sample(&self, frame: f32) -> Option<AnimationValue> {
        let first = self.keys.first()?;
        // partition_point finds the first key strictly after `frame`
        let next_idx = self.keys.partition_point(|k| k.frame <= frame);
        if next_idx == 0 {
            return Some(first.value);
        }
        let prev = &self.keys[next_idx - 1];
        let Some(next) = self.keys.get(next_idx) else {
            return Some(prev.value);
        };
        let span = next.frame - prev.frame;
        let t = if span > 0.0 { (frame - prev.frame) / span } else { 0.0 };
        Some(prev.value.lerp(next.value, t))
    }

    #[must_use]
    pub fn range(&self, name: &str) -> Option<&AnimationRange> {
        self.ranges.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnimationKeyPayload {
    frame: f32,
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnimationPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    property: String,
    #[serde(default = "default_fps")]
    frame_per_second: f32,
    #[serde(default)]
    data_type: u32,
    #[serde(default = "default_loop")]
    loop_behavior: u32,
    #[serde(default)]
    keys: Vec<AnimationKeyPayload>,
    #[serde(default)]
    ranges: Vec<AnimationRange>,
}

fn default_fps() -> f32 {
    60.0
}

fn default_loop() -> u32 {
    1
}
