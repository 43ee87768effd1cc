use glam::Vec3;
use serde::Deserialize;

use crate::scene::node::{NodeCore, NodeFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

impl ProjectionType {
    fn from_mode(mode: u32) -> Self {
        if mode == 1 {
            Self::Orthographic
        } else {
            Self::Perspective
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub core: NodeCore,

    /// Editor class of the camera (e.g. `FreeCamera`, `ArcRotateCamera`).
    pub camera_type: String,

    // === Projection ===
    pub projection_type: ProjectionType,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    // === Controls ===
    pub target: Option<Vec3>,
    pub speed: f32,
    pub inertia: f32,
}

impl Camera {
    #[must_use]
    pub fn new(core: NodeCore) -> Self {
        Self {
            core,
            camera_type: "FreeCamera".to_string(),
            projection_type: ProjectionType::Perspective,
            fov: 0.8,
            near: 1.0,
            far: 10_000.0,
            target: None,
            speed: 2.0,
            inertia: 0.9,
        }
    }

    /// Constructs a new camera from its serialized form.
    #[must_use]
    pub fn parse(payload: &CameraPayload) -> Self {
        let mut camera = Self::new(NodeCore::parse(&payload.node, "Camera"));
        if let Some(camera_type) = &payload.camera_type {
            camera.camera_type.clone_from(camera_type);
        }
        camera.apply_properties(payload);
        camera
    }

    /// Applies a serialized camera onto this one in place.
    ///
    /// The camera class never changes on an existing camera.
    pub fn apply(&mut self, payload: &CameraPayload) {
        self.core.apply(&payload.node);
        self.apply_properties(payload);
    }

    fn apply_properties(&mut self, payload: &CameraPayload) {
        if let Some(mode) = payload.mode {
            self.projection_type = ProjectionType::from_mode(mode);
        }
        if let Some(fov) = payload.fov {
            self.fov = fov;
        }
        if let Some(min_z) = payload.min_z {
            self.near = min_z;
        }
        if let Some(max_z) = payload.max_z {
            self.far = max_z;
        }
        if payload.target.is_some() {
            self.target = payload.target;
        }
        if let Some(speed) = payload.speed {
            self.speed = speed;
        }
        if let Some(inertia) = payload.inertia {
            self.inertia = inertia;
        }
    }
}

/// Serialized form of a camera.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPayload {
    #[serde(flatten)]
    pub node: NodeFields,

    #[serde(rename = "type")]
    pub camera_type: Option<String>,
    pub mode: Option<u32>,
    pub fov: Option<f32>,
    pub min_z: Option<f32>,
    pub max_z: Option<f32>,
    pub target: Option<Vec3>,
    pub speed: Option<f32>,
    pub inertia: Option<f32>,
}
