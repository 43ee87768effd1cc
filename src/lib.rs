#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod errors;
pub mod extensions;
pub mod import;
pub mod project;
pub mod provenance;
pub mod scene;
pub mod settings;

pub use animation::{Animation, AnimationValue, LoopMode};
pub use errors::{ImportError, Result};
pub use extensions::{AssetComponent, AssetRegistry, Extension, ExtensionRegistry};
pub use import::{ImportPhase, NodeKind, ProjectImporter};
pub use project::{ProjectDocument, normalize};
pub use provenance::{ObjectId, Provenance, ProvenanceTable};
pub use scene::{Camera, Light, Material, Mesh, NodeHandle, Scene, Texture};
pub use settings::ImportSettings;
