//! Project import
//!
//! [`ProjectImporter`] reconciles a [`ProjectDocument`] against a live
//! [`Scene`]. Every category of the document is handled by one phase; the
//! phases run in the fixed order of [`ImportPhase::ORDER`]:
//!
//! 1. Normalize the document
//! 2. Reconcile nodes (lights, cameras, meshes) and synthesize particle emitters
//! 3. Particle systems, materials, textures
//! 4. Scene components always created fresh (shadows, sounds, actions,
//!    effect layers, render targets, lens flares)
//! 5. Environment and post-processes
//! 6. Host assets and extensions
//! 7. Deferred parent links, once every node exists
//!
//! Each object an import creates or modifies is tagged in
//! [`Scene::provenance`].

mod assets;
mod environment;
mod links;
mod materials;
mod nodes;
mod particles;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{ImportError, Result};
use crate::extensions::{AssetRegistry, ExtensionRegistry};
use crate::project::{ProjectDocument, normalize};
use crate::provenance::{ObjectId, Provenance};
use crate::scene::Scene;
use crate::settings::ImportSettings;

pub use links::LinkReport;
pub use nodes::NodeKind;

use links::PendingParents;

/// One step of the import pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportPhase {
    Normalize,
    Nodes,
    ParticleSystems,
    Materials,
    Textures,
    ShadowGenerators,
    Sounds,
    SceneActions,
    EffectLayers,
    RenderTargets,
    LensFlares,
    Environment,
    PostProcesses,
    Assets,
    Extensions,
    DeferredParents,
}

impl ImportPhase {
    /// Execution order. Deferred parents must stay last.
    pub const ORDER: [Self; 16] = [
        Self::Normalize,
        Self::Nodes,
        Self::ParticleSystems,
        Self::Materials,
        Self::Textures,
        Self::ShadowGenerators,
        Self::Sounds,
        Self::SceneActions,
        Self::EffectLayers,
        Self::RenderTargets,
        Self::LensFlares,
        Self::Environment,
        Self::PostProcesses,
        Self::Assets,
        Self::Extensions,
        Self::DeferredParents,
    ];
}

/// State shared by the phases of one import.
pub(crate) struct ImportContext<'a> {
    pub scene: &'a mut Scene,
    pub settings: &'a ImportSettings,
    pub pending: PendingParents,
    added: usize,
    modified: usize,
}

impl<'a> ImportContext<'a> {
    fn new(scene: &'a mut Scene, settings: &'a ImportSettings) -> Self {
        Self {
            scene,
            settings,
            pending: PendingParents::default(),
            added: 0,
            modified: 0,
        }
    }

    /// Records provenance for an object touched by this import.
    pub fn tag(&mut self, object: impl Into<ObjectId>, tag: Provenance) {
        if tag.contains(Provenance::MODIFIED) {
            self.modified += 1;
        } else {
            self.added += 1;
        }
        self.scene.provenance.add(object, tag);
    }

    /// Decodes a payload into its typed form.
    pub fn decode<T: DeserializeOwned>(&self, kind: &'static str, name: &str, payload: &Value) -> Result<T> {
        T::deserialize(payload).map_err(ImportError::payload(kind, name))
    }
}

/// Imports editor projects into a scene.
#[derive(Default)]
pub struct ProjectImporter {
    pub settings: ImportSettings,
    pub extensions: ExtensionRegistry,
    pub assets: AssetRegistry,
}

impl ProjectImporter {
    #[must_use]
    pub fn new(settings: ImportSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Imports `document` into `scene`.
    ///
    /// Fails only on node descriptors with an unknown type tag or payloads
    /// that cannot be decoded; the scene keeps whatever the phases before the
    /// failure produced.
    #[allow(clippy::unused_async)]
    pub async fn import(&mut self, scene: &mut Scene, document: ProjectDocument) -> Result<()> {
        log::info!(
            "Importing project into scene {} ({} descriptors)",
            scene.id,
            document.descriptor_count()
        );

        let mut doc = document;
        let mut ctx = ImportContext::new(scene, &self.settings);
        let mut links = LinkReport::default();

        for phase in ImportPhase::ORDER {
            log::debug!("Import phase: {phase:?}");
            match phase {
                ImportPhase::Normalize => doc = normalize(std::mem::take(&mut doc)),
                ImportPhase::Nodes => nodes::import_nodes(&mut ctx, &doc)?,
                ImportPhase::ParticleSystems => particles::import_particle_systems(&mut ctx, &doc.particle_systems)?,
                ImportPhase::Materials => materials::import_materials(&mut ctx, &doc.materials)?,
                ImportPhase::Textures => materials::import_textures(&mut ctx, &doc.textures)?,
                ImportPhase::ShadowGenerators => assets::import_shadow_generators(&mut ctx, &doc.shadow_generators)?,
                ImportPhase::Sounds => assets::import_sounds(&mut ctx, &doc.sounds)?,
                ImportPhase::SceneActions => assets::import_scene_actions(&mut ctx, doc.actions.as_ref())?,
                ImportPhase::EffectLayers => assets::import_effect_layers(&mut ctx, &doc.effect_layers)?,
                ImportPhase::RenderTargets => assets::import_render_targets(&mut ctx, &doc.render_targets)?,
                ImportPhase::LensFlares => assets::import_lens_flares(&mut ctx, &doc.lens_flares)?,
                ImportPhase::Environment => environment::import_environment(&mut ctx, &doc.global_configuration)?,
                ImportPhase::PostProcesses => assets::import_post_processes(&mut ctx, &doc.post_processes),
                ImportPhase::Assets => {
                    self.assets.clear();
                    let kinds: Vec<String> = self.assets.kinds().map(str::to_string).collect();
                    for kind in kinds {
                        if let Some(data) = doc.assets.get(&kind) {
                            self.assets.apply(ctx.scene, &kind, data);
                        }
                    }
                }
                ImportPhase::Extensions => {
                    self.extensions.clear();
                    let applied = self.extensions.apply(ctx.scene, &doc.custom_metadatas);
                    log::debug!("Applied {applied} extension(s)");
                }
                ImportPhase::DeferredParents => {
                    links = std::mem::take(&mut ctx.pending).resolve(ctx.scene);
                }
            }
        }

        log::info!(
            "Import finished: {} added, {} modified, {} parent link(s) resolved, {} dangling",
            ctx.added,
            ctx.modified,
            links.resolved,
            links.dangling
        );
        Ok(())
    }

    /// Runs [`import`](Self::import) to completion on the current thread.
    pub fn import_blocking(&mut self, scene: &mut Scene, document: ProjectDocument) -> Result<()> {
        pollster::block_on(self.import(scene, document))
    }
}
