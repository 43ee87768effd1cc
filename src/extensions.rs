//! Host hooks
//!
//! The importer does not know what custom metadata or asset data means. The
//! host registers:
//! - [`Extension`] factories, keyed by the custom-metadata name they handle
//! - [`AssetComponent`]s, keyed by the asset-map entry they consume
//!
//! Both registries are reset at the start of every import.

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::scene::Scene;

/// Handler for one custom-metadata entry of a project.
pub trait Extension {
    /// Called once per import with the entry stored under the extension's name.
    fn on_load(&mut self, scene: &mut Scene, data: &Value);
}

type ExtensionFactory = Box<dyn Fn() -> Box<dyn Extension>>;

/// Extension factories plus the instances created by the current import.
#[derive(Default)]
pub struct ExtensionRegistry {
    factories: FxHashMap<String, ExtensionFactory>,
    instances: Vec<(String, Box<dyn Extension>)>,
}

impl ExtensionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory; a previous factory under `name` is replaced.
    pub fn register<F, E>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> E + 'static,
        E: Extension + 'static,
    {
        self.factories
            .insert(name.into(), Box::new(move || Box::new(factory()) as Box<dyn Extension>));
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Drops every instance created so far. Factories stay registered.
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Returns the instance for `name`, creating it on first request.
    pub fn request(&mut self, name: &str) -> Option<&mut dyn Extension> {
        let index = match self.instances.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                let factory = self.factories.get(name)?;
                self.instances.push((name.to_string(), factory()));
                self.instances.len() - 1
            }
        };
        Some(self.instances[index].1.as_mut())
    }

    /// Names of the instances created since the last [`clear`](Self::clear).
    pub fn loaded(&self) -> impl Iterator<Item = &str> {
        self.instances.iter().map(|(name, _)| name.as_str())
    }

    /// Hands every custom-metadata entry with a registered extension to it.
    ///
    /// Returns how many entries were consumed; unknown keys are skipped.
    pub fn apply(&mut self, scene: &mut Scene, custom_metadatas: &serde_json::Map<String, Value>) -> usize {
        let mut applied = 0;
        for (name, data) in custom_metadatas {
            match self.request(name) {
                Some(extension) => {
                    extension.on_load(scene, data);
                    applied += 1;
                }
                None => log::debug!("No extension registered for custom metadata '{name}'"),
            }
        }
        applied
    }
}

/// Host subsystem that owns a kind of project asset.
pub trait AssetComponent {
    /// Key of the asset-map entry this component consumes.
    fn id(&self) -> &str;

    /// Forgets every asset loaded by a previous import.
    fn clear(&mut self);

    fn on_parse_assets(&mut self, scene: &mut Scene, data: &Value);
}

#[derive(Default)]
pub struct AssetRegistry {
    components: Vec<Box<dyn AssetComponent>>,
}

impl AssetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, component: impl AssetComponent + 'static) {
        self.components.push(Box::new(component));
    }

    /// Clears every registered component.
    pub fn clear(&mut self) {
        for component in &mut self.components {
            component.clear();
        }
    }

    /// Ids of the registered components, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.id())
    }

    /// Hands `data` to every component with id `kind`.
    pub fn apply(&mut self, scene: &mut Scene, kind: &str, data: &Value) -> bool {
        let mut found = false;
        for component in self.components.iter_mut().filter(|c| c.id() == kind) {
            component.on_parse_assets(scene, data);
            found = true;
        }
        found
    }

    pub fn component(&self, kind: &str) -> Option<&dyn AssetComponent> {
        self.components.iter().find(|c| c.id() == kind).map(|c| &**c)
    }
}
