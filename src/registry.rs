//! Named map components.
//!
//! The registry is a plain lookup table built at startup and handed to
//! whatever needs to create components by name.

use std::collections::HashMap;

use crate::composition::{Choropleth, MapComponent};
use crate::config::MapConfig;
use crate::error::{ChoroplethError, Result};

/// Builds a component from its configuration
pub type ComponentFactory = fn(MapConfig) -> Box<dyn MapComponent>;

#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    factories: HashMap<String, ComponentFactory>,
}

impl ComponentRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in components
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("Choropleth", |config| Box::new(Choropleth::new(config)));
        registry
    }

    /// Register `factory` under `name`, replacing any previous entry
    pub fn register(&mut self, name: &str, factory: ComponentFactory) -> &mut Self {
        self.factories.insert(name.to_string(), factory);
        self
    }

    pub fn create(&self, name: &str, config: MapConfig) -> Result<Box<dyn MapComponent>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ChoroplethError::InvalidParameter {
                param: "component".to_string(),
                message: format!("Unknown component: {}. Available: {}", name, self.names().join(", ")),
            })?;
        Ok(factory(config))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
