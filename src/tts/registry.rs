//! Provider registry: maps provider names and aliases to constructors.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::azure::AzureProvider;
use super::google::GoogleProvider;
use super::provider::SynthesisProvider;
use crate::config::ProviderSettings;
use crate::{Error, Result};

/// Everything a provider constructor may draw on: the shared HTTP client and
/// the credentials loaded at startup.
#[derive(Debug, Clone)]
pub struct ProviderContext {
    pub http: reqwest::Client,
    pub settings: ProviderSettings,
}

impl ProviderContext {
    pub fn new(http: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { http, settings }
    }
}

type Constructor =
    Arc<dyn Fn(&ProviderContext) -> Result<Arc<dyn SynthesisProvider>> + Send + Sync>;

/// Immutable after startup; resolved on every request.
///
/// Lookups trim and lowercase the requested name, so `"Google"`, `"gcp"` and
/// `" google "` all reach the same constructor.
#[derive(Clone)]
pub struct ProviderRegistry {
    context: ProviderContext,
    constructors: HashMap<String, Constructor>,
    aliases: HashMap<String, String>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .field("aliases", &self.aliases)
            .finish()
    }
}

impl ProviderRegistry {
    /// An empty registry.
    pub fn new(context: ProviderContext) -> Self {
        Self {
            context,
            constructors: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Registry with the built-in backends: `google` (alias `gcp`) and `azure`.
    pub fn with_defaults(context: ProviderContext) -> Self {
        let mut registry = Self::new(context);
        registry.register("google", &["gcp"], |ctx| {
            Ok(Arc::new(GoogleProvider::from_settings(ctx.http.clone(), &ctx.settings)?))
        });
        registry.register("azure", &[], |ctx| {
            Ok(Arc::new(AzureProvider::from_settings(ctx.http.clone(), &ctx.settings)?))
        });
        registry
    }

    /// Register `constructor` under `name` and every alias in `aliases`.
    ///
    /// Re-registering a name replaces the previous constructor.
    pub fn register<F>(&mut self, name: &str, aliases: &[&str], constructor: F) -> &mut Self
    where
        F: Fn(&ProviderContext) -> Result<Arc<dyn SynthesisProvider>> + Send + Sync + 'static,
    {
        let canonical = normalize(name);
        self.constructors
            .insert(canonical.clone(), Arc::new(constructor));
        self.aliases.insert(canonical.clone(), canonical.clone());
        for alias in aliases {
            self.aliases.insert(normalize(alias), canonical.clone());
        }
        self
    }

    /// Canonical name for `name`, if registered.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.aliases.get(&normalize(name)).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.canonical_name(name).is_some()
    }

    /// Construct the provider registered under `name`.
    ///
    /// Unknown names fail with [`Error::UnknownProvider`]; constructor failures
    /// (missing credentials and the like) are passed through unchanged.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn SynthesisProvider>> {
        let canonical = self
            .canonical_name(name)
            .ok_or_else(|| Error::UnknownProvider(name.to_string()))?;
        let constructor = self
            .constructors
            .get(canonical)
            .ok_or_else(|| Error::UnknownProvider(name.to_string()))?;
        debug!(requested = name, provider = canonical, "resolving provider");
        constructor(&self.context)
    }

    /// Canonical names of all registered providers, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
