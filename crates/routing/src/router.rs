// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The work-type router.

use crate::preset::Preset;
use crate::provider::{provider_of, Provider};
use indexmap::IndexMap;
use pan_core::{WorkType, WorkTypeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error(transparent)]
    UnknownWorkType(#[from] WorkTypeError),
    #[error("unknown model `{model}` in override for `{work_type}`")]
    UnknownOverrideModel { work_type: String, model: String },
    #[error("override key `{0}` is not a work type")]
    UnknownOverrideKey(String),
    #[error("cannot read router config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse router config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-provider enable flags. Anthropic is unconditionally enabled and the
/// flag exists only for config-shape compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderFlags {
    #[serde(default = "flag_on")]
    pub anthropic: bool,
    #[serde(default = "flag_on")]
    pub openai: bool,
    #[serde(default = "flag_on")]
    pub google: bool,
}

fn flag_on() -> bool {
    true
}

impl Default for ProviderFlags {
    fn default() -> Self {
        Self {
            anthropic: true,
            openai: true,
            google: true,
        }
    }
}

/// Router section of `deacon/config.json`. Unknown keys are ignored so the
/// supervisor tunables can share the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default)]
    pub preset: Preset,
    #[serde(default)]
    pub providers: ProviderFlags,
    /// work-type id → model id; wins over the preset
    #[serde(default)]
    pub overrides: IndexMap<String, String>,
    /// provider name → credential. A non-empty value credentials the
    /// provider; Anthropic needs no entry.
    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,
}

impl RouterConfig {
    fn has_key(&self, provider: Provider) -> bool {
        self.api_keys
            .get(provider.as_str())
            .map(|key| !key.is_empty())
            .unwrap_or(false)
    }

    /// Whether a provider may be routed to.
    pub fn provider_enabled(&self, provider: Provider) -> bool {
        match provider {
            Provider::Anthropic => true,
            Provider::OpenAi => self.providers.openai && self.has_key(provider),
            Provider::Google => self.providers.google && self.has_key(provider),
        }
    }
}

/// Where a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    Override,
    Preset,
    Fallback,
}

/// A resolved model with its derivation, for debug surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelChoice {
    pub model: String,
    pub source: ModelSource,
    pub preset: Preset,
    pub used_fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_model: Option<String>,
}

/// Pure resolver over a validated configuration.
#[derive(Debug, Clone)]
pub struct Router {
    config: RouterConfig,
    /// Validated overrides keyed by parsed work type
    overrides: BTreeMap<WorkType, String>,
    config_path: Option<PathBuf>,
}

impl Router {
    /// Build a router, validating every override entry.
    pub fn new(config: RouterConfig) -> Result<Self, RoutingError> {
        let mut overrides = BTreeMap::new();
        for (key, model) in &config.overrides {
            let work_type: WorkType = key
                .parse()
                .map_err(|_| RoutingError::UnknownOverrideKey(key.clone()))?;
            if provider_of(model).is_none() {
                return Err(RoutingError::UnknownOverrideModel {
                    work_type: key.clone(),
                    model: model.clone(),
                });
            }
            overrides.insert(work_type, model.clone());
        }
        Ok(Self {
            config,
            overrides,
            config_path: None,
        })
    }

    /// Load and validate from a JSON config file. A missing file yields the
    /// default configuration.
    pub fn load(path: &Path) -> Result<Self, RoutingError> {
        let config = read_config(path)?;
        let mut router = Self::new(config)?;
        router.config_path = Some(path.to_path_buf());
        Ok(router)
    }

    /// Re-read the config file. On failure the current configuration is
    /// kept and the error returned.
    pub fn reload(&mut self) -> Result<(), RoutingError> {
        let Some(path) = self.config_path.clone() else {
            return Ok(());
        };
        let reloaded = Self::load(&path)?;
        self.config = reloaded.config;
        self.overrides = reloaded.overrides;
        tracing::info!(path = %path.display(), "router config reloaded");
        Ok(())
    }

    /// Resolve a work-type id string. Unknown ids fail fast.
    pub fn resolve_id(&self, id: &str) -> Result<ModelChoice, RoutingError> {
        Ok(self.resolve(id.parse()?))
    }

    /// Resolve a work type to a model, applying provider fallback.
    pub fn resolve(&self, work_type: WorkType) -> ModelChoice {
        let preset = self.config.preset;
        let (model, source) = match self.overrides.get(&work_type) {
            Some(model) => (model.clone(), ModelSource::Override),
            None => (preset.model_for(work_type).to_string(), ModelSource::Preset),
        };

        // provider_of is total over validated overrides and preset tables
        let enabled = provider_of(&model)
            .map(|provider| self.config.provider_enabled(provider))
            .unwrap_or(false);

        if enabled {
            return ModelChoice {
                model,
                source,
                preset,
                used_fallback: false,
                original_model: None,
            };
        }

        let fallback = preset.fallback_for(work_type).to_string();
        tracing::debug!(
            work_type = %work_type,
            wanted = %model,
            fallback = %fallback,
            "provider not credentialed, falling back"
        );
        ModelChoice {
            model: fallback,
            source: ModelSource::Fallback,
            preset,
            used_fallback: true,
            original_model: Some(model),
        }
    }

    /// The resolved table for every work type, for debug logging.
    pub fn describe(&self) -> Vec<(WorkType, ModelChoice)> {
        WorkType::ALL
            .into_iter()
            .map(|work_type| (work_type, self.resolve(work_type)))
            .collect()
    }
}

fn read_config(path: &Path) -> Result<RouterConfig, RoutingError> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(RouterConfig::default());
        }
        Err(source) => {
            return Err(RoutingError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&data).map_err(|source| RoutingError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
