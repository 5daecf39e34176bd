//! Converter registry and dispatch.
//!
//! The [`Registry`] maps target types to converters in two tiers: a
//! built-in tier filled once at construction, and a custom tier that user
//! code may extend at any time. It is explicitly constructed and handed to
//! the [`Convert`](crate::Convert) facade rather than living in a global,
//! so callers needing isolation simply build their own.
//!
//! # Dispatch order
//!
//! 1. null value → default
//! 2. unresolvable target → infer from the default, or pass the value through
//! 3. structural rules: collection, map, already-an-instance, array, enum
//! 4. registered converter (custom or built-in first, per precedence)
//! 5. bean population
//! 6. [`ConvertError::NoConverter`]

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::debug;

use crate::config::ConvertConfig;
use crate::converters::{
    self, ArrayConverter, BeanConverter, CollectionConverter, EnumConverter, MapConverter,
};
use crate::error::{ConvertError, Result};

use super::target::{TargetKind, TargetType};
use super::traits::Converter;
use super::value::Value;

/// Two-tier registry of converters keyed by target type.
///
/// # Example
///
/// ```rust
/// use convertkit::core::{Registry, TargetType, Value};
///
/// let registry = Registry::default();
/// let out = registry
///     .convert(Some(&TargetType::I32), &Value::from(" 42 "), &Value::Null)
///     .unwrap();
/// assert_eq!(out, Value::I32(42));
/// ```
pub struct Registry {
    /// Built-in converters, filled during construction.
    builtin: HashMap<TargetType, Arc<dyn Converter>>,

    /// User converters, created on first registration.
    custom: OnceLock<DashMap<TargetType, Arc<dyn Converter>>>,

    config: ConvertConfig,
}

impl Registry {
    /// Create a registry with both tiers empty.
    pub fn new(config: ConvertConfig) -> Self {
        Self {
            builtin: HashMap::new(),
            custom: OnceLock::new(),
            config,
        }
    }

    /// Create a registry with the standard built-in converters registered.
    pub fn with_builtins(config: ConvertConfig) -> Self {
        let mut registry = Self::new(config);
        converters::register_builtins(&mut registry);
        registry
    }

    /// Configuration shared by every converter of this registry.
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    // =========================================================================
    // Registration and lookup
    // =========================================================================

    /// Register a built-in converter, replacing any previous one for `target`.
    pub fn register_builtin(&mut self, target: TargetType, converter: impl Converter + 'static) {
        self.builtin.insert(target, Arc::new(converter));
    }

    /// Register a custom converter. Last write wins.
    ///
    /// Safe to call while other threads convert through this registry.
    pub fn register_custom(&self, target: TargetType, converter: impl Converter + 'static) {
        self.register_custom_arc(target, Arc::new(converter));
    }

    /// Register a custom converter as an Arc (for sharing).
    pub fn register_custom_arc(&self, target: TargetType, converter: Arc<dyn Converter>) {
        debug!("Registering custom converter for {}", target);
        self.custom
            .get_or_init(DashMap::new)
            .insert(target, converter);
    }

    /// Get the custom converter registered for exactly `target`.
    pub fn custom_converter(&self, target: &TargetType) -> Option<Arc<dyn Converter>> {
        self.custom
            .get()?
            .get(target)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Get the built-in converter registered for exactly `target`.
    pub fn builtin_converter(&self, target: &TargetType) -> Option<Arc<dyn Converter>> {
        self.builtin.get(target).cloned()
    }

    /// Check if a custom converter is registered for `target`.
    pub fn has_custom(&self, target: &TargetType) -> bool {
        self.custom
            .get()
            .is_some_and(|custom| custom.contains_key(target))
    }

    /// Get all target types with a custom converter.
    pub fn custom_types(&self) -> Vec<TargetType> {
        self.custom
            .get()
            .map(|custom| custom.iter().map(|entry| entry.key().clone()).collect())
            .unwrap_or_default()
    }

    /// Get all target types with a built-in converter, sorted by name.
    pub fn builtin_types(&self) -> Vec<&TargetType> {
        let mut types: Vec<&TargetType> = self.builtin.keys().collect();
        types.sort_by_key(|t| t.to_string());
        types
    }

    /// Find the converter for `target`.
    ///
    /// Each tier is searched by exact key, then by the raw key with type
    /// arguments erased. Returns `None` when neither tier matches.
    pub fn resolve(&self, target: &TargetType, prefer_custom: bool) -> Option<Arc<dyn Converter>> {
        let custom = || self.lookup(target, |t| self.custom_converter(t));
        let builtin = || self.lookup(target, |t| self.builtin_converter(t));

        if prefer_custom {
            custom().or_else(builtin)
        } else {
            builtin().or_else(custom)
        }
    }

    fn lookup<F>(&self, target: &TargetType, tier: F) -> Option<Arc<dyn Converter>>
    where
        F: Fn(&TargetType) -> Option<Arc<dyn Converter>>,
    {
        tier(target).or_else(|| {
            let raw = target.raw();
            if raw != *target {
                tier(&raw)
            } else {
                None
            }
        })
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Convert `value` to `target` using the configured precedence.
    ///
    /// A `None` target is inferred from `default`. Fails with
    /// [`ConvertError::AmbiguousTarget`] when neither is given,
    /// [`ConvertError::DefaultTypeMismatch`] when the default does not fit
    /// the target, and [`ConvertError::NoConverter`] when dispatch runs out
    /// of options. Unparseable input yields `default`.
    pub fn convert(
        &self,
        target: Option<&TargetType>,
        value: &Value,
        default: &Value,
    ) -> Result<Value> {
        self.convert_with_precedence(target, value, default, self.config.prefer_custom)
    }

    /// Convert `value` to `target`, choosing tier precedence for this call.
    pub fn convert_with_precedence(
        &self,
        target: Option<&TargetType>,
        value: &Value,
        default: &Value,
        prefer_custom: bool,
    ) -> Result<Value> {
        if target.is_none() && default.is_null() {
            return Err(ConvertError::AmbiguousTarget);
        }

        if value.is_null() {
            return Ok(default.clone());
        }

        let target: Cow<'_, TargetType> = match target {
            Some(t) if !t.is_opaque() => Cow::Borrowed(t),
            _ if !default.is_null() => Cow::Owned(default.value_type()),
            // Opaque target and nothing to infer from
            _ => return Ok(value.clone()),
        };

        if !default.is_null() && !default.is_instance_of(&target) {
            return Err(ConvertError::default_mismatch(&*target, default));
        }

        if let Some(result) = self.convert_structural(&target, value, default)? {
            return Ok(result);
        }

        if let Some(converter) = self.resolve(&target, prefer_custom) {
            return converter.convert(&target, value, default, self);
        }

        if let TargetType::Bean(def) = &*target {
            if def.is_bean() {
                debug!("No converter for {}, populating as bean", target);
                return BeanConverter::default().convert(&target, value, default, self);
            }
        }

        debug!("No converter for {}", target);
        Err(ConvertError::NoConverter(target.to_string()))
    }

    /// Structural rules that a single leaf converter cannot express.
    ///
    /// Returns `Ok(None)` when no rule applied.
    fn convert_structural(
        &self,
        target: &TargetType,
        value: &Value,
        default: &Value,
    ) -> Result<Option<Value>> {
        match target.kind() {
            TargetKind::Collection => {
                return CollectionConverter
                    .convert(target, value, default, self)
                    .map(Some);
            }
            TargetKind::Map => {
                return MapConverter.convert(target, value, default, self).map(Some);
            }
            _ => {}
        }

        if value.is_instance_of(target) {
            return Ok(Some(value.clone()));
        }

        match target.kind() {
            TargetKind::Array => match ArrayConverter.convert_internal(target, value, self) {
                Some(array) => Ok(Some(array)),
                None => {
                    debug!("Array conversion to {} did not apply, falling through", target);
                    Ok(None)
                }
            },
            TargetKind::Enum => EnumConverter.convert(target, value, default, self).map(Some),
            _ => Ok(None),
        }
    }

    /// Convert like [`Registry::convert`], but return `default` instead of
    /// failing.
    ///
    /// Only [`ConvertError::AmbiguousTarget`] escapes: without a target or a
    /// default there is nothing sensible to return.
    pub fn convert_quietly(
        &self,
        target: Option<&TargetType>,
        value: &Value,
        default: &Value,
    ) -> Result<Value> {
        match self.convert(target, value, default) {
            Ok(converted) => Ok(converted),
            Err(ConvertError::AmbiguousTarget) => Err(ConvertError::AmbiguousTarget),
            Err(e) => {
                debug!("Quiet conversion failed, using default: {}", e);
                Ok(default.clone())
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins(ConvertConfig::default())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("builtin", &self.builtin_types())
            .field("custom", &self.custom_types())
            .field("config", &self.config)
            .finish()
    }
}
