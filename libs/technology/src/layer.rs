//! Technology layers.

use std::collections::BTreeSet;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::function::{Function, FunctionExtras};

/// The index of a layer within its technology.
///
/// Indices are dense: a technology with `N` layers uses `0..N`.
#[derive(
    Default, Debug, Copy, Clone, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct LayerId(pub(crate) usize);

impl LayerId {
    /// The dense index of this layer.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A material layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub(crate) id: LayerId,
    pub(crate) name: ArcStr,
    pub(crate) function: Function,
    pub(crate) extras: FunctionExtras,
    pub(crate) height: f64,
    pub(crate) thickness: f64,
    /// The real layer for pseudo layers; `self.id` otherwise.
    pub(crate) non_pseudo: LayerId,
}

impl Layer {
    /// The layer's index in its technology.
    #[inline]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The layer name, unique within its technology.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The base function of this layer.
    #[inline]
    pub fn function(&self) -> Function {
        self.function
    }

    /// The modifier flags of this layer.
    #[inline]
    pub fn extras(&self) -> FunctionExtras {
        self.extras
    }

    /// The stacking height of this layer; higher layers sit above lower ones.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The physical thickness of this layer.
    #[inline]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Returns `true` if this is a pseudo layer.
    #[inline]
    pub fn is_pseudo(&self) -> bool {
        self.extras.contains(FunctionExtras::PSEUDO)
    }

    /// The real layer this layer stands in for.
    ///
    /// Returns this layer's own id when the layer is not a pseudo layer.
    #[inline]
    pub fn non_pseudo(&self) -> LayerId {
        self.non_pseudo
    }
}

/// Describes a layer to be registered with
/// [`TechnologyBuilder::add_layer`](crate::tech::TechnologyBuilder::add_layer).
#[derive(Debug, Clone)]
pub struct LayerSpec {
    /// The layer name.
    pub name: ArcStr,
    /// The base function.
    pub function: Function,
    /// Modifier flags. [`FunctionExtras::PSEUDO`] is managed by the builder.
    pub extras: FunctionExtras,
    /// Stacking height.
    pub height: f64,
    /// Physical thickness.
    pub thickness: f64,
}

impl LayerSpec {
    /// A layer with the given name and function, no extras and zero height.
    pub fn new(name: impl Into<ArcStr>, function: Function) -> Self {
        Self {
            name: name.into(),
            function,
            extras: FunctionExtras::empty(),
            height: 0.,
            thickness: 0.,
        }
    }

    /// Sets the modifier flags.
    pub fn extras(mut self, extras: FunctionExtras) -> Self {
        self.extras = extras;
        self
    }

    /// Sets the stacking height and thickness.
    pub fn height(mut self, height: f64, thickness: f64) -> Self {
        self.height = height;
        self.thickness = thickness;
        self
    }
}

/// A predicate over layer functions and modifier flags.
///
/// Node layers whose layer fails the filter are skipped by the shape builder
/// without being evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerFilter {
    /// If present, only these base functions are accepted.
    #[serde(default)]
    pub functions: Option<BTreeSet<Function>>,
    /// Every one of these flags must be set.
    #[serde(default)]
    pub require: FunctionExtras,
    /// None of these flags may be set.
    #[serde(default)]
    pub forbid: FunctionExtras,
}

impl LayerFilter {
    /// A filter accepting only the given functions.
    ///
    /// # Example
    ///
    /// ```
    /// # use technology::function::*;
    /// # use technology::layer::LayerFilter;
    /// let filter = LayerFilter::functions([Function::Metal(1), Function::Metal(2)]);
    /// assert!(filter.matches(Function::Metal(2), FunctionExtras::empty()));
    /// assert!(!filter.matches(Function::Poly(1), FunctionExtras::empty()));
    /// ```
    pub fn functions(functions: impl IntoIterator<Item = Function>) -> Self {
        Self {
            functions: Some(functions.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Adds flags that must be present.
    pub fn requiring(mut self, extras: FunctionExtras) -> Self {
        self.require |= extras;
        self
    }

    /// Adds flags that must be absent.
    ///
    /// # Example
    ///
    /// ```
    /// # use technology::function::*;
    /// # use technology::layer::LayerFilter;
    /// let filter = LayerFilter::default().forbidding(FunctionExtras::PSEUDO);
    /// assert!(filter.matches(Function::Metal(1), FunctionExtras::empty()));
    /// assert!(!filter.matches(Function::Metal(1), FunctionExtras::PSEUDO));
    /// ```
    pub fn forbidding(mut self, extras: FunctionExtras) -> Self {
        self.forbid |= extras;
        self
    }

    /// Returns `true` if a layer with this function and these flags passes the filter.
    pub fn matches(&self, function: Function, extras: FunctionExtras) -> bool {
        if let Some(functions) = &self.functions {
            if !functions.contains(&function) {
                return false;
            }
        }
        extras.contains(self.require) && !extras.intersects(self.forbid)
    }

    /// Returns `true` if `layer` passes the filter.
    #[inline]
    pub fn accepts(&self, layer: &Layer) -> bool {
        self.matches(layer.function(), layer.extras())
    }
}
