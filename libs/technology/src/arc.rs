//! Arc templates.

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::layer::LayerId;
use crate::style::Style;

/// The index of an arc template within its technology.
#[derive(
    Default, Debug, Copy, Clone, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct ArcId(pub(crate) usize);

impl ArcId {
    /// The dense index of this arc template.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The electrical function of an arc template.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ArcFunction {
    /// Unknown function.
    #[default]
    Unknown,
    /// Metal routing at the given level.
    Metal(u8),
    /// Polysilicon routing at the given level.
    Poly(u8),
    /// Diffusion of unspecified type.
    Diff,
    /// P-type diffusion.
    DiffP,
    /// N-type diffusion.
    DiffN,
    /// Substrate connection.
    Substrate,
    /// Well connection.
    Well,
    /// Carbon nanotube.
    Nanotube,
    /// A schematic wire.
    Wire,
    /// A schematic bus.
    Bus,
    /// An unrouted connection.
    Unrouted,
    /// Not electrically significant.
    NonElectrical,
}

impl ArcFunction {
    /// Returns `true` for diffusion arcs.
    pub fn is_diffusion(&self) -> bool {
        matches!(self, Self::Diff | Self::DiffP | Self::DiffN)
    }

    /// Returns `true` for polysilicon arcs.
    pub fn is_poly(&self) -> bool {
        matches!(self, Self::Poly(_))
    }

    /// Returns `true` for metal arcs.
    pub fn is_metal(&self) -> bool {
        matches!(self, Self::Metal(_))
    }

    /// Parses a name such as `metal-2`, `poly-1` or `diff-p`.
    ///
    /// # Example
    ///
    /// ```
    /// # use technology::arc::ArcFunction;
    /// assert_eq!(ArcFunction::from_name("metal-3"), Some(ArcFunction::Metal(3)));
    /// assert_eq!(ArcFunction::from_name("non-electrical"), Some(ArcFunction::NonElectrical));
    /// assert_eq!(ArcFunction::from_name("metal-x"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(level) = name.strip_prefix("metal-") {
            return level.parse().ok().map(Self::Metal);
        }
        if let Some(level) = name.strip_prefix("poly-") {
            return level.parse().ok().map(Self::Poly);
        }
        Some(match name {
            "unknown" => Self::Unknown,
            "diff" => Self::Diff,
            "diff-p" => Self::DiffP,
            "diff-n" => Self::DiffN,
            "substrate" => Self::Substrate,
            "well" => Self::Well,
            "nanotube" => Self::Nanotube,
            "wire" => Self::Wire,
            "bus" => Self::Bus,
            "unrouted" => Self::Unrouted,
            "non-electrical" => Self::NonElectrical,
            _ => return None,
        })
    }
}

/// One layer of an arc template.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcLayer {
    pub(crate) layer: LayerId,
    pub(crate) style: Style,
    /// Half the width of this layer on a minimum-width arc, in grid units.
    pub(crate) grid_extend: i64,
}

impl ArcLayer {
    /// The layer drawn.
    #[inline]
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    /// The drawing style.
    #[inline]
    pub fn style(&self) -> Style {
        self.style
    }

    /// Half the minimum width of this layer, in grid units.
    #[inline]
    pub fn grid_extend(&self) -> i64 {
        self.grid_extend
    }
}

/// A reusable description of an arc's geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcTemplate {
    pub(crate) id: ArcId,
    pub(crate) name: ArcStr,
    pub(crate) function: ArcFunction,
    pub(crate) layers: Vec<ArcLayer>,
    pub(crate) base_extend: i64,
    pub(crate) legacy_width_offset: i64,
    pub(crate) default_extend_over_min: i64,
    pub(crate) extended: bool,
    pub(crate) directional: bool,
    pub(crate) not_used: bool,
}

impl ArcTemplate {
    /// The template's index in its technology.
    #[inline]
    pub fn id(&self) -> ArcId {
        self.id
    }

    /// The template name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The electrical function.
    #[inline]
    pub fn function(&self) -> ArcFunction {
        self.function
    }

    /// The layers, in drawing order.
    #[inline]
    pub fn layers(&self) -> &[ArcLayer] {
        &self.layers
    }

    /// Half the width of the base (user-visible) layer on a minimum arc, in grid units.
    #[inline]
    pub fn base_extend(&self) -> i64 {
        self.base_extend
    }

    /// The largest layer extension, i.e. half the full width of a minimum arc.
    pub fn max_layer_extend(&self) -> i64 {
        self.layers
            .iter()
            .map(|l| l.grid_extend)
            .max()
            .unwrap_or(self.base_extend)
    }

    /// The width offset stored by old binary libraries, in grid units.
    #[inline]
    pub fn legacy_width_offset(&self) -> i64 {
        self.legacy_width_offset
    }

    /// The extension over minimum given to new instances, in grid units.
    #[inline]
    pub fn default_extend_over_min(&self) -> i64 {
        self.default_extend_over_min
    }

    /// Whether new instances extend their ends by half their width.
    #[inline]
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    /// Whether new instances are drawn with a direction arrow.
    #[inline]
    pub fn is_directional(&self) -> bool {
        self.directional
    }

    /// Whether the current technology parameters disable this arc.
    #[inline]
    pub fn is_not_used(&self) -> bool {
        self.not_used
    }

    /// The drawn width of layer `index` for an arc with the given extension
    /// over minimum, in grid units.
    ///
    /// Returns `None` if `index` is out of range.
    pub fn layer_width(&self, index: usize, extend_over_min: i64) -> Option<i64> {
        let layer = self.layers.get(index)?;
        Some(2 * (extend_over_min + layer.grid_extend))
    }
}

/// Describes an arc template to be registered with
/// [`TechnologyBuilder::add_arc`](crate::tech::TechnologyBuilder::add_arc).
///
/// Widths are given in lambda and validated on registration.
#[derive(Debug, Clone)]
pub struct ArcSpec {
    /// The template name.
    pub name: ArcStr,
    /// The electrical function.
    pub function: ArcFunction,
    /// `(layer, style, half-width in lambda)` for each layer.
    pub layers: Vec<(LayerId, Style, f64)>,
    /// Index into `layers` of the base layer. Defaults to the first layer.
    pub base_layer: usize,
    /// Width offset stored by old binary libraries, in lambda.
    pub legacy_width_offset: f64,
    /// Default extension over minimum for new instances, in lambda.
    pub default_extend_over_min: f64,
    /// Whether new instances extend their ends.
    pub extended: bool,
    /// Whether new instances are directional.
    pub directional: bool,
    /// Whether the arc is disabled by the technology parameters.
    pub not_used: bool,
}

impl ArcSpec {
    /// An arc with the given name, function and layers, and defaults elsewhere.
    pub fn new(
        name: impl Into<ArcStr>,
        function: ArcFunction,
        layers: impl IntoIterator<Item = (LayerId, Style, f64)>,
    ) -> Self {
        Self {
            name: name.into(),
            function,
            layers: layers.into_iter().collect(),
            base_layer: 0,
            legacy_width_offset: 0.,
            default_extend_over_min: 0.,
            extended: true,
            directional: false,
            not_used: false,
        }
    }

    /// Sets the width offset used by old binary libraries.
    pub fn legacy_width_offset(mut self, offset: f64) -> Self {
        self.legacy_width_offset = offset;
        self
    }

    /// Sets whether new instances extend their ends.
    pub fn extended(mut self, extended: bool) -> Self {
        self.extended = extended;
        self
    }

    /// Sets whether new instances are directional.
    pub fn directional(mut self, directional: bool) -> Self {
        self.directional = directional;
        self
    }

    /// Marks the arc as disabled by the technology parameters.
    pub fn not_used(mut self, not_used: bool) -> Self {
        self.not_used = not_used;
        self
    }
}
