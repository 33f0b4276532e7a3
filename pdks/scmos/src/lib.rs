//! The MOSIS scalable CMOS technology.
//!
//! Lambda-based design rules with up to six metals, an optional second
//! polysilicon and a carbon-nanotube transistor. The number of metals and the
//! second polysilicon are technology parameters; templates disabled by the
//! current parameters stay in the catalog, marked as not used.
//!
//! ```
//! # use technology::prelude::*;
//! # use scmos::{Scmos, NUM_METALS};
//! let handle = TechHandle::new(Scmos).unwrap();
//! assert!(handle.current().find_arc("metal-6").unwrap().is_not_used());
//!
//! let tech = handle.set_param(NUM_METALS, 6i64).unwrap();
//! assert!(!tech.find_arc("metal-6").unwrap().is_not_used());
//! ```
#![warn(missing_docs)]

use arcstr::ArcStr;
use technology::prelude::*;

pub mod arcs;
pub mod layers;
mod mos;
mod nodes;

#[cfg(test)]
mod tests;

/// The most metal layers the technology supports.
pub const MAX_METALS: u8 = 6;
/// The fewest metal layers the technology supports.
pub const MIN_METALS: u8 = 2;

/// The parameter selecting the number of metal layers in use.
pub const NUM_METALS: &str = "num-metals";
/// The parameter enabling the second polysilicon.
pub const SECOND_POLY: &str = "second-poly";

/// SCMOS parameters, read from a technology [`State`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Params {
    /// The number of metal layers in use.
    pub num_metals: u8,
    /// Whether the second polysilicon is in use.
    pub second_poly: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            num_metals: 4,
            second_poly: false,
        }
    }
}

impl Params {
    /// Reads parameters from `state`, falling back to defaults for missing values.
    pub fn from_state(state: &State) -> Self {
        let default = Self::default();
        Self {
            num_metals: state
                .int(NUM_METALS)
                .and_then(|v| u8::try_from(v).ok())
                .unwrap_or(default.num_metals),
            second_poly: state.bool(SECOND_POLY).unwrap_or(default.second_poly),
        }
    }
}

/// Builds SCMOS technologies.
#[derive(Debug, Default, Copy, Clone)]
pub struct Scmos;

impl TechFactory for Scmos {
    fn name(&self) -> ArcStr {
        arcstr::literal!("scmos")
    }

    fn schema(&self) -> ParamSchema {
        let default = Params::default();
        ParamSchema::new()
            .int(
                NUM_METALS,
                MIN_METALS.into(),
                MAX_METALS.into(),
                default.num_metals.into(),
            )
            .bool(SECOND_POLY, default.second_poly)
    }

    fn build(&self, state: &State) -> Result<Technology> {
        let params = Params::from_state(state);
        let mut b = TechnologyBuilder::new(self.name()).with_state(state.clone());
        b.set_settings(TechSettings {
            bubble_size: 1.2,
            arrow_length: 1.,
            scale: 200.,
            description: "MOSIS scalable CMOS".to_string(),
        })?;

        let layers = layers::Layers::register(&mut b)?;
        let pins = layers::PinLayers::register(&mut b, &layers)?;
        let arcs = arcs::register(&mut b, &layers, &params)?;
        nodes::register_pins(&mut b, &pins, &arcs, &params)?;
        nodes::register_contacts(&mut b, &layers, &arcs, &params)?;
        mos::register(&mut b, &layers, &arcs)?;
        nodes::register_pure_layer_nodes(&mut b, &layers, &params)?;
        b.add_foundry(layers::mosis())?;

        b.alias_layer("polysilicon", "polysilicon-1");
        b.alias_layer("poly-2", "polysilicon-2");
        b.alias_arc("polysilicon", "polysilicon-1");
        b.alias_node("metal-1-polysilicon-con", "metal-1-polysilicon-1-con");
        b.alias_node("polysilicon-pin", "polysilicon-1-pin");

        tracing::debug!(
            num_metals = params.num_metals,
            second_poly = params.second_poly,
            "building scmos"
        );
        Ok(b.build())
    }
}
