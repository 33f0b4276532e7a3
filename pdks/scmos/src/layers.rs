//! The set of SCMOS layers.
#![allow(missing_docs)]

use technology::prelude::*;

macro_rules! scmos_layers {
    ($({$typ:ident, $field:ident, $name:literal, $function:expr, $extras:expr, $height:literal, $gds:expr}),* $(,)?) => {
        /// An enumeration of SCMOS layers, in registration order.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum ScmosLayer {
            $(
                #[doc = concat!("The `", $name, "` layer.")]
                $typ,
            )*
        }

        impl ScmosLayer {
            /// Every layer, in registration order.
            pub const ALL: &'static [ScmosLayer] = &[$(ScmosLayer::$typ),*];

            /// The layer name.
            pub fn name(&self) -> &'static str {
                match self {
                    $(ScmosLayer::$typ => $name),*
                }
            }

            /// The registration spec of this layer.
            pub fn spec(&self) -> LayerSpec {
                match self {
                    $(
                        ScmosLayer::$typ => LayerSpec::new($name, $function)
                            .extras($extras)
                            .height($height, 1.)
                    ),*
                }
            }

            /// The MOSIS GDS layer.
            pub fn gds(&self) -> GdsLayer {
                match self {
                    $(ScmosLayer::$typ => $gds),*
                }
            }
        }

        /// Registered layer ids.
        #[derive(Debug, Copy, Clone)]
        pub struct Layers {
            $(pub $field: LayerId,)*
        }

        impl Layers {
            pub(crate) fn register(b: &mut TechnologyBuilder) -> Result<Self> {
                $(let $field = b.add_layer(ScmosLayer::$typ.spec())?;)*
                Ok(Self { $($field),* })
            }

            /// The id of `layer`.
            pub fn id(&self, layer: ScmosLayer) -> LayerId {
                match layer {
                    $(ScmosLayer::$typ => self.$field),*
                }
            }
        }
    };
}

const NONE: FunctionExtras = FunctionExtras::empty();

scmos_layers! {
    {Metal1, metal1, "metal-1", Function::Metal(1), NONE, 17., GdsLayer(49, 0)},
    {Metal2, metal2, "metal-2", Function::Metal(2), NONE, 19., GdsLayer(51, 0)},
    {Metal3, metal3, "metal-3", Function::Metal(3), NONE, 21., GdsLayer(62, 0)},
    {Metal4, metal4, "metal-4", Function::Metal(4), NONE, 23., GdsLayer(31, 0)},
    {Metal5, metal5, "metal-5", Function::Metal(5), NONE, 25., GdsLayer(33, 0)},
    {Metal6, metal6, "metal-6", Function::Metal(6), NONE, 27., GdsLayer(37, 0)},
    {Poly1, poly1, "polysilicon-1", Function::Poly(1), NONE, 12., GdsLayer(46, 0)},
    {Poly2, poly2, "polysilicon-2", Function::Poly(2), NONE, 13., GdsLayer(56, 0)},
    {TransistorPoly, transistor_poly, "transistor-poly", Function::Gate, FunctionExtras::INSIDE_TRANSISTOR, 12., GdsLayer(46, 0)},
    {PActive, p_active, "p-active", Function::DiffP, NONE, 10., GdsLayer(43, 0)},
    {NActive, n_active, "n-active", Function::DiffN, NONE, 10., GdsLayer(43, 0)},
    {PSelect, p_select, "p-select", Function::ImplantP, NONE, 9., GdsLayer(44, 0)},
    {NSelect, n_select, "n-select", Function::ImplantN, NONE, 9., GdsLayer(45, 0)},
    {PWell, p_well, "p-well", Function::WellP, NONE, 8., GdsLayer(41, 0)},
    {NWell, n_well, "n-well", Function::WellN, NONE, 8., GdsLayer(42, 0)},
    {PolyCut, poly_cut, "poly-cut", Function::Contact(1), FunctionExtras::CONPOLY, 15., GdsLayer(47, 0)},
    {ActiveCut, active_cut, "active-cut", Function::Contact(1), FunctionExtras::CONDIFF, 15., GdsLayer(48, 0)},
    {Via1, via1, "via-1", Function::Contact(2), FunctionExtras::CONMETAL, 18., GdsLayer(50, 0)},
    {Via2, via2, "via-2", Function::Contact(3), FunctionExtras::CONMETAL, 20., GdsLayer(61, 0)},
    {Via3, via3, "via-3", Function::Contact(4), FunctionExtras::CONMETAL, 22., GdsLayer(30, 0)},
    {Via4, via4, "via-4", Function::Contact(5), FunctionExtras::CONMETAL, 24., GdsLayer(32, 0)},
    {Via5, via5, "via-5", Function::Contact(6), FunctionExtras::CONMETAL, 26., GdsLayer(36, 0)},
    {Nanotube, nanotube, "nanotube", Function::Nanotube, NONE, 11., GdsLayer(70, 0)},
    {Overglass, overglass, "overglass", Function::Overglass, NONE, 30., GdsLayer(52, 0)},
}

impl ScmosLayer {
    /// The metal layer at `level`, if there is one.
    pub fn metal(level: u8) -> Option<Self> {
        Some(match level {
            1 => Self::Metal1,
            2 => Self::Metal2,
            3 => Self::Metal3,
            4 => Self::Metal4,
            5 => Self::Metal5,
            6 => Self::Metal6,
            _ => return None,
        })
    }

    /// The via between metal `level` and metal `level + 1`, if there is one.
    pub fn via(level: u8) -> Option<Self> {
        Some(match level {
            1 => Self::Via1,
            2 => Self::Via2,
            3 => Self::Via3,
            4 => Self::Via4,
            5 => Self::Via5,
            _ => return None,
        })
    }
}

/// Pin layers of the conducting layers arcs run on.
#[derive(Debug, Clone)]
pub struct PinLayers {
    pub metals: Vec<LayerId>,
    pub poly1: LayerId,
    pub poly2: LayerId,
    pub p_active: LayerId,
    pub n_active: LayerId,
}

impl PinLayers {
    pub(crate) fn register(b: &mut TechnologyBuilder, layers: &Layers) -> Result<Self> {
        let metals = (1..=crate::MAX_METALS)
            .filter_map(ScmosLayer::metal)
            .map(|l| b.add_pseudo_layer(layers.id(l)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            metals,
            poly1: b.add_pseudo_layer(layers.poly1)?,
            poly2: b.add_pseudo_layer(layers.poly2)?,
            p_active: b.add_pseudo_layer(layers.p_active)?,
            n_active: b.add_pseudo_layer(layers.n_active)?,
        })
    }
}

/// The MOSIS foundry: every layer mapped to its GDS number.
pub(crate) fn mosis() -> FoundrySpec {
    ScmosLayer::ALL
        .iter()
        .fold(FoundrySpec::new("mosis"), |spec, layer| {
            spec.map(layer.name(), layer.gds())
        })
}
