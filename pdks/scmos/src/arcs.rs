//! SCMOS arc templates.

use technology::prelude::*;

use crate::layers::{Layers, ScmosLayer};
use crate::{Params, MAX_METALS};

/// Registered arc ids.
#[derive(Debug, Clone)]
pub struct Arcs {
    /// Metal arcs, indexed by level minus one.
    pub metals: Vec<ArcId>,
    /// First polysilicon.
    pub poly1: ArcId,
    /// Second polysilicon.
    pub poly2: ArcId,
    /// P-type active, with its select and well.
    pub p_active: ArcId,
    /// N-type active, with its select and well.
    pub n_active: ArcId,
    /// Carbon nanotube.
    pub nanotube: ArcId,
}

impl Arcs {
    /// The metal arc at `level`, if there is one.
    pub fn metal(&self, level: u8) -> Option<ArcId> {
        self.metals.get(usize::from(level).checked_sub(1)?).copied()
    }
}

/// Half the width of a minimum metal arc at `level`, in lambda.
fn metal_half_width(level: u8) -> f64 {
    if level == MAX_METALS {
        2.5
    } else {
        1.5
    }
}

pub(crate) fn register(b: &mut TechnologyBuilder, layers: &Layers, params: &Params) -> Result<Arcs> {
    let mut metals = Vec::with_capacity(MAX_METALS as usize);
    for level in 1..=MAX_METALS {
        let Some(layer) = ScmosLayer::metal(level) else {
            continue;
        };
        let id = b.add_arc(
            ArcSpec::new(
                layer.name(),
                ArcFunction::Metal(level),
                [(layers.id(layer), Style::Filled, metal_half_width(level))],
            )
            .not_used(level > params.num_metals),
        )?;
        metals.push(id);
    }

    let poly1 = b.add_arc(ArcSpec::new(
        "polysilicon-1",
        ArcFunction::Poly(1),
        [(layers.poly1, Style::Filled, 1.)],
    ))?;
    let poly2 = b.add_arc(
        ArcSpec::new(
            "polysilicon-2",
            ArcFunction::Poly(2),
            [(layers.poly2, Style::Filled, 1.5)],
        )
        .not_used(!params.second_poly),
    )?;

    let p_active = b.add_arc(
        ArcSpec::new(
            "p-active",
            ArcFunction::DiffP,
            [
                (layers.p_active, Style::Filled, 1.5),
                (layers.p_select, Style::Filled, 3.5),
                (layers.n_well, Style::Filled, 7.5),
            ],
        )
        .legacy_width_offset(12.),
    )?;
    let n_active = b.add_arc(
        ArcSpec::new(
            "n-active",
            ArcFunction::DiffN,
            [
                (layers.n_active, Style::Filled, 1.5),
                (layers.n_select, Style::Filled, 3.5),
                (layers.p_well, Style::Filled, 7.5),
            ],
        )
        .legacy_width_offset(12.),
    )?;
    let nanotube = b.add_arc(ArcSpec::new(
        "nanotube",
        ArcFunction::Nanotube,
        [(layers.nanotube, Style::Filled, 0.5)],
    ))?;

    Ok(Arcs {
        metals,
        poly1,
        poly2,
        p_active,
        n_active,
        nanotube,
    })
}
