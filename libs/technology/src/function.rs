//! Layer functions and their modifier flags.
//!
//! A layer's purpose is described by a base [`Function`] plus a set of
//! orthogonal [`FunctionExtras`]. Classification predicates such as
//! [`Function::is_metal`] or [`is_gate_poly`] are plain functions over the
//! tag and flags.

use std::fmt::Display;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// The highest metal and contact level a technology may use.
pub const MAX_METAL_LEVEL: u8 = 12;

/// The highest polysilicon level a technology may use.
pub const MAX_POLY_LEVEL: u8 = 3;

/// The base function of a layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Function {
    /// Unknown purpose.
    Unknown,
    /// A metal routing layer, levels 1 through [`MAX_METAL_LEVEL`].
    Metal(u8),
    /// A polysilicon layer, levels 1 through [`MAX_POLY_LEVEL`].
    Poly(u8),
    /// Transistor gate polysilicon.
    Gate,
    /// Diffusion of unspecified type.
    Diff,
    /// P-type diffusion.
    DiffP,
    /// N-type diffusion.
    DiffN,
    /// Implant of unspecified type.
    Implant,
    /// P-type implant.
    ImplantP,
    /// N-type implant.
    ImplantN,
    /// A contact cut between two conducting layers, levels 1 through [`MAX_METAL_LEVEL`].
    Contact(u8),
    /// A plug between layers.
    Plug,
    /// Overglass (passivation openings).
    Overglass,
    /// A resistor marker.
    Resistor,
    /// A capacitor marker.
    Capacitance,
    /// A transistor marker.
    Transistor,
    /// The substrate.
    Substrate,
    /// A well of unspecified type.
    Well,
    /// A P-type well.
    WellP,
    /// An N-type well.
    WellN,
    /// Carbon nanotube material.
    Nanotube,
    /// A bus.
    Bus,
    /// Artwork (non-physical drawing).
    Art,
    /// Control information.
    Control,
}

bitflags! {
    /// Modifier flags that refine a layer [`Function`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct FunctionExtras: u32 {
        /// P-type material.
        const P_TYPE = 0x0001;
        /// N-type material.
        const N_TYPE = 0x0002;
        /// Depletion mode.
        const DEPLETION = 0x0004;
        /// Enhancement mode.
        const ENHANCEMENT = 0x0008;
        /// Light doping.
        const LIGHT = 0x0010;
        /// Heavy doping.
        const HEAVY = 0x0020;
        /// A pseudo layer used only for editing affordances.
        const PSEUDO = 0x0040;
        /// Not electrically significant.
        const NON_ELECTRICAL = 0x0080;
        /// A contact that connects to metal.
        const CONMETAL = 0x0100;
        /// A contact that connects to polysilicon.
        const CONPOLY = 0x0200;
        /// A contact that connects to diffusion.
        const CONDIFF = 0x0400;
        /// High threshold voltage.
        const HIGH_VT = 0x0800;
        /// Low threshold voltage.
        const LOW_VT = 0x1000;
        /// Material inside a transistor.
        const INSIDE_TRANSISTOR = 0x2000;
        /// Thick oxide.
        const THICK = 0x4000;
    }
}

const EXTRA_NAMES: [(&str, FunctionExtras); 15] = [
    ("p-type", FunctionExtras::P_TYPE),
    ("n-type", FunctionExtras::N_TYPE),
    ("depletion", FunctionExtras::DEPLETION),
    ("enhancement", FunctionExtras::ENHANCEMENT),
    ("light", FunctionExtras::LIGHT),
    ("heavy", FunctionExtras::HEAVY),
    ("pseudo", FunctionExtras::PSEUDO),
    ("non-electrical", FunctionExtras::NON_ELECTRICAL),
    ("connects-metal", FunctionExtras::CONMETAL),
    ("connects-poly", FunctionExtras::CONPOLY),
    ("connects-diff", FunctionExtras::CONDIFF),
    ("high-vt", FunctionExtras::HIGH_VT),
    ("low-vt", FunctionExtras::LOW_VT),
    ("inside-transistor", FunctionExtras::INSIDE_TRANSISTOR),
    ("thick", FunctionExtras::THICK),
];

impl FunctionExtras {
    /// Parses a list of flag names such as `"p-type"` or `"inside-transistor"`.
    ///
    /// Returns the first unrecognized name as an error.
    ///
    /// # Example
    ///
    /// ```
    /// # use technology::function::FunctionExtras;
    /// let extras = FunctionExtras::from_names(["p-type", "heavy"]).unwrap();
    /// assert_eq!(extras, FunctionExtras::P_TYPE | FunctionExtras::HEAVY);
    /// assert_eq!(FunctionExtras::from_names(["purple"]), Err("purple".to_string()));
    /// ```
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, String> {
        let mut extras = Self::empty();
        for name in names {
            let (_, flag) = EXTRA_NAMES
                .iter()
                .find(|(n, _)| *n == name)
                .ok_or_else(|| name.to_string())?;
            extras |= *flag;
        }
        Ok(extras)
    }

    /// The names of the flags that are set.
    pub fn names(&self) -> Vec<&'static str> {
        EXTRA_NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl Function {
    /// The metal function at `level`, if the level is supported.
    ///
    /// # Example
    ///
    /// ```
    /// # use technology::function::Function;
    /// assert_eq!(Function::metal(3), Some(Function::Metal(3)));
    /// assert_eq!(Function::metal(0), None);
    /// assert_eq!(Function::metal(13), None);
    /// ```
    pub fn metal(level: u8) -> Option<Self> {
        (1..=MAX_METAL_LEVEL)
            .contains(&level)
            .then_some(Self::Metal(level))
    }

    /// The polysilicon function at `level`, if the level is supported.
    pub fn poly(level: u8) -> Option<Self> {
        (1..=MAX_POLY_LEVEL)
            .contains(&level)
            .then_some(Self::Poly(level))
    }

    /// The contact function at `level`, if the level is supported.
    pub fn contact(level: u8) -> Option<Self> {
        (1..=MAX_METAL_LEVEL)
            .contains(&level)
            .then_some(Self::Contact(level))
    }

    /// Returns `true` if this function is within its supported level range.
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Metal(l) | Self::Contact(l) => (1..=MAX_METAL_LEVEL).contains(&l),
            Self::Poly(l) => (1..=MAX_POLY_LEVEL).contains(&l),
            _ => true,
        }
    }

    /// The level of a metal, polysilicon or contact function.
    ///
    /// Gate polysilicon is level 1.
    pub fn level(&self) -> Option<u8> {
        match *self {
            Self::Metal(l) | Self::Poly(l) | Self::Contact(l) => Some(l),
            Self::Gate => Some(1),
            _ => None,
        }
    }

    /// Returns `true` for metal layers.
    pub fn is_metal(&self) -> bool {
        matches!(self, Self::Metal(_))
    }

    /// Returns `true` for polysilicon layers, including gate polysilicon.
    pub fn is_poly(&self) -> bool {
        matches!(self, Self::Poly(_) | Self::Gate)
    }

    /// Returns `true` for contact cuts and plugs.
    pub fn is_contact(&self) -> bool {
        matches!(self, Self::Contact(_) | Self::Plug)
    }

    /// Returns `true` for diffusion layers.
    pub fn is_diff(&self) -> bool {
        matches!(self, Self::Diff | Self::DiffP | Self::DiffN)
    }

    /// Returns `true` for implants, wells and the substrate.
    pub fn is_substrate(&self) -> bool {
        matches!(
            self,
            Self::Substrate
                | Self::Well
                | Self::WellP
                | Self::WellN
                | Self::Implant
                | Self::ImplantP
                | Self::ImplantN
        )
    }

    /// Returns `true` for implant layers.
    pub fn is_implant(&self) -> bool {
        matches!(self, Self::Implant | Self::ImplantP | Self::ImplantN)
    }

    /// Returns `true` for wells.
    pub fn is_well(&self) -> bool {
        matches!(self, Self::Well | Self::WellP | Self::WellN)
    }

    /// Returns `true` for layers that carry current between devices.
    pub fn is_conductor(&self) -> bool {
        self.is_metal() || self.is_poly() || self.is_diff() || matches!(self, Self::Nanotube)
    }

    /// Parses a function name as produced by the [`Display`] implementation.
    ///
    /// # Example
    ///
    /// ```
    /// # use technology::function::Function;
    /// assert_eq!(Function::from_name("metal-2"), Some(Function::Metal(2)));
    /// assert_eq!(Function::from_name("diff-p"), Some(Function::DiffP));
    /// assert_eq!(Function::from_name("metal-14"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some((base, level)) = name.rsplit_once('-') {
            if let Ok(level) = level.parse::<u8>() {
                return match base {
                    "metal" => Self::metal(level),
                    "poly" => Self::poly(level),
                    "contact" => Self::contact(level),
                    _ => None,
                };
            }
        }
        Some(match name {
            "unknown" => Self::Unknown,
            "gate" => Self::Gate,
            "diff" => Self::Diff,
            "diff-p" => Self::DiffP,
            "diff-n" => Self::DiffN,
            "implant" => Self::Implant,
            "implant-p" => Self::ImplantP,
            "implant-n" => Self::ImplantN,
            "plug" => Self::Plug,
            "overglass" => Self::Overglass,
            "resistor" => Self::Resistor,
            "capacitance" => Self::Capacitance,
            "transistor" => Self::Transistor,
            "substrate" => Self::Substrate,
            "well" => Self::Well,
            "well-p" => Self::WellP,
            "well-n" => Self::WellN,
            "nanotube" => Self::Nanotube,
            "bus" => Self::Bus,
            "art" => Self::Art,
            "control" => Self::Control,
            _ => return None,
        })
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Metal(l) => write!(f, "metal-{l}"),
            Self::Poly(l) => write!(f, "poly-{l}"),
            Self::Contact(l) => write!(f, "contact-{l}"),
            Self::Unknown => write!(f, "unknown"),
            Self::Gate => write!(f, "gate"),
            Self::Diff => write!(f, "diff"),
            Self::DiffP => write!(f, "diff-p"),
            Self::DiffN => write!(f, "diff-n"),
            Self::Implant => write!(f, "implant"),
            Self::ImplantP => write!(f, "implant-p"),
            Self::ImplantN => write!(f, "implant-n"),
            Self::Plug => write!(f, "plug"),
            Self::Overglass => write!(f, "overglass"),
            Self::Resistor => write!(f, "resistor"),
            Self::Capacitance => write!(f, "capacitance"),
            Self::Transistor => write!(f, "transistor"),
            Self::Substrate => write!(f, "substrate"),
            Self::Well => write!(f, "well"),
            Self::WellP => write!(f, "well-p"),
            Self::WellN => write!(f, "well-n"),
            Self::Nanotube => write!(f, "nanotube"),
            Self::Bus => write!(f, "bus"),
            Self::Art => write!(f, "art"),
            Self::Control => write!(f, "control"),
        }
    }
}

/// Returns `true` for polysilicon that forms a transistor gate.
///
/// This is either the dedicated [`Function::Gate`] or any polysilicon level
/// flagged [`FunctionExtras::INSIDE_TRANSISTOR`].
pub fn is_gate_poly(function: Function, extras: FunctionExtras) -> bool {
    matches!(function, Function::Gate)
        || (function.is_poly() && extras.contains(FunctionExtras::INSIDE_TRANSISTOR))
}

/// Returns `true` for polysilicon that lies outside any transistor.
pub fn is_field_poly(function: Function, extras: FunctionExtras) -> bool {
    function.is_poly() && !is_gate_poly(function, extras)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        let mut all = vec![
            Function::Unknown,
            Function::Gate,
            Function::DiffN,
            Function::ImplantP,
            Function::Nanotube,
            Function::Control,
        ];
        all.extend((1..=MAX_METAL_LEVEL).map(Function::Metal));
        all.extend((1..=MAX_METAL_LEVEL).map(Function::Contact));
        all.extend((1..=MAX_POLY_LEVEL).map(Function::Poly));
        for f in all {
            assert_eq!(Function::from_name(&f.to_string()), Some(f));
        }
    }

    #[test]
    fn classification_predicates() {
        assert!(Function::Metal(4).is_metal());
        assert!(Function::Gate.is_poly());
        assert!(Function::Poly(2).is_poly());
        assert!(Function::Plug.is_contact());
        assert!(Function::DiffP.is_diff());
        assert!(Function::WellN.is_substrate());
        assert!(Function::ImplantN.is_substrate());
        assert!(Function::ImplantN.is_implant());
        assert!(!Function::WellN.is_implant());
        assert!(!Function::Metal(1).is_substrate());
        assert_eq!(Function::Gate.level(), Some(1));
        assert_eq!(Function::Transistor.level(), None);
        assert!(!Function::Metal(13).is_valid());
    }

    #[test]
    fn gate_poly_uses_extras() {
        assert!(is_gate_poly(Function::Gate, FunctionExtras::empty()));
        assert!(is_gate_poly(
            Function::Poly(1),
            FunctionExtras::INSIDE_TRANSISTOR
        ));
        assert!(!is_gate_poly(Function::Poly(1), FunctionExtras::empty()));
        assert!(is_field_poly(Function::Poly(1), FunctionExtras::empty()));
        assert!(!is_field_poly(Function::Metal(1), FunctionExtras::empty()));
    }

    #[test]
    fn extras_names() {
        let extras = FunctionExtras::PSEUDO | FunctionExtras::THICK;
        assert_eq!(extras.names(), vec!["pseudo", "thick"]);
    }
}
