//! Commonly used types.

pub use crate::arc::{ArcFunction, ArcId, ArcLayer, ArcSpec, ArcTemplate};
pub use crate::desc::TechDescription;
pub use crate::diagnostics::{Cause, Diagnostic, IssueSet, Severity, TechIssue};
pub use crate::edge::{EdgeExpr, TechPoint};
pub use crate::env::Environment;
pub use crate::error::{Error, Result};
pub use crate::function::{is_field_poly, is_gate_poly, Function, FunctionExtras};
pub use crate::instance::{ArcInst, Arrows, CutAlignment, NodeInst, NodeOverrides};
pub use crate::layer::{Layer, LayerFilter, LayerId, LayerSpec};
pub use crate::node::{
    CutRule, NodeFunction, NodeId, NodeLayer, NodeSpec, NodeTemplate, PrimitivePort,
    Representation, SerpentineExtent,
};
pub use crate::param::{ParamSchema, ParamValue, State, TechFactory, TechHandle};
pub use crate::shape::multicut::MultiCutData;
pub use crate::shape::{ShapeBuilder, ShapeElement, ShapeOptions, TraceBreak};
pub use crate::size::{FileVersion, SizeCorrector, SizeOffset};
pub use crate::style::Style;
pub use crate::tech::{
    Foundry, FoundrySpec, GdsLayer, TechSettings, Technology, TechnologyBuilder,
};
