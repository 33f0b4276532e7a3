//! Technology descriptions and the shapes of their primitives.
//!
//! A [`Technology`] is a locked catalog of layers, arc templates and node
//! templates. Templates describe geometry relative to an instance's size
//! through [edge expressions](edge); the [shape builder](shape) evaluates a
//! placed [`NodeInst`] or [`ArcInst`] into polygons, expanding multi-cut
//! contacts, serpentine transistors, nanotube rails and arc decorations.
//!
//! Technologies are immutable once built. Parameterized technologies are
//! rebuilt as new snapshots through a [`TechHandle`]; sessions keep their
//! handles in an [`Environment`].
//!
//! # Examples
//!
//! ```
//! # use geometry::prelude::*;
//! # use technology::prelude::*;
//! let mut b = TechnologyBuilder::new("demo");
//! let m1 = b.add_layer(LayerSpec::new("metal-1", Function::Metal(1))).unwrap();
//! let pin = b
//!     .add_node(NodeSpec::new(
//!         "metal-1-pin",
//!         NodeFunction::Pin,
//!         (2., 2.),
//!         [NodeLayer::inset_box(m1, 0)],
//!     ))
//!     .unwrap();
//! let tech = b.build();
//!
//! let inst = NodeInst::new(tech.node(pin).unwrap(), Point::new(400, 0));
//! let shapes = tech.node_shapes(&inst, &ShapeOptions::default()).unwrap();
//! assert_eq!(shapes.len(), 1);
//! assert_eq!(
//!     shapes[0].polygon.bbox(),
//!     Some(Rect::from_sides(0., -1., 2., 1.))
//! );
//! ```
#![warn(missing_docs)]

pub mod arc;
pub mod desc;
pub mod diagnostics;
pub mod edge;
pub mod env;
pub mod error;
pub mod function;
pub mod instance;
pub mod layer;
pub mod node;
pub mod param;
pub mod prelude;
pub mod shape;
pub mod size;
pub mod style;
pub mod tech;


pub use env::Environment;
pub use error::{Error, Result};
pub use instance::{ArcInst, NodeInst};
pub use param::TechHandle;
pub use tech::{Technology, TechnologyBuilder};
