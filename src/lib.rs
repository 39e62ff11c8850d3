//! Isochrone computation over routing graphs.
//!
//! An isochrone is the polygon enclosing everything reachable from an
//! origin within a cost threshold (travel time or distance). This crate
//! runs a bounded cost expansion over a road graph and turns the per-edge
//! cost records into band polygons with one of two strategies:
//!
//! - **concave balls** (default): buffered point clouds per edge and a
//!   concave hull per band; precise boundaries, cost grows with point
//!   density;
//! - **grid**: a rasterized cost surface with marching-squares contours;
//!   precision bounded by cell size, cost roughly linear in cell count.
//!
//! The entry point is [`builders::IsochroneMapBuilderFactory::build_map`].

pub mod builders;
pub mod config;
pub mod error;
pub(crate) mod geom;
pub mod model;
pub mod prelude;
pub mod traversal;

pub use config::IsochroneConfig;
pub use error::Error;
