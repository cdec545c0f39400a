//! streetlens-warehouse — Read-only access to the usage-statistics warehouse.
//!
//! Two concerns live here: resolving a USRN centre-line into a buffered
//! bounding box for the features APIs, and summarising historical
//! street-works permits per promoter with a regulator-licence sector
//! classification.

pub mod geometry;
pub mod pool;
pub mod works;

pub use geometry::buffered_bbox_from_wkt;
pub use pool::Warehouse;
