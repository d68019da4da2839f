//! bagplot renders scalar time-series extracted from logged robot-message
//! streams. A chart engine handles axes, transforms, and progressive painting;
//! a background loader samples an archival store in coarse-to-fine order so
//! partial loads already preview the whole time window.

#![forbid(unsafe_code)]

pub mod axis;
pub mod chart;
pub mod dataset;
pub mod extract;
pub mod geom;
pub mod loader;
pub mod render;
pub mod store;
pub mod transform;
pub mod view;

pub use chart::{Chart, SharedChart};
pub use dataset::DataSet;
pub use extract::{ExtractError, FieldAccessor, FieldPath};
pub use geom::{Point, ScreenPoint, ScreenRect};
pub use loader::{IncrementalLoader, LoadListener, LoadWindow, PERIODS, Refinement, SeriesSink};
pub use render::{Antialias, Color, RecordingSurface, Surface, SurfaceOp};
pub use store::{Record, RecordStore, StoreError};
pub use transform::ChartTransform;
pub use view::{Range, Viewport};
