//! Caller-facing chart API: the compact/expanded view state machine, its
//! configuration, exports and the multi-chart board.

mod board;
mod export;
mod json_contract;
mod surface;
mod view;
mod view_config;
mod viewer;

pub use board::{ChartBoard, ThemeObserver};
pub use export::{DataFormat, ExportedImage, ImageFormat, export_data, export_image};
pub use json_contract::{CHART_SPEC_JSON_SCHEMA_V1, ChartSpecJsonContractV1};
pub use surface::{HeadlessSurfaceProvider, SurfaceKind, SurfaceProvider};
pub use view::{ChartView, ViewState};
pub use view_config::ChartViewConfig;
#[cfg(feature = "external-viewer")]
pub use viewer::SystemViewerLauncher;
pub use viewer::{ViewerCompletion, ViewerLauncher, ViewerOutcome};
