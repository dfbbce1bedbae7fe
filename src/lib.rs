//! report-chart: dual-backend chart engine for reporting dashboards.
//!
//! One `ChartSpec` renders either to a retained static frame with
//! hit-testing (compact previews, raster/vector export) or to a
//! self-contained interactive HTML bundle (expanded view). `ChartView`
//! owns the compact/expanded state machine and exactly one live surface;
//! `extract_chart` reads data back out of a static frame.

pub mod api;
pub mod backend;
pub mod core;
pub mod error;
pub mod extract;
pub mod interaction;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{
    ChartBoard, ChartView, ChartViewConfig, DataFormat, ExportedImage, HeadlessSurfaceProvider,
    ImageFormat, SurfaceKind, SurfaceProvider, ViewState,
};
pub use core::{ChartSpec, ChartType, DataSourceMetadata, SeriesData, ThemeContext};
pub use error::{ChartError, ChartResult};
pub use extract::{ExtractedChart, extract_chart};
