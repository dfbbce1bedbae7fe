//! The two rendering strategies: static frames with hit-testing, and
//! self-contained interactive bundles.

pub mod interactive;
pub mod static_render;

pub use interactive::{
    BridgeMessage, Bundle, BundleHost, BundlePayload, InteractiveBackend, MemoryBundleHost,
    read_embedded_payload,
};
pub use static_render::{
    HitRegion, HitShape, PLACEHOLDER_TEXT, PlotArea, StaticBackend, StaticRender,
    StaticRenderOptions,
};
