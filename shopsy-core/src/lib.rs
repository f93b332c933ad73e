/// Shopsy Core Library - transform synchronization for the product viewer
///
/// Holds the target transform state edited by the control panel and the
/// pointer tracker, the eased entrance animation, and the per-frame
/// synchronizer that copies both onto the rendered object.

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod lighting;
pub mod panel;
pub mod pointer;
pub mod projection;
pub mod state;
pub mod sync;
pub mod transform;

// Re-export commonly used types
pub use animation::{AnimationRun, Easing, EntranceAnimator, RearmMode};
pub use config::ViewerConfig;
pub use error::ConfigError;
pub use geometry::{Mesh, Triangle, Vertex};
pub use lighting::{CheckerTexture, PointLight};
pub use panel::{ControlDescriptor, ControlPanelHandle, Field, PanelBackend, PanelRanges};
pub use pointer::{PointerBus, PointerLightTracker, PointerSample, PointerSubscription};
pub use projection::{Camera, ProjectionMode, ScreenPoint};
pub use state::{Channel, SharedState, TransformState};
pub use sync::{FrameSynchronizer, RenderHandle};
pub use transform::Transform;
