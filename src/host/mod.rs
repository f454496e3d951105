//! Host collaborator implementations.
//!
//! Concrete implementations of the traits in [`crate::traits`]:
//! - [`EventBus`]: in-process [`EventSource`](crate::traits::EventSource)
//! - [`IntervalFrames`]: timer-driven [`FrameSource`](crate::traits::FrameSource)
//! - [`SurfaceState`]: settable [`Surface`](crate::traits::Surface)
//! - [`JsonLinesReporter`]: [`Reporter`](crate::traits::Reporter) writing JSON lines
//!
//! The `fps-monitor` binary wires these together into a simulated host;
//! embedders with a real compositor clock or event loop implement the
//! traits themselves.

mod events;
mod frames;
mod reporter;
mod surface;

pub use events::EventBus;
pub use frames::IntervalFrames;
pub use reporter::JsonLinesReporter;
pub use surface::SurfaceState;
