//! Everything the transit map shows, independent of where it is drawn.
//!
//! The map shows one of two views. [`ViewMode::Stops`] draws every stop as a circle sized by its demand with a
//! legend of reference sizes, [`ViewMode::Routes`] draws every route as a line that grows one coordinate at a
//! time with a marker at its start. [`ViewController`] owns whichever [`Overlay`] and [`Legend`] are on the map.

pub mod animate;
pub mod controller;
pub mod features;
pub mod legend;
pub mod mode;
pub mod overlay;
pub mod style;

pub use animate::{AnimationHandle, Tick, REVEAL_INTERVAL_MS};
pub use controller::{LoadError, LoadOutcome, LoadRequest, ViewController};
pub use features::{LatLng, RouteFeature, StopFeature};
pub use legend::Legend;
pub use mode::ViewMode;
pub use overlay::Overlay;
