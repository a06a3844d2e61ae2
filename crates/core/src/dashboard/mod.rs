//! Live dashboard: the per-viewer projection of active orders onto a map.

mod clock;
mod marker;
mod registry;
mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use marker::{ChannelMarkerLayer, DashboardUpdate, Marker, MarkerLayer, MarkerPopup};
pub use registry::MarkerRegistry;
pub use session::{DashboardSession, DashboardSettings, SweepReport};
