//! Cell primitives: identifiers, coordinates and the curve that orders them.

mod cell_id;
pub mod hilbert;
mod lat_lng;

pub use cell_id::{CellId, MAX_LEVEL};
pub use lat_lng::LatLng;
