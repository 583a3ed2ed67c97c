// Rotating Content Display
// Hero text and testimonial carousels: one entry at a time, advanced on a timer
// with a fade between entries, plus direct selection from dot indicators.

pub mod display;
pub mod list;
pub mod rotator;

pub use display::{Frame, RotatingDisplay};
pub use list::{RotationError, RotationList, RotationTiming, Testimonial, TextPair};
pub use rotator::{Phase, Rotator};
