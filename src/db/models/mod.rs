pub mod measurement;

pub use measurement::{Measurement, UNSAVED_ID};
