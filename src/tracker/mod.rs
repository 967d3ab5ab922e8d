pub mod controller;
pub mod observable;
pub mod state;

pub use controller::TrackerController;
pub use observable::Observable;
pub use state::TrackerState;
