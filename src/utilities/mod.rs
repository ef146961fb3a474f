pub mod layout;

pub use layout::{background_layout, fit_within, top_left_to_centered};
