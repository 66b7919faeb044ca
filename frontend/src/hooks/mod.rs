pub mod use_points;

pub use use_points::*;
