//! Widget system: the `Widget` trait shared by mounted components.

pub mod traits;

pub use traits::Widget;
