pub mod color;
pub mod filter;
pub mod geometric;

pub use color::*;
pub use filter::*;
pub use geometric::*;
