pub mod context;
pub mod field;
pub mod stats;
pub mod view;

pub use context::*;
pub use field::*;
pub use stats::*;
pub use view::*;
