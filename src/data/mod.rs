pub mod ascii;
pub mod builtin;
pub mod csv;
pub mod dataset;

pub use ascii::render_ascii;
pub use dataset::{Batch, Dataset};
