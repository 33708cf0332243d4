pub mod network;
pub mod spec;

pub use network::{Network, ForwardCache};
pub use spec::NetworkSpec;
