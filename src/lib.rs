pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod train;
pub mod data;

// Convenience re-exports
pub use error::{NetError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::Activation;
pub use layers::dense::Layer;
pub use network::network::{Network, ForwardCache};
pub use network::spec::NetworkSpec;
pub use loss::mse::MseLoss;
pub use train::trainer::train_step;
pub use train::loop_fn::train_loop;
pub use train::train_config::TrainConfig;
pub use data::dataset::{Batch, Dataset};
