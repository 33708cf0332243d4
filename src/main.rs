use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use backprop_nn::data::ascii::{render_ascii, square_side};
use backprop_nn::train::accuracy;
use backprop_nn::{train_loop, Dataset, Matrix, Network, NetworkSpec, Result, TrainConfig};

/// Trains a feed-forward network on labelled CSV data (label first, then
/// features) and reports test accuracy.
#[derive(Parser, Debug)]
#[command(name = "backprop-nn", version)]
struct Args {
    /// Training CSV
    #[arg(long)]
    train: PathBuf,

    /// Test CSV, scored after every epoch
    #[arg(long)]
    test: Option<PathBuf>,

    /// Network architecture JSON; takes precedence over --layers/--activations
    #[arg(long)]
    network: Option<PathBuf>,

    /// Layer widths, input first
    #[arg(long, value_delimiter = ',', default_values_t = [784, 100, 10])]
    layers: Vec<usize>,

    /// One activation per layer transition (sigmoid, relu, tanh)
    #[arg(long, value_delimiter = ',', default_values_t = ["sigmoid".to_string(), "sigmoid".to_string()])]
    activations: Vec<String>,

    /// Training config JSON; the flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    epochs: Option<usize>,

    #[arg(long)]
    batch_size: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f64>,

    /// Seeds weight initialisation and shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Number of output classes
    #[arg(long, default_value_t = 10)]
    classes: usize,

    /// Features are divided by this value
    #[arg(long, default_value_t = 255.0)]
    scale: f64,

    /// Print this many test images as ASCII with their predictions
    #[arg(long, default_value_t = 0)]
    show: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => TrainConfig::load_json(path)?,
        None => TrainConfig::default(),
    };
    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(learning_rate) = args.learning_rate {
        config.learning_rate = learning_rate;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let spec = match &args.network {
        Some(path) => NetworkSpec::load_json(path)?,
        None => NetworkSpec {
            layers: args.layers.clone(),
            activations: args.activations.clone(),
            seed: config.seed,
        },
    };
    let mut network = spec.build()?;
    info!(layers = ?network.widths(), activations = ?spec.activations, "network ready");

    let mut train = Dataset::load_csv(&args.train, args.classes)?.with_scale(args.scale)?;
    let test = args
        .test
        .as_ref()
        .map(|path| Dataset::load_csv(path, args.classes).and_then(|d| d.with_scale(args.scale)))
        .transpose()?;
    info!(
        train = train.len(),
        test = test.as_ref().map_or(0, Dataset::len),
        features = train.feature_dim(),
        "datasets loaded"
    );

    let history = train_loop(&mut network, &mut train, test.as_ref(), &config)?;
    if let Some(last) = history.last() {
        info!(mean_cost = last.mean_cost, "training finished");
    }

    if let Some(test) = &test {
        let acc = accuracy(&network, test, config.batch_size)?;
        println!("Test accuracy: {:.2}%", acc * 100.0);
        show_predictions(&network, test, args.show)?;
    }

    Ok(())
}

fn show_predictions(network: &Network, test: &Dataset, count: usize) -> Result<()> {
    let width = square_side(test.feature_dim()).unwrap_or(test.feature_dim());
    for i in 0..count.min(test.len()) {
        let features = test.features(i);
        let output = network.evaluate(&Matrix::column(&features))?;
        let predicted = output.column_argmax()[0];
        println!("{}", render_ascii(&features, width));
        println!("label {}  predicted {}\n", test.label(i), predicted);
    }
    Ok(())
}
