use backprop_nn::data::builtin;
use backprop_nn::{train_step, Matrix, Network};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> backprop_nn::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut network = Network::new(&[2, 3, 1], &["sigmoid", "sigmoid"], &mut rng)?;

    let (inputs, expected) = builtin::xor();

    let learning_rate = 0.5;
    let steps = 20_000;

    for step in 0..steps {
        let cost = train_step(&mut network, &inputs, &expected, learning_rate)?;
        if step % 2000 == 0 {
            println!("Step {step}: cost = {cost:.6}");
        }
    }

    let output = network.evaluate(&inputs)?;
    for c in 0..inputs.cols() {
        let sample = Matrix::column(&[inputs.get(0, c), inputs.get(1, c)]);
        println!("Input: {:?} -> Output: {:.4}", sample.as_slice(), output.get(0, c));
    }

    println!();
    println!("{}", network.describe());
    Ok(())
}
