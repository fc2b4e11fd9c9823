use herd_immunity::runner::run_with_args;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let summary = run_with_args()?;
    println!("The simulation has ended after {} turns.", summary.steps);
    Ok(())
}
