use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    // 40 fireflies, 5 dimensions, seed 0, 100 epochs
    let solution = firefly::solve(40, 5, 0, 100)?;
    for (idx, x) in solution.position.iter().enumerate() {
        println!("x{} = {x:.6}", idx + 1);
    }
    println!("z = {:.6}", solution.value);
    println!("error = {:.10}", solution.error);
    Ok(())
}
