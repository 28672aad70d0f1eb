use firefly::functions::Michalewicz;
use firefly::{BoundaryRepair, FireflyOptimizer, FireflyParams, StopCondition};
use rand::SeedableRng;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let params = FireflyParams {
        boundary_repair: BoundaryRepair::Exclusive,
        ..FireflyParams::default()
    };
    let engine = FireflyOptimizer::builder(Michalewicz::try_new(10)?)
        .population_size(40)
        .max_epochs(500)
        .params(params)
        .stop_condition(StopCondition::target_error_below(1e-4))
        .build()?;

    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let report = engine.run(&mut rng)?;
    for (epoch, (best, mean)) in report
        .stats
        .best_error
        .iter()
        .zip(&report.stats.mean_error)
        .enumerate()
        .step_by(25)
    {
        println!("{epoch:>4}  best {best:.8}  mean {mean:.8}");
    }
    println!(
        "best candidate after {} epochs: {:?} => {:.8}",
        report.epochs, report.best_position, report.best_error
    );
    Ok(())
}
