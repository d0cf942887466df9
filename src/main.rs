use {
    anyhow::Result,
    clap::Parser,
    deeprl::{
        cli::{
            Args,
            Command,
        },
        config::Implementation,
        engine::{
            maybe_run,
            ProcessTrainer,
        },
        error::HarnessError,
        logdir::DataDir,
        logging::setup_logging,
        plotting,
    },
    std::path::Path,
    tracing::warn,
};


fn main() {
    let args = Args::parse();
    if let Err(err) = try_main(args) {
        eprintln!("Error: {err:#}");
        let code = err
            .downcast_ref::<HarnessError>()
            .map(HarnessError::exit_code)
            .unwrap_or(2);
        std::process::exit(code);
    }
}

fn try_main(args: Args) -> Result<()> {
    if let Some(level) = args.log.level() {
        setup_logging(Some(Path::new("harness.log")), Some(level), Some(level))?;
    }
    warn!("exp name: {:?}", args.exp_name);
    warn!("num runs: {}", args.num_runs);

    let data = DataDir::default();
    let sweep = args.sweep()?;

    match args.command.clone() {
        Command::Run {
            implementation,
            trainer,
        } => {
            let trainer = ProcessTrainer::new(trainer);
            for config in sweep.configurations() {
                warn!("configuration: {config:?}");
                maybe_run(
                    &data,
                    &trainer,
                    &args.exp_name,
                    args.num_runs,
                    &[implementation],
                    &config,
                )?;
                plotting::aggregate(
                    &data,
                    &args.exp_name,
                    &[implementation],
                    args.num_runs,
                    &config,
                    "AverageEpRet",
                )?;
            }
        }

        Command::Benchmark { trainer } => {
            let implementations = [Implementation::Tom, Implementation::Spinup];
            let trainer = ProcessTrainer::new(trainer);
            for config in sweep.configurations() {
                warn!("configuration: {config:?}");
                maybe_run(
                    &data,
                    &trainer,
                    &args.exp_name,
                    args.num_runs,
                    &implementations,
                    &config,
                )?;
                plotting::aggregate(
                    &data,
                    &args.exp_name,
                    &implementations,
                    args.num_runs,
                    &config,
                    config.algo.default_plot_value(),
                )?;
            }
        }

        Command::Plot {
            implementation,
            value,
        } => {
            for config in sweep.configurations() {
                warn!("configuration: {config:?}");
                plotting::aggregate(
                    &data,
                    &args.exp_name,
                    &implementation,
                    args.num_runs,
                    &config,
                    &value,
                )?;
            }
        }
    }
    Ok(())
}
