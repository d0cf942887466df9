use {
    crate::{
        config::{
            hidden_sizes_to_str,
            Implementation,
            RunConfig,
        },
        error::HarnessError,
        logdir::{
            seeds,
            DataDir,
        },
    },
    serde::Serialize,
    std::{
        fs::{
            create_dir_all,
            File,
        },
        io::Write,
        path::Path,
        process::Command,
    },
    tracing::{
        info,
        warn,
    },
};


/// Seam to the external training process. The harness never trains anything
/// itself; it decides what still needs running and hands it over.
pub trait Trainer {
    fn train(
        &self,
        implementation: Implementation,
        seed: u64,
        config: &RunConfig,
        output_dir: &Path,
    ) -> Result<(), HarnessError>;
}

/// Runs the configured trainer executable, one blocking subprocess per run.
#[derive(Debug, Clone)]
pub struct ProcessTrainer {
    program: String,
}

impl ProcessTrainer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(
        &self,
        implementation: Implementation,
        seed: u64,
        config: &RunConfig,
        output_dir: &Path,
    ) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--implementation")
            .arg(implementation.to_string())
            .arg("--algo")
            .arg(config.algo.to_string())
            .arg("--env")
            .arg(&config.env_name)
            .arg("--hid")
            .arg(hidden_sizes_to_str(&config.hidden_sizes))
            .arg("--activation")
            .arg(config.activation.to_string())
            .arg("--epochs")
            .arg(config.epochs.to_string())
            .arg("--steps-per-epoch")
            .arg(config.steps_per_epoch.to_string())
            .arg("--num-cpu")
            .arg(config.num_cpu.to_string())
            .arg("--seed")
            .arg(seed.to_string())
            .arg("--output-dir")
            .arg(output_dir);
        cmd
    }
}

impl Trainer for ProcessTrainer {
    fn train(
        &self,
        implementation: Implementation,
        seed: u64,
        config: &RunConfig,
        output_dir: &Path,
    ) -> Result<(), HarnessError> {
        let trainer_err = |reason: String| HarnessError::Trainer {
            program: self.program.clone(),
            reason,
        };

        let status = self
            .command(implementation, seed, config, output_dir)
            .status()
            .map_err(|err| trainer_err(err.to_string()))?;
        if !status.success() {
            return Err(trainer_err(format!(
                "exited with {status} for seed {seed} of {config:?}"
            )));
        }
        Ok(())
    }
}

/// Run every seed of this configuration that isn't already on disk.
///
/// A seed directory that exists with at least `epochs` logged epochs is
/// skipped; one that exists but fell short is handed back to the trainer
/// (resume semantics are the trainer's business). The check is advisory: a
/// trainer writing concurrently merely skews the epoch estimate.
pub fn maybe_run(
    data: &DataDir,
    trainer: &dyn Trainer,
    prefix: &str,
    num_runs: usize,
    implementations: &[Implementation],
    config: &RunConfig,
) -> Result<(), HarnessError> {
    for &implementation in implementations {
        let on_disk = data.already_run_seeds(prefix, implementation, config)?;
        let mut dispatched = false;

        for seed in seeds(num_runs) {
            if on_disk.contains(&seed) {
                let done = data.completed_epochs(prefix, implementation, seed, config)?;
                if done >= config.epochs {
                    info!("seed {seed} already ran {done} epochs on {implementation}, skipping");
                    continue;
                }
                warn!(
                    "seed {seed} only ran {done}/{} epochs on {implementation}, re-running",
                    config.epochs,
                );
            }

            let output_dir = data.output_dir(prefix, implementation, config, Some(seed));
            if !dispatched {
                write_provenance(data, prefix, implementation, config)?;
                dispatched = true;
            }
            warn!("training seed {seed} of {config:?} on {implementation}");
            trainer.train(implementation, seed, config, &output_dir)?;
        }
    }
    Ok(())
}

/// Drop the run configuration next to the seed directories, so a directory
/// full of progress files stays interpretable later.
fn write_provenance(
    data: &DataDir,
    prefix: &str,
    implementation: Implementation,
    config: &RunConfig,
) -> Result<(), HarnessError> {
    let exp_dir = data
        .output_dir(prefix, implementation, config, None)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    create_dir_all(&exp_dir)?;
    write_config(config, exp_dir.join("config.ron"))
}

fn write_config<C: Serialize>(
    config: &C,
    path: impl AsRef<Path>,
) -> Result<(), HarnessError> {
    let pretty = ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::default())
        .map_err(|err| HarnessError::Config(err.to_string()))?;
    File::create(path.as_ref())?.write_all(pretty.as_bytes())?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::config::Algo,
        std::{
            fs::create_dir_all,
            io::Write as _,
            sync::Mutex,
        },
        tempfile::tempdir,
    };

    /// Records what it is asked to train instead of training it.
    struct RecordingTrainer {
        calls: Mutex<Vec<(Implementation, u64)>>,
    }
    impl RecordingTrainer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
        fn calls(&self) -> Vec<(Implementation, u64)> {
            self.calls.lock().unwrap().clone()
        }
    }
    impl Trainer for RecordingTrainer {
        fn train(
            &self,
            implementation: Implementation,
            seed: u64,
            _config: &RunConfig,
            _output_dir: &Path,
        ) -> Result<(), HarnessError> {
            self.calls.lock().unwrap().push((implementation, seed));
            Ok(())
        }
    }

    fn ppo_config() -> RunConfig {
        RunConfig {
            algo: Algo::Ppo,
            epochs: 5,
            ..Default::default()
        }
    }

    fn fake_completed_run(data: &DataDir, config: &RunConfig, seed: u64, epochs: usize) {
        let dir = data.output_dir("exp", Implementation::Tom, config, Some(seed));
        create_dir_all(&dir).unwrap();
        let mut file = File::create(dir.join(crate::logdir::PROGRESS_FILE)).unwrap();
        writeln!(file, "Epoch\tAverageEpRet").unwrap();
        for epoch in 0..epochs {
            writeln!(file, "{epoch}\t0.0").unwrap();
        }
    }

    #[test]
    fn fresh_experiment_runs_every_seed() {
        let tmp = tempdir().unwrap();
        let data = DataDir::at(tmp.path());
        let trainer = RecordingTrainer::new();

        maybe_run(&data, &trainer, "exp", 3, &[Implementation::Tom], &ppo_config()).unwrap();

        assert_eq!(
            trainer.calls(),
            vec![
                (Implementation::Tom, 0),
                (Implementation::Tom, 10),
                (Implementation::Tom, 20),
            ],
        );
    }

    #[test]
    fn completed_seeds_are_skipped() {
        let tmp = tempdir().unwrap();
        let data = DataDir::at(tmp.path());
        let config = ppo_config();
        let trainer = RecordingTrainer::new();

        fake_completed_run(&data, &config, 0, config.epochs);

        maybe_run(&data, &trainer, "exp", 2, &[Implementation::Tom], &config).unwrap();
        assert_eq!(trainer.calls(), vec![(Implementation::Tom, 10)]);
    }

    #[test]
    fn short_seeds_are_rerun() {
        let tmp = tempdir().unwrap();
        let data = DataDir::at(tmp.path());
        let config = ppo_config();
        let trainer = RecordingTrainer::new();

        fake_completed_run(&data, &config, 0, 2); // 2 of 5 epochs

        maybe_run(&data, &trainer, "exp", 1, &[Implementation::Tom], &config).unwrap();
        assert_eq!(trainer.calls(), vec![(Implementation::Tom, 0)]);
    }

    #[test]
    fn dispatch_writes_provenance() {
        let tmp = tempdir().unwrap();
        let data = DataDir::at(tmp.path());
        let config = ppo_config();

        maybe_run(
            &data,
            &RecordingTrainer::new(),
            "exp",
            1,
            &[Implementation::Tom],
            &config,
        )
        .unwrap();

        let exp_dir = data
            .output_dir("exp", Implementation::Tom, &config, None)
            .parent()
            .unwrap()
            .to_path_buf();
        assert!(exp_dir.join("config.ron").exists());
    }

    #[test]
    fn nothing_to_do_writes_nothing() {
        let tmp = tempdir().unwrap();
        let data = DataDir::at(tmp.path());
        let config = ppo_config();
        let trainer = RecordingTrainer::new();

        fake_completed_run(&data, &config, 0, config.epochs);

        maybe_run(&data, &trainer, "exp", 1, &[Implementation::Tom], &config).unwrap();
        assert!(trainer.calls().is_empty());
        let exp_dir = data
            .output_dir("exp", Implementation::Tom, &config, None)
            .parent()
            .unwrap()
            .to_path_buf();
        assert!(!exp_dir.join("config.ron").exists());
    }

    #[test]
    fn benchmark_covers_both_implementations() {
        let tmp = tempdir().unwrap();
        let data = DataDir::at(tmp.path());
        let trainer = RecordingTrainer::new();

        maybe_run(
            &data,
            &trainer,
            "exp",
            1,
            &[Implementation::Tom, Implementation::Spinup],
            &ppo_config(),
        )
        .unwrap();

        assert_eq!(
            trainer.calls(),
            vec![(Implementation::Tom, 0), (Implementation::Spinup, 0)],
        );
    }
}
