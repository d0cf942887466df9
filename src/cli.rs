use {
    crate::{
        config::{
            Activation,
            Algo,
            Implementation,
            RunConfig,
        },
        error::HarnessError,
        sweep::Sweep,
    },
    clap::{
        Parser,
        Subcommand,
        ValueEnum,
    },
    tracing::Level,
};


#[derive(ValueEnum, Debug, Clone)]
pub enum Loglevel {
    Error, // put these only during active debugging and then downgrade later
    Warn,  // main events in the program
    Info,  // all the little details
    None,  // don't log anything
}
impl Loglevel {
    pub fn level(&self) -> Option<Level> {
        match self {
            Loglevel::Error => Some(Level::ERROR),
            Loglevel::Warn => Some(Level::WARN),
            Loglevel::Info => Some(Level::INFO),
            Loglevel::None => None,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Prefix added to the experiment name.
    #[arg(long, short = 'x', default_value = "")]
    pub exp_name: String,

    /// Number of different random seeds to run.
    #[arg(long, short = 'n', default_value_t = 3)]
    pub num_runs: usize,

    /// Number of epochs.
    #[arg(long, default_value_t = 50)]
    pub epochs: usize,

    /// Number of steps per epoch.
    #[arg(long, default_value_t = 4000)]
    pub steps_per_epoch: usize,

    /// Environment name; repeat the flag to sweep over several.
    #[arg(long = "env", short = 'e', default_value = "Swimmer-v2")]
    pub env_name: Vec<String>,

    /// Hidden sizes for the actor and critic MLPs, as a tuple literal like
    /// "(64,64)"; repeat the flag to sweep over several.
    #[arg(long = "hid", default_value = "(64,64)")]
    pub hidden_sizes: Vec<String>,

    /// Algorithm (ie agent) to use.
    #[arg(long, short = 'a', value_enum, default_value_t = Algo::Vpg)]
    pub algo: Algo,

    /// Activation function between hidden layers.
    #[arg(long, value_enum, default_value_t = Activation::Tanh)]
    pub activation: Activation,

    /// CPUs handed to the trainer.
    #[arg(long, default_value_t = 1)]
    pub num_cpu: usize,

    /// Setup logging
    #[arg(long, value_enum, default_value_t = Loglevel::Warn)]
    pub log: Loglevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run any missing seeds with one implementation, then aggregate the
    /// episode return for plotting.
    Run {
        /// Which implementation to run, spinup's or tom's.
        #[arg(long, short = 'i', value_enum, default_value_t = Implementation::Tom)]
        implementation: Implementation,

        /// Trainer executable that runs get dispatched to.
        #[arg(long, default_value = "deeprl-train")]
        trainer: String,
    },

    /// Run both implementations on the identical sweep and aggregate the
    /// comparison metric across both.
    Benchmark {
        /// Trainer executable that runs get dispatched to.
        #[arg(long, default_value = "deeprl-train")]
        trainer: String,
    },

    /// Aggregate already-logged results; runs nothing.
    Plot {
        /// Which implementation(s) to include.
        #[arg(long, short = 'i', value_enum, default_values_t = [Implementation::Tom])]
        implementation: Vec<Implementation>,

        /// Value to plot.
        #[arg(long, short = 'v', default_value = "AverageEpRet")]
        value: String,
    },
}

impl Args {
    /// The scalar fields shared by every configuration in the sweep. The
    /// multi-valued fields keep their defaults here and get overwritten per
    /// sweep element.
    pub fn base_config(&self) -> RunConfig {
        RunConfig {
            activation: self.activation,
            algo: self.algo,
            epochs: self.epochs,
            steps_per_epoch: self.steps_per_epoch,
            num_cpu: self.num_cpu,
            ..Default::default()
        }
    }

    pub fn sweep(&self) -> Result<Sweep, HarnessError> {
        Sweep::new(&self.hidden_sizes, &self.env_name, self.base_config())
    }
}
