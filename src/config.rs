use {
    clap::ValueEnum,
    serde::Serialize,
    strum::Display,
};


/// The agent algorithms both implementations provide.
#[derive(ValueEnum, Display, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum Algo {
    Vpg,
    Trpo,
    Ppo,
    Ddpg,
    Td3,
    Sac,
}
impl Algo {
    /// The metric worth comparing for this algorithm. The off-policy
    /// algorithms (and trpo) log a deterministic test rollout, which is the
    /// fairer benchmark number.
    pub fn default_plot_value(&self) -> &'static str {
        match self {
            Algo::Vpg | Algo::Ppo => "AverageEpRet",
            _ => "AverageTestEpRet",
        }
    }
}

/// Which of the two interchangeable codebases performs the training.
#[derive(ValueEnum, Display, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum Implementation {
    Tom,
    Spinup,
}

#[derive(ValueEnum, Display, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum Activation {
    Tanh,
    Relu,
}

/// One fully-specified training run, minus the seed.
///
/// Replaces the loose option dictionary of older harnesses: every recognized
/// field is named here, with its default, and nothing else is accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    /// Hidden layer widths for the actor and critic MLPs.
    pub hidden_sizes: Vec<usize>,
    /// Gym environment id.
    pub env_name: String,
    /// Activation function between the hidden layers.
    pub activation: Activation,
    /// The agent algorithm to train with.
    pub algo: Algo,
    /// Number of epochs to train for.
    pub epochs: usize,
    /// Number of environment steps per epoch.
    pub steps_per_epoch: usize,
    /// CPUs handed to the trainer.
    pub num_cpu: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            hidden_sizes: vec![64, 64],
            env_name: "Swimmer-v2".into(),
            activation: Activation::Tanh,
            algo: Algo::Vpg,
            epochs: 50,
            steps_per_epoch: 4000,
            num_cpu: 1,
        }
    }
}

impl RunConfig {
    /// The naming-relevant fields that differ from their defaults, in fixed
    /// field order, as (alias, formatted value) pairs.
    ///
    /// The bookkeeping fields (epochs, steps_per_epoch, num_cpu) never show
    /// up here: they don't change what is being trained, so two runs that
    /// differ only in them share an experiment directory.
    pub fn overrides(&self) -> Vec<(&'static str, String)> {
        let defaults = Self::default();
        let mut fields = Vec::new();
        if self.hidden_sizes != defaults.hidden_sizes {
            fields.push(("hid", hidden_sizes_to_str(&self.hidden_sizes)));
        }
        if self.env_name != defaults.env_name {
            fields.push(("", self.env_name.to_lowercase()));
        }
        if self.activation != defaults.activation {
            fields.push(("", self.activation.to_string()));
        }
        if self.algo != defaults.algo {
            fields.push(("", self.algo.to_string()));
        }
        fields
    }
}

/// Format hidden sizes the way they appear in experiment names: `64-64`.
pub fn hidden_sizes_to_str(hidden_sizes: &[usize]) -> String {
    hidden_sizes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("-")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_overrides() {
        assert!(RunConfig::default().overrides().is_empty());
    }

    #[test]
    fn overrides_keep_field_order_and_aliases() {
        let config = RunConfig {
            hidden_sizes: vec![32],
            env_name: "HalfCheetah-v2".into(),
            algo: Algo::Ppo,
            ..Default::default()
        };
        assert_eq!(
            config.overrides(),
            vec![
                ("hid", "32".to_string()),
                ("", "halfcheetah-v2".to_string()),
                ("", "ppo".to_string()),
            ],
        );
    }

    #[test]
    fn bookkeeping_fields_never_appear() {
        let config = RunConfig {
            epochs: 250,
            steps_per_epoch: 1000,
            num_cpu: 4,
            ..Default::default()
        };
        assert!(config.overrides().is_empty());
    }

    #[test]
    fn activations_format_short() {
        assert_eq!(Activation::Relu.to_string(), "relu");
        assert_eq!(Activation::Tanh.to_string(), "tanh");
    }

    #[test]
    fn hidden_sizes_join_with_dashes() {
        assert_eq!(hidden_sizes_to_str(&[64, 64]), "64-64");
        assert_eq!(hidden_sizes_to_str(&[32]), "32");
    }

    #[test]
    fn plot_value_depends_on_algorithm() {
        assert_eq!(Algo::Vpg.default_plot_value(), "AverageEpRet");
        assert_eq!(Algo::Sac.default_plot_value(), "AverageTestEpRet");
    }
}
