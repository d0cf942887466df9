use {
    crate::{
        config::RunConfig,
        error::HarnessError,
    },
    itertools::iproduct,
};


/// Parse a hidden-sizes tuple literal like `(64,64)` or `(32,)`.
///
/// The grammar is deliberately tiny: parentheses around one or more
/// comma-separated non-negative integers, with an optional trailing comma.
/// Anything else is a [`HarnessError::Parse`]. Older harnesses evaluated
/// these literals as source text, which accepted arbitrary expressions.
pub fn parse_hidden_sizes(literal: &str) -> Result<Vec<usize>, HarnessError> {
    let parse_err = |reason: &str| HarnessError::Parse {
        literal: literal.to_string(),
        reason: reason.to_string(),
    };

    let inner = literal
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| parse_err("expected surrounding parentheses"))?;

    // a trailing comma is how python spells a 1-tuple, so allow one
    let inner = inner.trim();
    let inner = inner.strip_suffix(',').unwrap_or(inner);
    if inner.trim().is_empty() {
        return Err(parse_err("tuple must hold at least one layer size"));
    }

    inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|err| parse_err(&format!("{:?}: {err}", part.trim())))
        })
        .collect()
}

/// The cartesian product of the multi-valued CLI options, merged with the
/// scalar base configuration.
///
/// Construction parses every hidden-sizes literal up front so that a typo
/// aborts before any run is dispatched. The expansion itself stays lazy and
/// can be re-iterated at will.
#[derive(Debug, Clone)]
pub struct Sweep {
    hidden_sizes: Vec<Vec<usize>>,
    env_names: Vec<String>,
    base: RunConfig,
}

impl Sweep {
    pub fn new(
        hidden_size_literals: &[String],
        env_names: &[String],
        base: RunConfig,
    ) -> Result<Self, HarnessError> {
        Ok(Self {
            hidden_sizes: hidden_size_literals
                .iter()
                .map(|literal| parse_hidden_sizes(literal))
                .collect::<Result<_, _>>()?,
            env_names: env_names.to_vec(),
            base,
        })
    }

    /// One [`RunConfig`] per (hidden_sizes, env_name) pair.
    pub fn configurations(&self) -> impl Iterator<Item = RunConfig> + '_ {
        iproduct!(&self.hidden_sizes, &self.env_names).map(|(hidden, env)| RunConfig {
            hidden_sizes: hidden.clone(),
            env_name: env.clone(),
            ..self.base.clone()
        })
    }

    pub fn len(&self) -> usize {
        self.hidden_sizes.len() * self.env_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}


#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::config::Algo,
    };

    #[test]
    fn parses_pairs_and_singletons() {
        assert_eq!(parse_hidden_sizes("(64,64)").unwrap(), vec![64, 64]);
        assert_eq!(parse_hidden_sizes("(32,)").unwrap(), vec![32]);
        assert_eq!(parse_hidden_sizes(" ( 8 , 16 , 32 ) ").unwrap(), vec![8, 16, 32]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hidden_sizes("64,64").is_err());
        assert!(parse_hidden_sizes("()").is_err());
        assert!(parse_hidden_sizes("(64, -3)").is_err());
        assert!(parse_hidden_sizes("(64, sixty-four)").is_err());
        assert!(parse_hidden_sizes("(32,,)").is_err());
        assert!(parse_hidden_sizes("__import__('os')").is_err());
    }

    #[test]
    fn parse_error_names_the_literal() {
        let err = parse_hidden_sizes("(a,b)").unwrap_err();
        assert!(err.to_string().contains("(a,b)"));
    }

    #[test]
    fn expands_the_full_product() {
        let sweep = Sweep::new(
            &["(32,)".into(), "(64,64)".into()],
            &["EnvA".into(), "EnvB".into()],
            RunConfig {
                algo: Algo::Ppo,
                ..Default::default()
            },
        )
        .unwrap();

        let configs: Vec<RunConfig> = sweep.configurations().collect();
        assert_eq!(configs.len(), 4);
        assert_eq!(sweep.len(), 4);

        // hidden sizes are parsed integers, scalars are merged in
        assert_eq!(configs[0].hidden_sizes, vec![32]);
        assert_eq!(configs[0].env_name, "EnvA");
        assert_eq!(configs[1].env_name, "EnvB");
        assert_eq!(configs[3].hidden_sizes, vec![64, 64]);
        assert!(configs.iter().all(|c| c.algo == Algo::Ppo));
    }

    #[test]
    fn expansion_is_restartable() {
        let sweep = Sweep::new(
            &["(64,64)".into()],
            &["EnvA".into(), "EnvB".into()],
            RunConfig::default(),
        )
        .unwrap();
        let first: Vec<_> = sweep.configurations().collect();
        let second: Vec<_> = sweep.configurations().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn bad_literal_fails_construction() {
        let result = Sweep::new(
            &["(64,64)".into(), "oops".into()],
            &["EnvA".into()],
            RunConfig::default(),
        );
        assert!(matches!(result, Err(HarnessError::Parse { .. })));
    }
}
