use {
    crate::{
        config::{
            Implementation,
            RunConfig,
        },
        error::HarnessError,
    },
    std::{
        collections::BTreeSet,
        fs,
        path::{
            Path,
            PathBuf,
        },
    },
};


/// Where the trainers drop their logs, relative to an output directory.
pub const PROGRESS_FILE: &str = "progress.txt";

/// Produce the experiment name from a prefix and a run configuration.
///
/// Concatenates `alias + value` for every non-default naming field with
/// underscores; the prefix (plus its own underscore) only appears when both
/// it and the field string are non-empty. Same inputs, same string, always.
pub fn exp_name(prefix: &str, config: &RunConfig) -> String {
    let fields = config
        .overrides()
        .iter()
        .map(|(alias, value)| format!("{alias}{value}"))
        .collect::<Vec<_>>()
        .join("_");
    let after_prefix = if !fields.is_empty() && !prefix.is_empty() {
        "_"
    } else {
        ""
    };
    format!("{prefix}{after_prefix}{fields}")
}

/// Enumerate seeds for `num_runs` runs: 0, 10, 20, ...
///
/// Spinup steps its seeds by tens, and existing logged data follows that
/// convention, so we keep it.
pub fn seeds(num_runs: usize) -> impl Iterator<Item = u64> {
    (0..num_runs as u64).map(|run_no| 10 * run_no)
}

/// Handle on the on-disk experiment data root.
///
/// Everything under it follows the layout
/// `<root>/<implementation>/<exp_name>/<exp_name>_s<seed>/progress.txt`,
/// which must match existing logged data exactly. All methods are read-only;
/// the directories themselves are created and filled by the trainer.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl Default for DataDir {
    fn default() -> Self {
        Self::at("./data")
    }
}

impl DataDir {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the output directory for a configuration, a pure function of
    /// its arguments. The experiment name doubles as the innermost directory
    /// and the filename stem; a concrete run instance appends `_s<seed>`.
    pub fn output_dir(
        &self,
        prefix: &str,
        implementation: Implementation,
        config: &RunConfig,
        seed: Option<u64>,
    ) -> PathBuf {
        let exp_name = exp_name(prefix, config);
        let dir = self
            .root
            .join(implementation.to_string())
            .join(&exp_name)
            .join(&exp_name);
        match seed {
            Some(seed) => append_to_file_name(dir, &format!("_s{seed}")),
            None => dir,
        }
    }

    /// How many epochs this exact run has already logged.
    ///
    /// A missing progress file is the fresh-run baseline, not an error. A
    /// present file must start with the header line, so the count is the
    /// line count minus one; a file with no lines at all has no header and
    /// is treated as corrupt rather than guessed at.
    pub fn completed_epochs(
        &self,
        prefix: &str,
        implementation: Implementation,
        seed: u64,
        config: &RunConfig,
    ) -> Result<usize, HarnessError> {
        let path = self
            .output_dir(prefix, implementation, config, Some(seed))
            .join(PROGRESS_FILE);
        if !path.exists() {
            return Ok(0);
        }
        let contents = fs::read_to_string(&path)
            .map_err(|err| HarnessError::read(&path, err.to_string()))?;
        match contents.lines().count() {
            0 => Err(HarnessError::read(&path, "missing header line")),
            lines => Ok(lines - 1),
        }
    }

    /// The seeds that already have an output directory for this
    /// configuration: every `<exp_name>_s<seed>` sibling of the seedless
    /// output directory. Directory listing order is irrelevant; the set is
    /// what matters.
    pub fn already_run_seeds(
        &self,
        prefix: &str,
        implementation: Implementation,
        config: &RunConfig,
    ) -> Result<BTreeSet<u64>, HarnessError> {
        let base = self.output_dir(prefix, implementation, config, None);
        let Some(parent) = base.parent() else {
            return Ok(BTreeSet::new());
        };
        if !parent.exists() {
            return Ok(BTreeSet::new());
        }

        let stem = format!("{}_s", file_name_str(&base));
        let mut found = BTreeSet::new();
        for entry in fs::read_dir(parent)? {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            // anything with a non-integer suffix is not a seed directory
            if let Some(Ok(seed)) = name.strip_prefix(&stem).map(str::parse::<u64>) {
                found.insert(seed);
            }
        }
        Ok(found)
    }
}

fn append_to_file_name(path: PathBuf, suffix: &str) -> PathBuf {
    let name = format!("{}{suffix}", file_name_str(&path));
    path.with_file_name(name)
}

fn file_name_str(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
