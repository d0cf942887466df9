use {
    crate::{
        config::{
            Implementation,
            RunConfig,
        },
        error::HarnessError,
        logdir::{
            exp_name,
            seeds,
            DataDir,
            PROGRESS_FILE,
        },
    },
    polars::prelude::{
        DataFrame,
        NamedFrom,
        ParquetWriter,
        Series,
    },
    std::{
        fs::{
            create_dir_all,
            File,
        },
        path::{
            Path,
            PathBuf,
        },
    },
    tracing::{
        info,
        warn,
    },
};


/// One parsed progress file: the header's column names and the numeric rows
/// below it, one row per completed epoch.
#[derive(Debug, Clone)]
pub struct ProgressTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl ProgressTable {
    /// The values of one metric across epochs.
    pub fn column(&self, name: &str) -> Result<Vec<f64>, HarnessError> {
        let index = self
            .columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| {
                HarnessError::Config(format!(
                    "no value {name:?} in progress data, have: {}",
                    self.columns.join(", "),
                ))
            })?;
        Ok(self.rows.iter().map(|row| row[index]).collect())
    }

    pub fn epochs(&self) -> usize {
        self.rows.len()
    }
}

/// Parse a trainer progress file: a delimited header line, then one numeric
/// row per epoch. The trainer owns the schema; we only insist that every row
/// is as wide as the header and holds numbers.
pub fn read_progress(path: &Path) -> Result<ProgressTable, HarnessError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|err| HarnessError::read(path, err.to_string()))?;
    let mut lines = contents.lines();

    let header = lines
        .next()
        .ok_or_else(|| HarnessError::read(path, "missing header line"))?;
    let columns: Vec<String> = split_row(header).map(String::from).collect();

    let mut rows = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let row = split_row(line)
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| {
                    HarnessError::read(
                        path,
                        format!("non-numeric cell {cell:?} on line {}", line_no + 2),
                    )
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        if row.len() != columns.len() {
            return Err(HarnessError::read(
                path,
                format!(
                    "line {} has {} cells, header has {}",
                    line_no + 2,
                    row.len(),
                    columns.len(),
                ),
            ));
        }
        rows.push(row);
    }
    Ok(ProgressTable { columns, rows })
}

// spinup writes tabs; tolerate plain whitespace columns too
fn split_row(line: &str) -> impl Iterator<Item = &str> {
    line.split(['\t', ' ']).filter(|cell| !cell.is_empty())
}

/// Collect one metric across implementations and seeds into a long-format
/// parquet file under `<root>/plots/`, ready for an external plotting tool.
///
/// Seeds without a progress file are skipped with a log line; an experiment
/// with no data at all is an error, since there would be nothing to plot.
pub fn aggregate(
    data: &DataDir,
    prefix: &str,
    implementations: &[Implementation],
    num_runs: usize,
    config: &RunConfig,
    value: &str,
) -> Result<PathBuf, HarnessError> {
    if implementations.is_empty() {
        return Err(HarnessError::Config("no implementation selected".into()));
    }

    let mut imp_column = Vec::new();
    let mut seed_column = Vec::new();
    let mut epoch_column = Vec::new();
    let mut value_column = Vec::new();

    for &implementation in implementations {
        for seed in seeds(num_runs) {
            let path = data
                .output_dir(prefix, implementation, config, Some(seed))
                .join(PROGRESS_FILE);
            if !path.exists() {
                info!("no progress for seed {seed} on {implementation}, skipping");
                continue;
            }

            let table = read_progress(&path)?;
            for (epoch, val) in table.column(value)?.into_iter().enumerate() {
                imp_column.push(implementation.to_string());
                seed_column.push(seed);
                epoch_column.push(epoch as u32);
                value_column.push(val);
            }
        }
    }

    if value_column.is_empty() {
        return Err(HarnessError::read(
            data.output_dir(prefix, implementations[0], config, None),
            "no logged runs to aggregate",
        ));
    }

    let name = match exp_name(prefix, config) {
        name if name.is_empty() => "default".to_string(),
        name => name,
    };
    let plots_dir = data.root().join("plots");
    create_dir_all(&plots_dir)?;
    let out_path = plots_dir.join(format!("{name}__{value}.parquet"));

    let mut df = DataFrame::new(vec![
        Series::new("implementation", imp_column),
        Series::new("seed", seed_column),
        Series::new("epoch", epoch_column),
        Series::new(value, value_column),
    ])
    .map_err(|err| HarnessError::read(&out_path, err.to_string()))?;

    ParquetWriter::new(File::create(&out_path)?)
        .finish(&mut df)
        .map_err(|err| HarnessError::read(&out_path, err.to_string()))?;

    warn!("wrote {} rows to {}", df.height(), out_path.display());
    Ok(out_path)
}
