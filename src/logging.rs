use {
    anyhow::Result,
    std::{
        fs::File,
        path::Path,
        sync::Arc,
    },
    tracing::Level,
    tracing_subscriber::{
        fmt::{
            layer,
            writer::MakeWriterExt,
        },
        layer::SubscriberExt,
        util::SubscriberInitExt,
    },
};

/// Install the global subscriber. Called exactly once, from the entry point,
/// never as a side effect of loading a module.
pub fn setup_logging(
    file: Option<&Path>,
    min_level_file: Option<Level>,
    min_level_stdout: Option<Level>,
) -> Result<()> {
    let file_layer = match file {
        Some(path) => {
            let log_file = Arc::new(File::create(path)?);
            Some(
                layer()
                    .with_writer(log_file.with_max_level(match min_level_file {
                        Some(level) => level,
                        None => Level::INFO,
                    }))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        // File writer
        .with(file_layer)
        // Stdout writer
        .with(
            layer()
                .with_writer(std::io::stdout.with_max_level(match min_level_stdout {
                    Some(level) => level,
                    None => Level::WARN,
                }))
                .compact()
                .with_line_number(false)
                .with_thread_ids(false)
                .with_target(false),
        )
        // Create and set Subscriber
        .init();

    Ok(())
}
