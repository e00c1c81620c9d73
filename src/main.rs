mod cli;

use std::process;

use clap::Parser;
use cli::{BuildArgs, Cli, Commands};
use tracing::info;
use wordtrie::{write_atomic, Builder, Charset, FileSource, Pass, PassStats, Progress};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}: {source}", .path.display())]
    Build {
        path: std::path::PathBuf,
        #[source]
        source: wordtrie::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Output {
        path: std::path::PathBuf,
        #[source]
        source: wordtrie::Error,
    },
}

/// Logs periodic pass counters.
struct LogProgress;

impl Progress for LogProgress {
    fn report(&mut self, pass: Pass, stats: &PassStats) {
        info!(%pass, processed = stats.processed, kept = stats.kept, "progress");
    }

    // The builder logs the final counts of every pass itself.
    fn finish(&mut self, _pass: Pass, _stats: &PassStats) {}
}

fn init_tracing(cli: &Cli) {
    let default = if cli.verbose { "info" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let result = match cli.command {
        Commands::Build(args) => build(&args),
        Commands::Charmap { charset } => {
            print!("{}", Charset::from(charset).c_tables());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn build(args: &BuildArgs) -> Result<(), CliError> {
    let source = FileSource::new(&args.input, args.source_format());
    let compiled = Builder::new(args.config())
        .and_then(|builder| builder.build(&source, &mut LogProgress))
        .map_err(|source| CliError::Build {
            path: args.input.clone(),
            source,
        })?;

    write_atomic(&args.output, &compiled.bytes).map_err(|source| CliError::Output {
        path: args.output.clone(),
        source,
    })?;

    info!(
        output = %args.output.display(),
        bytes = compiled.bytes.len(),
        nodes = compiled.layout.len(),
        words = compiled.trie.len(),
        "dictionary written"
    );
    Ok(())
}
