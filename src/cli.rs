use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use wordtrie::{BackfillPolicy, BuildConfig, Charset, SourceFormat, Transform};

#[derive(Parser)]
#[command(name = "wordtrie", about = "Compile word frequency lists into binary tries", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log pass statistics to stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a binary dictionary from a frequency list
    Build(BuildArgs),

    /// Print the C lookup tables of a charset
    Charmap {
        #[arg(long, value_enum, default_value_t = CharsetArg::Greek)]
        charset: CharsetArg,
    },
}

#[derive(Args)]
pub struct BuildArgs {
    /// Frequency list, sorted by descending frequency
    pub input: PathBuf,

    /// Destination of the binary dictionary
    pub output: PathBuf,

    /// Layout of the input lines
    #[arg(long, value_enum, default_value_t = FormatArg::Histogram)]
    pub format: FormatArg,

    /// Weight of every word when --format=words
    #[arg(long, default_value_t = 1)]
    pub default_weight: u8,

    /// Leave words at or below this raw frequency out of the grow pass
    #[arg(long, short = 't', default_value_t = 0)]
    pub threshold: u64,

    /// Skip the backfill pass
    #[arg(long)]
    pub no_backfill: bool,

    /// Only re-weight words already terminal during backfill, so no node
    /// record changes size
    #[arg(long)]
    pub strict_backfill: bool,

    /// Range compression applied before scaling raw frequencies
    #[arg(long, value_enum, default_value_t = TransformArg::Identity)]
    pub transform: TransformArg,

    /// Weight of the most frequent word
    #[arg(long, short = 'x', default_value_t = 255, value_parser = clap::value_parser!(u8).range(1..))]
    pub scale: u8,

    /// Address of the root node record
    #[arg(long, default_value_t = 0)]
    pub base_offset: u32,

    #[arg(long, value_enum, default_value_t = CharsetArg::Greek)]
    pub charset: CharsetArg,

    /// Records between progress log lines
    #[arg(long, default_value_t = 100_000)]
    pub progress_interval: usize,
}

impl BuildArgs {
    pub fn source_format(&self) -> SourceFormat {
        match self.format {
            FormatArg::Histogram => SourceFormat::Histogram,
            FormatArg::Weighted => SourceFormat::Weighted,
            FormatArg::Words => SourceFormat::WordList {
                weight: self.default_weight,
            },
        }
    }

    pub fn config(&self) -> BuildConfig {
        BuildConfig {
            threshold: self.threshold,
            backfill: !self.no_backfill,
            backfill_policy: if self.strict_backfill {
                BackfillPolicy::Bytes
            } else {
                BackfillPolicy::Structure
            },
            transform: self.transform.into(),
            scale: self.scale,
            base_offset: self.base_offset,
            charset: self.charset.into(),
            progress_interval: self.progress_interval,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// `word quantized raw`
    Histogram,
    /// `word weight`
    Weighted,
    /// `word`
    Words,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TransformArg {
    Identity,
    Log,
    Sqrt,
}

impl From<TransformArg> for Transform {
    fn from(arg: TransformArg) -> Self {
        match arg {
            TransformArg::Identity => Transform::Identity,
            TransformArg::Log => Transform::Log,
            TransformArg::Sqrt => Transform::Sqrt,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CharsetArg {
    /// ISO-8859-1
    Latin1,
    /// ISO-8859-7
    Greek,
}

impl From<CharsetArg> for Charset {
    fn from(arg: CharsetArg) -> Self {
        match arg {
            CharsetArg::Latin1 => Charset::Latin1,
            CharsetArg::Greek => Charset::Greek,
        }
    }
}
