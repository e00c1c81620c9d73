//! Two-pass dictionary builder.
//!
//! The grow pass inserts every record above the threshold and lets the
//! trie take whatever shape it needs. The optional backfill pass then
//! replays the whole source, thresholded records included, and keeps only
//! the words whose path already exists, so coverage improves without new
//! nodes or entries.

use tracing::{debug, info};

use crate::charset::Charset;
use crate::error::{Error, Result};
use crate::layout::{Layout, ADDRESS_MASK};
use crate::quantize::{Quantizer, Transform};
use crate::serialize::serialize;
use crate::source::{FrequencySource, Record};
use crate::trie::{InsertMode, Trie};

/// How strictly the backfill pass preserves the grow pass's output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackfillPolicy {
    /// No new entries or nodes. A pass-through entry may become terminal,
    /// which adds its frequency byte to one node record.
    #[default]
    Structure,
    /// Only re-weight words that are already terminal; every node record
    /// keeps its size and address.
    Bytes,
}

impl BackfillPolicy {
    fn insert_mode(self) -> InsertMode {
        match self {
            BackfillPolicy::Structure => InsertMode::Conserve,
            BackfillPolicy::Bytes => InsertMode::ConserveBytes,
        }
    }
}

/// Options for one build.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Records with a raw frequency at or below this are left out of the
    /// grow pass.
    pub threshold: u64,
    /// Run the backfill pass.
    pub backfill: bool,
    pub backfill_policy: BackfillPolicy,
    pub transform: Transform,
    /// Weight given to the most frequent word.
    pub scale: u8,
    /// Address of the root record.
    pub base_offset: u32,
    pub charset: Charset,
    /// Records between two progress reports.
    pub progress_interval: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            threshold: 0,
            backfill: true,
            backfill_policy: BackfillPolicy::Structure,
            transform: Transform::Identity,
            scale: u8::MAX,
            base_offset: 0,
            charset: Charset::Greek,
            progress_interval: 100_000,
        }
    }
}

impl BuildConfig {
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(Error::InvalidConfig("scale must be at least 1".into()));
        }
        if self.base_offset > ADDRESS_MASK {
            return Err(Error::InvalidConfig(format!(
                "base offset {:#x} exceeds the 22-bit address space",
                self.base_offset
            )));
        }
        Ok(())
    }
}

/// Which pass a report refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    Grow,
    Backfill,
}

impl std::fmt::Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pass::Grow => f.write_str("grow"),
            Pass::Backfill => f.write_str("backfill"),
        }
    }
}

/// Record counts for one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    pub processed: usize,
    /// Below the threshold (grow), or weight 0 or not insertable in place
    /// (backfill).
    pub skipped: usize,
    pub kept: usize,
}

/// Receives pass counters while a build runs.
pub trait Progress {
    /// Called every `progress_interval` records.
    fn report(&mut self, pass: Pass, stats: &PassStats);

    /// Called once when a pass has consumed its source.
    fn finish(&mut self, pass: Pass, stats: &PassStats) {
        self.report(pass, stats);
    }
}

/// Discards all reports.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _pass: Pass, _stats: &PassStats) {}
}

impl<F: FnMut(Pass, &PassStats)> Progress for F {
    fn report(&mut self, pass: Pass, stats: &PassStats) {
        self(pass, stats)
    }
}

/// A finished build.
#[derive(Debug)]
pub struct Compiled {
    pub bytes: Vec<u8>,
    pub trie: Trie,
    pub layout: Layout,
    pub grow: PassStats,
    pub backfill: Option<PassStats>,
}

/// Owns the trie for the duration of a build.
#[derive(Debug)]
pub struct Builder {
    config: BuildConfig,
    trie: Trie,
    quantizer: Quantizer,
}

impl Builder {
    pub fn new(config: BuildConfig) -> Result<Self> {
        config.validate()?;
        let quantizer = Quantizer::new(config.transform, config.scale)?;
        Ok(Self {
            config,
            trie: Trie::new(),
            quantizer,
        })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Runs both passes (as configured) and serializes the result.
    pub fn build<S>(mut self, source: &S, progress: &mut dyn Progress) -> Result<Compiled>
    where
        S: FrequencySource + ?Sized,
    {
        let grow = self.grow_pass(source, progress)?;
        let backfill = if self.config.backfill {
            Some(self.backfill_pass(source, progress)?)
        } else {
            None
        };
        let (bytes, layout) = self.compile()?;
        Ok(Compiled {
            bytes,
            trie: self.trie,
            layout,
            grow,
            backfill,
        })
    }

    /// Inserts every record above the threshold.
    pub fn grow_pass<S>(&mut self, source: &S, progress: &mut dyn Progress) -> Result<PassStats>
    where
        S: FrequencySource + ?Sized,
    {
        let threshold = self.config.threshold;
        self.run_pass(Pass::Grow, source, progress, |trie, record, weight| {
            if record.raw <= threshold {
                return false;
            }
            trie.insert(&record.word, weight, InsertMode::Grow)
        })
    }

    /// Inserts every record whose path already exists.
    ///
    /// Records that quantize to weight 0 are skipped, so every stored word
    /// carries a positive weight.
    pub fn backfill_pass<S>(&mut self, source: &S, progress: &mut dyn Progress) -> Result<PassStats>
    where
        S: FrequencySource + ?Sized,
    {
        let mode = self.config.backfill_policy.insert_mode();
        self.run_pass(Pass::Backfill, source, progress, |trie, record, weight| {
            weight > 0 && trie.insert(&record.word, weight, mode)
        })
    }

    fn run_pass<S, F>(
        &mut self,
        pass: Pass,
        source: &S,
        progress: &mut dyn Progress,
        mut insert: F,
    ) -> Result<PassStats>
    where
        S: FrequencySource + ?Sized,
        F: FnMut(&mut Trie, &Record, u8) -> bool,
    {
        debug!(%pass, "starting pass");
        self.quantizer.rewind();
        let interval = self.config.progress_interval.max(1);
        let mut stats = PassStats::default();

        for record in source.records()? {
            let record = record?;
            let weight = match record.weight {
                Some(weight) => weight,
                None => self.quantizer.quantize(record.line, record.raw)?,
            };
            if insert(&mut self.trie, &record, weight) {
                stats.kept += 1;
            } else {
                stats.skipped += 1;
            }
            stats.processed += 1;
            if stats.processed % interval == 0 {
                progress.report(pass, &stats);
            }
        }

        progress.finish(pass, &stats);
        info!(
            %pass,
            processed = stats.processed,
            skipped = stats.skipped,
            kept = stats.kept,
            "pass complete"
        );
        Ok(stats)
    }

    /// Lays out and serializes the current trie.
    pub fn compile(&self) -> Result<(Vec<u8>, Layout)> {
        let layout = Layout::compute(self.trie.root(), self.config.charset, self.config.base_offset)?;
        let bytes = serialize(self.trie.root(), &layout, self.config.charset)?;
        info!(
            nodes = layout.len(),
            bytes = bytes.len(),
            words = self.trie.len(),
            "serialized trie"
        );
        Ok((bytes, layout))
    }
}
