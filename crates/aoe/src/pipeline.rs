//! The packaging pipeline: XML sources to XMB files to a BAR archive

use aoe_bar::{write::root_path, BarEntry, BarWriterOptions};
use aoe_xmb::Document;
use itertools::Itertools;
use miette::{miette, Context, IntoDiagnostic, Result};
use rayon::prelude::*;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, instrument};

use crate::collect::{collect_entries, collect_sources};

/// Extensions converted when none are given
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["blueprint", "physics", "tactics", "xml"];

/// Everything a packaging run needs
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Directory holding the XML sources
    pub source: PathBuf,

    /// Directory the XMB files are written to, and archived afterwards
    pub data: PathBuf,

    /// File name of the archive, created next to the data directory
    pub archive_name: String,

    /// Extensions of the source files to convert
    pub extensions: Vec<String>,
}

/// Outcome of a packaging run
#[derive(Debug)]
pub struct PackReport {
    /// Number of converted source files
    pub converted: usize,

    /// Path of the written archive
    pub archive: PathBuf,

    /// Entries of the written archive
    pub entries: Vec<BarEntry>,

    pub elapsed: Duration,
}

/// Archive file name for a suffix: `Data_<suffix>.bar`, or `Data.bar` without one
pub fn archive_name(suffix: &str) -> String {
    if suffix.is_empty() {
        "Data.bar".to_string()
    } else {
        format!("Data_{suffix}.bar")
    }
}

/// Path of the XMB file produced for `source`: the path below `target_root` with `.xmb` appended
pub fn xmb_path(source_root: &Path, source: &Path, target_root: &Path) -> Result<PathBuf> {
    let relative = source.strip_prefix(source_root).into_diagnostic()?;
    let mut target: OsString = target_root.join(relative).into_os_string();
    target.push(".xmb");
    Ok(PathBuf::from(target))
}

/// Convert one XML document into an XMB file, ALZ4 compressed unless `raw` is set.
///
/// Parent directories of `target` are created. A compressed file is removed again if writing it fails.
#[instrument(skip_all, fields(source = %source.display()))]
pub fn convert_document(source: &Path, target: &Path, raw: bool) -> Result<()> {
    let document = Document::from_path(source)?;
    let xmb = aoe_xmb::encode(&document)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .into_diagnostic()
            .context(format!("creating {}", parent.display()))?;
    }

    if raw {
        fs::write(target, &xmb)
            .into_diagnostic()
            .context(format!("writing {}", target.display()))?;
    } else {
        aoe_alz4::fs::write_file(target, &xmb).context(format!("writing {}", target.display()))?;
    }

    Ok(())
}

/// Archive every file below `data` into `archive`.
#[instrument(skip_all, fields(archive = %archive.display()))]
pub fn build_archive(data: &Path, archive: &Path) -> Result<Vec<BarEntry>> {
    let data = fs::canonicalize(data)
        .into_diagnostic()
        .context(format!("data directory {}", data.display()))?;
    let archive_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| miette!("{} is not a file name", archive.display()))?;

    let files = collect_entries(&data)?;
    let options = BarWriterOptions::builder()
        .archive_name(archive_name)
        .root_path(root_path(&data))
        .build();

    let entries = aoe_bar::create_archive(archive, options, files)?;
    Ok(entries)
}

/// Run the whole pipeline.
///
/// Every selected source is converted in parallel, then the data directory is archived. The first
/// failure stops the run.
pub fn pack(config: &PackConfig) -> Result<PackReport> {
    let begin = Instant::now();
    info!(
        "creating bar file based on [{}] with data source from [{}], extensions {}",
        config.data.display(),
        config.source.display(),
        config.extensions.iter().join(", ")
    );

    let sources = collect_sources(&config.source, &config.extensions)?;
    sources.par_iter().try_for_each(|source| {
        let target = xmb_path(&config.source, source, &config.data)?;
        info!(
            "collected {}",
            source
                .strip_prefix(&config.source)
                .unwrap_or(source.as_path())
                .display()
        );
        convert_document(source, &target, false)
    })?;

    fs::create_dir_all(&config.data)
        .into_diagnostic()
        .context(format!("creating {}", config.data.display()))?;
    let data = fs::canonicalize(&config.data).into_diagnostic()?;
    let archive = data
        .parent()
        .ok_or_else(|| miette!("{} has no parent directory", data.display()))?
        .join(&config.archive_name);

    let entries = build_archive(&data, &archive)?;

    Ok(PackReport {
        converted: sources.len(),
        archive,
        entries,
        elapsed: begin.elapsed(),
    })
}
