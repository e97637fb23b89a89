//! Types for writing BAR archives
//!

use binrw::BinWrite;
use bon::Builder;
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path};
use tracing::{debug, info, instrument, warn};
use widestring::U16String;

use crate::error::{Error, Result};
use crate::hash::archive_name_hash;
use crate::types::{write_utf16, BarEntry, BarHeader};

/// Separator used for every path stored in an archive
pub const PATH_SEPARATOR: char = '\\';

/// Options for how the BAR file should be written
#[derive(Debug, Clone, Builder)]
pub struct BarWriterOptions {
    /// File name of the archive, for example `Data_generated.bar`, hashed into the header
    #[builder(into)]
    pub archive_name: String,

    /// Path written ahead of the entry table, for example `Data\`
    #[builder(into)]
    pub root_path: String,
}

/// BAR archive generator
///
/// Entry data is streamed straight into the inner writer. The header is reserved up front and
/// filled in by [`BarWriter::finish`], once the entry count and table position are known.
///
/// ```
/// # fn doit() -> aoe_bar::error::Result<()>
/// # {
/// use aoe_bar::{BarWriter, BarWriterOptions};
///
/// // We use a buffer here, though you'd normally use a `File`
/// let mut bar = BarWriter::new(
///     std::io::Cursor::new(Vec::new()),
///     BarWriterOptions::builder()
///         .archive_name("Data.bar")
///         .root_path("Data\\")
///         .build(),
/// )?;
///
/// bar.add_entry("hello_world.txt", b"Hello, World!")?;
///
/// // Write the entry table and the header.
/// bar.finish()?;
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct BarWriter<W: Write + Seek> {
    inner: W,
    start: u64,
    options: BarWriterOptions,
    entries: Vec<BarEntry>,
    data_size: u64,
}

impl<W: Write + Seek> BarWriter<W> {
    /// Initializes the archive at the current position of `inner`, reserving room for the header.
    pub fn new(mut inner: W, options: BarWriterOptions) -> Result<BarWriter<W>> {
        let start = inner.stream_position()?;
        inner.write_all(&[0u8; BarHeader::SIZE])?;

        Ok(BarWriter {
            inner,
            start,
            options,
            entries: Vec::new(),
            data_size: 0,
        })
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry was added yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries added so far, in archive order
    pub fn entries(&self) -> &[BarEntry] {
        &self.entries
    }

    /// Add an entry from memory.
    ///
    /// ALZ4 data is detected from its magic and recorded as compressed.
    #[instrument(skip_all, fields(size = data.len()), err)]
    pub fn add_entry(&mut self, name: impl ToString, data: &[u8]) -> Result<&BarEntry> {
        let compressed_size = if aoe_alz4::is_alz4(data) {
            Some(aoe_alz4::peek_compressed_size(data)?)
        } else {
            None
        };

        let mut reader = data;
        // Move `self` into the body so the closure generated by `instrument` is `FnOnce`
        let this = self;
        this.push(name.to_string(), data.len() as u64, compressed_size, &mut reader)
    }

    /// Add an entry by copying the file at `path`.
    ///
    /// Only the first bytes of the file are inspected to size an ALZ4 entry, the payload is copied
    /// as is.
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn add_file(&mut self, name: impl ToString, path: impl AsRef<Path>) -> Result<&BarEntry> {
        let path = path.as_ref();
        let length = fs::metadata(path)?.len();

        let compressed_size = if aoe_alz4::fs::is_alz4_file(path)? {
            Some(aoe_alz4::fs::compressed_size_of(path)?)
        } else {
            None
        };

        let mut file = File::open(path)?;
        // Move `self` into the body so the closure generated by `instrument` is `FnOnce`
        let this = self;
        this.push(name.to_string(), length, compressed_size, &mut file)
    }

    fn push<R: Read>(
        &mut self,
        path: String,
        length: u64,
        compressed_size: Option<u32>,
        reader: &mut R,
    ) -> Result<&BarEntry> {
        let stored_size = i32::try_from(length).map_err(|_| Error::TooLarge(length))?;
        let size = match compressed_size {
            Some(size) => i32::try_from(size).map_err(|_| Error::TooLarge(size as u64))?,
            None => stored_size,
        };

        let copied = io::copy(&mut reader.take(length), &mut self.inner)?;
        if copied != length {
            return Err(Error::SizeChanged {
                path,
                expected: length,
                actual: copied,
            });
        }

        debug!(path = %path, offset = self.data_size, size, "added entry");
        self.entries.push(BarEntry {
            path,
            offset: self.data_size as i64,
            size,
            size_dup1: stored_size,
            size_dup2: stored_size,
            compressed: compressed_size.is_some(),
        });
        self.data_size += length;

        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Write the entry table and the header.
    ///
    /// This will return the writer positioned after the table.
    #[instrument(skip_all, fields(entries = self.entries.len()), err)]
    pub fn finish(mut self) -> Result<W> {
        write_utf16(
            &mut self.inner,
            U16String::from_str(&self.options.root_path).as_slice(),
        )?;
        self.inner
            .write_u32::<LittleEndian>(self.entries.len() as u32)?;
        for entry in &self.entries {
            entry.write(&mut self.inner)?;
        }
        let end = self.inner.stream_position()?;

        let header = BarHeader::new(
            self.entries.len() as u32,
            BarHeader::SIZE as i64 + self.data_size as i64,
            archive_name_hash(&self.options.archive_name),
        );

        self.inner.seek(SeekFrom::Start(self.start))?;
        header.write(&mut self.inner)?;
        self.inner.seek(SeekFrom::Start(end))?;
        self.inner.flush()?;

        Ok(self.inner)
    }
}

/// Convert a path relative to the archive root into its stored form.
///
/// Returns `None` for paths that are not valid UTF-8 or that leave the root.
pub fn entry_name(relative: impl AsRef<Path>) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.as_ref().components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }

    Some(parts.join(&PATH_SEPARATOR.to_string()))
}

/// The root path stored for an archive built from `directory`, e.g. `Data\`
pub fn root_path(directory: impl AsRef<Path>) -> String {
    let name = directory
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!("{name}{PATH_SEPARATOR}")
}

/// Create the archive at `path` from already written files.
///
/// `files` yields the stored name of every entry with the file to copy, in archive order. If any
/// step fails the partially written archive is removed and the original error is returned.
#[instrument(skip_all, fields(archive = %path.as_ref().display()), err)]
pub fn create_archive<I, P>(
    path: impl AsRef<Path>,
    options: BarWriterOptions,
    files: I,
) -> Result<Vec<BarEntry>>
where
    I: IntoIterator<Item = (String, P)>,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let result = File::create(path).map_err(Error::from).and_then(|file| {
        let mut bar = BarWriter::new(BufWriter::new(file), options)?;
        for (name, source) in files {
            bar.add_file(name, source)?;
        }

        let entries = bar.entries().to_vec();
        bar.finish()?;
        Ok(entries)
    });

    match &result {
        Ok(entries) => info!("wrote {} entries to {}", entries.len(), path.display()),
        Err(_) if path.exists() => {
            if let Err(e) = fs::remove_file(path) {
                warn!("unable to remove partial archive {}: {}", path.display(), e);
            }
        }
        Err(_) => {}
    }

    result
}
