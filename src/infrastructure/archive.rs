//! Versioned zip container: one manifest entry, one tree entry.
//!
//! Load reads and version-gates the manifest before the tree entry is
//! touched; only the major component is compared, so minor and patch
//! differences pass silently in both directions.

use std::fs::File;
use std::io::{self, Read, Seek, Write};
use std::path::Path;

use tracing::{debug, instrument};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::domain::manifest::{Manifest, FORMAT_VERSION};
use crate::domain::record::NodeRecord;
use crate::infrastructure::error::{FormatError, FormatResult};

/// Container entry holding the manifest.
pub const MANIFEST_ENTRY: &str = "manifest.json";
/// Container entry holding the root node record.
pub const TREE_ENTRY: &str = "tree.json";

/// Write a container holding `root` and `manifest`, deflate-compressed.
///
/// The written manifest carries the running [`FORMAT_VERSION`], whatever the
/// caller's copy says. The writer is finished on success and dropped (hence
/// closed) on every error path.
#[instrument(level = "debug", skip_all)]
pub fn save_to_writer<W: Write + Seek>(
    writer: W,
    manifest: &Manifest,
    root: &NodeRecord,
) -> FormatResult<()> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut stamped = manifest.clone();
    stamped.version = FORMAT_VERSION.to_string();

    zip.start_file(TREE_ENTRY, options.clone())?;
    serde_json::to_writer_pretty(&mut zip, root).map_err(io::Error::from)?;
    zip.start_file(MANIFEST_ENTRY, options)?;
    serde_json::to_writer_pretty(&mut zip, &stamped).map_err(io::Error::from)?;
    zip.finish()?;
    Ok(())
}

/// Read a container back into its manifest and root record.
#[instrument(level = "debug", skip_all)]
pub fn load_from_reader<R: Read + Seek>(reader: R) -> FormatResult<(Manifest, NodeRecord)> {
    let mut zip = ZipArchive::new(reader)?;

    let manifest: Manifest = {
        let entry = zip.by_name(MANIFEST_ENTRY)?;
        serde_json::from_reader(entry).map_err(|_| FormatError::Damaged)?
    };
    check_version(&manifest)?;

    let root: NodeRecord = {
        let entry = zip.by_name(TREE_ENTRY)?;
        serde_json::from_reader(entry).map_err(|_| FormatError::Damaged)?
    };

    debug!(version = %manifest.version, "container loaded");
    Ok((manifest, root))
}

/// Save a container to a file path.
pub fn save_path(path: &Path, manifest: &Manifest, root: &NodeRecord) -> FormatResult<()> {
    let file = File::create(path)?;
    save_to_writer(file, manifest, root)
}

/// Load a container from a file path.
pub fn load_path(path: &Path) -> FormatResult<(Manifest, NodeRecord)> {
    let file = File::open(path)?;
    load_from_reader(file)
}

fn check_version(manifest: &Manifest) -> FormatResult<()> {
    let running = Manifest::major_of(FORMAT_VERSION).ok_or(FormatError::Damaged)?;
    let theirs = manifest.major().ok_or(FormatError::Damaged)?;
    if theirs > running {
        return Err(FormatError::TooNew {
            running: FORMAT_VERSION.to_string(),
            required: format!("{theirs}.0.0"),
        });
    }
    Ok(())
}
