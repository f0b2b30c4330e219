//! Path-based save and load.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use pzfx_model::Table;

use crate::error::{PzfxError, Result};
use crate::options::{LoadOptions, SaveOptions};
use crate::reader::read_pzfx;
use crate::writer::write_pzfx;

/// `<file>.bak` next to `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Write `tables` to `path`.
///
/// The document is written to a temporary file in the target directory and
/// renamed over `path`, so a failed write never leaves a truncated file.
pub fn save_document(path: &Path, tables: &[Table], options: &SaveOptions) -> Result<()> {
    if options.backup && path.exists() {
        let backup = backup_path(path);
        fs::copy(path, &backup)?;
        debug!(backup = %backup.display(), "backed up existing file");
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;
    let temp = NamedTempFile::new_in(&dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        write_pzfx(&mut writer, tables, options)?;
        writer.flush()?;
    }
    temp.persist(path)?;
    info!(path = %path.display(), tables = tables.len(), "saved prism file");
    Ok(())
}

/// Read every table from the file at `path`.
pub fn load_document(path: &Path, options: &LoadOptions) -> Result<Vec<Table>> {
    if !path.exists() {
        return Err(PzfxError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    let tables = read_pzfx(BufReader::new(file))?;
    if options.backup {
        let backup = backup_path(path);
        fs::copy(path, &backup)?;
        debug!(backup = %backup.display(), "backed up loaded file");
    }
    info!(path = %path.display(), tables = tables.len(), "loaded prism file");
    Ok(tables)
}
