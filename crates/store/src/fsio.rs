/// Low-level file helpers shared by every entity module.
///
/// All whole-file writes go through [`atomic_write`]: write to a uniquely
/// named sibling temp file, fsync, then rename over the target. Readers
/// never observe a half-written record. Appends to a group roster are plain
/// `O_APPEND` writes of a single short line.
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::warn;

use crate::error::{IoContext, Result};

/// Suffix of in-flight temporary files. Listings only consider `.txt` files,
/// so a leftover temp file from an interrupted write is never mistaken for a
/// record.
pub(crate) const TMP_SUFFIX: &str = ".tmp";

/// Replaces `path` with `contents` atomically.
///
/// Each call writes its own uniquely named temp file next to the target and
/// renames it over the target, so concurrent writers of the same file never
/// share a temp file and readers only ever see one complete version. On
/// Windows a rename over a file that is still open elsewhere can be refused;
/// only that case falls back to writing the target in place.
pub(crate) fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut prefix = OsString::from(".");
    prefix.push(path.file_name().unwrap_or_default());
    prefix.push(".");

    let mut tmp = Builder::new()
        .prefix(&prefix)
        .suffix(TMP_SUFFIX)
        .tempfile_in(dir)
        .at(dir)?;
    tmp.write_all(contents.as_bytes()).at(tmp.path())?;
    tmp.flush().at(tmp.path())?;
    tmp.as_file().sync_all().at(tmp.path())?;

    match tmp.persist(path) {
        Ok(_) => Ok(()),
        Err(e) if rename_refused(&e.error) => {
            warn!(path = %path.display(), error = %e.error, "atomic rename refused, writing in place");
            // Dropping `e.file` removes the temp file.
            drop(e.file);
            write_in_place(path, contents)
        }
        Err(e) => Err(e.error).at(path),
    }
}

fn rename_refused(err: &io::Error) -> bool {
    cfg!(windows) && err.kind() == io::ErrorKind::PermissionDenied
}

fn write_in_place(path: &Path, contents: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .at(path)?;
    f.write_all(contents.as_bytes()).at(path)?;
    f.flush().at(path)?;
    f.sync_all().at(path)
}

/// Appends one line to `path`, creating the file if needed.
pub(crate) fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    f.write_all(line.as_bytes())?;
    f.flush()?;
    f.sync_all()
}

/// Reads a file to a string, mapping "does not exist" to `None`.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).at(path),
    }
}

/// Names of the direct children of `dir` accepted by `keep`, in directory
/// listing order. A missing directory yields an empty list.
pub(crate) fn child_names<F>(dir: &Path, keep: F) -> Result<Vec<String>>
where
    F: Fn(&Path) -> bool,
{
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).at(dir),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.at(dir)?;
        let path = entry.path();
        if !keep(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Stems of the `*.txt` regular files directly under `dir`.
pub(crate) fn record_stems(dir: &Path) -> Result<Vec<String>> {
    let names = child_names(dir, |p| {
        p.is_file() && p.extension().map(|e| e == "txt").unwrap_or(false)
    })?;
    Ok(names
        .into_iter()
        .filter_map(|n| n.strip_suffix(".txt").map(str::to_string))
        .collect())
}

/// Moves a directory tree from `from` to `to`.
///
/// Tries a plain rename first. If that fails (for example across devices),
/// falls back to [`copy_then_remove`].
pub(crate) fn move_dir(from: &Path, to: &Path) -> Result<()> {
    let rename_err = match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    warn!(
        from = %from.display(),
        to = %to.display(),
        error = %rename_err,
        "directory rename failed, falling back to copy"
    );
    copy_then_remove(from, to)
}

/// Copies the tree at `from` to a new directory `to`, then removes `from`.
///
/// `to` must not exist yet. When the copy fails part-way the partial
/// destination is removed so the source stays the only copy.
pub(crate) fn copy_then_remove(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir(to).at(to)?;
    if let Err(e) = copy_contents(from, to) {
        let _ = fs::remove_dir_all(to);
        return Err(e);
    }
    fs::remove_dir_all(from).at(from)
}

fn copy_contents(from: &Path, to: &Path) -> Result<()> {
    for entry in fs::read_dir(from).at(from)? {
        let entry = entry.at(from)?;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        if entry.file_type().at(&src)?.is_dir() {
            fs::create_dir(&dst).at(&dst)?;
            copy_contents(&src, &dst)?;
        } else {
            fs::copy(&src, &dst).at(&src)?;
        }
    }
    Ok(())
}
