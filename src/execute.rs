use crate::classify;
use crate::collect::{self, IntakeEntry};
use crate::summary::RunSummary;
use crate::utils;
use crate::verify::{self, StreamHasher};
use chrono::NaiveDateTime;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::{error, info};

fn is_cross_device(err: &io::Error) -> bool {
    #[cfg(unix)]
    {
        // EXDEV
        err.raw_os_error() == Some(18)
    }
    #[cfg(windows)]
    {
        // ERROR_NOT_SAME_DEVICE
        err.raw_os_error() == Some(17)
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = err;
        false
    }
}

fn copy_verified(src: &Path, target: &mut File, dst: &Path) -> io::Result<()> {
    let mut source = StreamHasher::new(File::open(src)?);
    io::copy(&mut source, target)?;
    target.sync_all()?;
    fs::set_permissions(dst, fs::metadata(src)?.permissions())?;
    let expected = source.get_result();
    if verify::hash_reader(File::open(dst)?)? != expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("copy of {} does not match its source", src.display()),
        ));
    }
    Ok(())
}

fn copy_then_remove<R>(src: &Path, dst: &Path, remove_source: R) -> io::Result<()>
where
    R: FnOnce(&Path) -> io::Result<()>,
{
    let mut target = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dst)?;
    let result = copy_verified(src, &mut target, dst).and_then(|()| remove_source(src));
    if result.is_err() {
        // The file must end up in exactly one place.
        drop(target);
        let _ = fs::remove_file(dst);
    }
    result
}

/// Moves a file by copying it, and removes the source only once the copy is
/// known to hold the same bytes. If the source cannot be removed, the copy
/// is discarded.
pub(crate) fn copy_and_remove(src: &Path, dst: &Path) -> io::Result<()> {
    copy_then_remove(src, dst, |src| fs::remove_file(src))
}

/// Moves `src` to `dst`, never replacing an existing `dst`.
pub fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    if fs::symlink_metadata(dst).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", dst.display()),
        ));
    }
    match fs::rename(src, dst) {
        Err(ref err) if is_cross_device(err) => copy_and_remove(src, dst),
        result => result,
    }
}

fn relocate<M>(
    intake_dir: &Path,
    entry: &IntakeEntry,
    now: &NaiveDateTime,
    move_to: &mut M,
) -> io::Result<OsString>
where
    M: FnMut(&Path, &Path) -> io::Result<()>,
{
    let new_name = classify::get_new_file_name(now, &entry.file_name);
    let bucket = intake_dir.join(classify::get_bucket_name(now));
    fs::create_dir_all(&bucket)?;
    move_to(&entry.path, &bucket.join(&new_name))?;
    Ok(new_name)
}

/// Relocates every file directly under `intake_dir` into its dated bucket.
///
/// `now` is sampled once per file, and both the bucket and the time prefix
/// come from that sample. A failure on one file is recorded in the summary
/// and never stops the others. Only failing to list `intake_dir` is returned
/// as an error.
pub fn process_intake<F>(intake_dir: &Path, now: F, quiet: bool) -> io::Result<RunSummary>
where
    F: FnMut() -> NaiveDateTime,
{
    process_intake_with(intake_dir, now, quiet, move_file)
}

fn process_intake_with<F, M>(
    intake_dir: &Path,
    mut now: F,
    quiet: bool,
    mut move_to: M,
) -> io::Result<RunSummary>
where
    F: FnMut() -> NaiveDateTime,
    M: FnMut(&Path, &Path) -> io::Result<()>,
{
    info!("Starting file processing in {}", intake_dir.display());
    let files = collect::list_intake(intake_dir)?;

    let mut summary = RunSummary::new();
    let progress = utils::create_progress_bar(quiet, files.len());
    for entry in files.iter() {
        let file_name = entry.file_name.to_string_lossy().into_owned();
        match relocate(intake_dir, entry, &now(), &mut move_to) {
            Ok(new_name) => {
                let new_name = new_name.to_string_lossy().into_owned();
                info!("Moved and renamed: {} -> {}", file_name, new_name);
                summary.record_processed(new_name);
            }
            Err(err) => {
                error!("Error processing {}: {}", file_name, err);
                summary.record_error(file_name, err.to_string());
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        "File processing finished: {} moved, {} failed",
        summary.processed.len(),
        summary.errors.len()
    );
    Ok(summary)
}
