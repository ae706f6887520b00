//! Append-only log of fatal errors.
//!
//! A wall-mounted display has nobody watching its console. When a run ends
//! on an error (or a panic), a record is appended here so it can be read
//! later.

use std::{
    backtrace::Backtrace,
    error::Error,
    fmt::Write as _,
    fs::OpenOptions,
    io::Write,
    panic::PanicHookInfo,
    path::{Path, PathBuf},
};

use chrono::Local;

/// Default log file name, relative to the working directory.
pub const DEFAULT_ERROR_LOG: &str = "slow-movie-errors.log";

/// Append a record for `error`: header, message, source chain, backtrace.
///
/// # Errors
///
/// Returns the I/O error if the log cannot be opened or written.
pub fn append(path: &Path, error: &(dyn Error + 'static)) -> std::io::Result<()> {
    let mut body = format!("{error}\n");
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = writeln!(body, "caused by: {cause}");
        source = cause.source();
    }
    write_record(path, &body, &Backtrace::force_capture())
}

/// Append a record for a panic.
///
/// # Errors
///
/// Returns the I/O error if the log cannot be opened or written.
pub fn append_panic(path: &Path, info: &PanicHookInfo<'_>) -> std::io::Result<()> {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    let location = info
        .location()
        .map(|location| format!(" at {}:{}", location.file(), location.line()))
        .unwrap_or_default();
    write_record(path, &format!("panic{location}: {payload}\n"), &Backtrace::force_capture())
}

/// Route panics to the error log before running the previous hook.
pub fn install_panic_hook(path: PathBuf) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Err(error) = append_panic(&path, info) {
            eprintln!("could not write {}: {error}", path.display());
        }
        previous(info);
    }));
}

fn write_record(path: &Path, body: &str, backtrace: &Backtrace) -> std::io::Result<()> {
    let timestamp = Local::now().to_rfc3339();
    let arguments = std::env::args().collect::<Vec<_>>().join(" ");

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "=== [{timestamp}] {arguments}")?;
    write!(file, "{body}")?;
    writeln!(file, "backtrace:\n{backtrace}")?;
    writeln!(file)?;
    Ok(())
}
