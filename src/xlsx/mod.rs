//! Cell-content hashing for XLSX workbooks.
//!
//! Re-saving a workbook rewrites ZIP timestamps and may change compression,
//! which changes every byte-level hash even though no cell changed. The
//! digest here is taken over sheet names and rendered rows only, in the
//! workbook's own sheet and row order, so reordering sheets or rows does
//! change it.

mod repr;

use std::cell::Cell;
use std::io::{self, Cursor, Read};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use calamine::{Reader, Xlsx};
use tracing::{debug, error};

use crate::error::WorkbookError;

pub use repr::{CellRepr, render_row, render_rows};

/// MD5 over the sheet names and cell values of an XLSX workbook.
///
/// Returns `""` when the buffer is not a workbook or its sheets cannot be
/// read; the reason is logged at error level. A panic inside the workbook
/// reader is logged the same way instead of printing a panic message. The
/// workbook reader and its cursor are dropped before returning on every path.
pub fn hash_excel_buffer(buffer: &[u8]) -> String {
    let outcome = catch_quietly(|| hash_workbook(buffer))
        .unwrap_or_else(|payload| Err(WorkbookError::Unexpected(panic_message(payload))));

    match outcome {
        Ok(digest) => digest,
        Err(err @ WorkbookError::Unexpected(_)) => {
            error!("Unexpected error hashing xlsx: {err}");
            String::new()
        }
        Err(err) => {
            error!("Error hashing xlsx: {err}");
            String::new()
        }
    }
}

/// Read the rest of `reader` and hash it with [`hash_excel_buffer`].
pub fn hash_excel_stream<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(hash_excel_buffer(&buffer))
}

fn hash_workbook(buffer: &[u8]) -> Result<String, WorkbookError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(buffer)).map_err(WorkbookError::classify)?;
    let sheet_names = workbook.sheet_names();
    if sheet_names.is_empty() {
        return Err(WorkbookError::NoSheets);
    }

    let mut md5hash = md5::Context::new();
    for sheet_name in sheet_names {
        md5hash.consume(sheet_name.as_bytes());

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(WorkbookError::Unreadable)?;
        debug!(sheet = %sheet_name, rows = range.height(), "hashing sheet");

        for row in render_rows(&range) {
            md5hash.consume(row.as_bytes());
        }
    }

    Ok(format!("{:x}", md5hash.compute()))
}

thread_local! {
    static SILENCE_PANICS: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// `catch_unwind` that keeps the panic hook from printing for panics raised
/// by `f` on this thread. Other threads still report their panics.
fn catch_quietly<T>(f: impl FnOnce() -> T) -> std::thread::Result<T> {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !SILENCE_PANICS.with(Cell::get) {
                previous(info);
            }
        }));
    });

    let was_silenced = SILENCE_PANICS.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    SILENCE_PANICS.with(|flag| flag.set(was_silenced));
    result
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "workbook reader panicked".to_string()
    }
}
