//! Result rendering

use crate::search::RunResult;
use std::io::Write;

/// Writes the first `top` records' markup, in final order, one per line
///
/// Returns the number of records written, which is less than `top` when the
/// run found fewer records.
pub fn write_top_records<W: Write>(
    result: &RunResult,
    top: usize,
    out: &mut W,
) -> std::io::Result<usize> {
    let mut written = 0;

    for record in result.records.iter().take(top) {
        writeln!(out, "{}", record.rendered_content())?;
        written += 1;
    }

    out.flush()?;
    Ok(written)
}
