//! Plain-text diagnostics printed for each conversion.

use crate::config::ConvertParams;
use crate::output::ConversionOutput;
use std::io::{self, Write};
use std::path::Path;

/// Width of the dashed line closing each report.
pub const SEPARATOR_WIDTH: usize = 50;

/// Write the request description, status, first-row width, the art itself
/// and a separator line.
pub fn write_report<W: Write>(
    mut w: W,
    image: &Path,
    params: &ConvertParams,
    output: &ConversionOutput,
) -> io::Result<()> {
    writeln!(
        w,
        "Testing {} with size {} and charset '{}'",
        image.display(),
        params.size,
        params.char_set
    )?;
    writeln!(w, "Status Code: {}", output.status)?;
    writeln!(w, "{}", output.first_line_width())?;
    writeln!(w, "{}", output.ascii)?;
    writeln!(w, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    Ok(())
}
