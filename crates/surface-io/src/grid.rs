//! ASCII grid export of a surface.
//!
//! Header lines `NROWS`, `NCOLS`, `XLLCENTER 0`, `YLLCENTER 0`, `DX`, `DY`
//! and `NODATA_VALUE -1`, then one text line per grid row, top to bottom in
//! array order. Every value is a space followed by a 9-wide field with 3
//! decimals.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use surface_types::{SurfaceError, SurfaceGrid};

/// Format a cell size the way the header expects: shortest decimal that
/// round-trips, always with a fractional part.
fn format_cell_size(g: f64) -> String {
    if g.is_finite() && g.fract() == 0.0 {
        format!("{:.1}", g)
    } else {
        format!("{}", g)
    }
}

/// Write `grid` in ASCII grid format.
pub fn write_grid<W: Write>(mut writer: W, grid: &SurfaceGrid) -> io::Result<()> {
    let g = format_cell_size(grid.cell_size());
    writeln!(writer, "NROWS {}", grid.rows())?;
    writeln!(writer, "NCOLS {}", grid.cols())?;
    writeln!(writer, "XLLCENTER 0")?;
    writeln!(writer, "YLLCENTER 0")?;
    writeln!(writer, "DX {}", g)?;
    writeln!(writer, "DY {}", g)?;
    writeln!(writer, "NODATA_VALUE -1")?;

    for r in 0..grid.rows() {
        for value in grid.row(r) {
            write!(writer, " {:9.3}", value)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write `grid` to the ASCII grid file at `path`.
pub fn export_grid(path: impl AsRef<Path>, grid: &SurfaceGrid) -> Result<(), SurfaceError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| SurfaceError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_grid(&mut writer, grid).map_err(|e| SurfaceError::io(path, e))?;
    writer.flush().map_err(|e| SurfaceError::io(path, e))?;
    debug!(path = %path.display(), rows = grid.rows(), cols = grid.cols(), "wrote ASCII grid");
    Ok(())
}
