//! Whitespace-delimited text rows for study results.

use latsim_world::glider::GliderSample;
use latsim_world::study::VariancePoint;
use std::io::{self, Write};

pub fn write_values<W: Write>(out: &mut W, values: &[usize]) -> io::Result<()> {
    for value in values {
        writeln!(out, "{}", value)?;
    }
    Ok(())
}

/// `lower_edge count` per bin.
pub fn write_histogram<W: Write>(out: &mut W, bins: &[(usize, usize)]) -> io::Result<()> {
    for (edge, count) in bins {
        writeln!(out, "{} {}", edge, count)?;
    }
    Ok(())
}

/// `step row col` per kept sample.
pub fn write_trajectory<W: Write>(out: &mut W, samples: &[GliderSample]) -> io::Result<()> {
    for sample in samples {
        writeln!(out, "{} {:.5} {:.5}", sample.step, sample.row, sample.col)?;
    }
    Ok(())
}

pub fn write_matrix<W: Write>(out: &mut W, matrix: &[Vec<f64>]) -> io::Result<()> {
    for row in matrix {
        let line: Vec<String> = row.iter().map(|v| format!("{:.5}", v)).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

/// `p1 mean variance error` per point.
pub fn write_variance<W: Write>(out: &mut W, points: &[VariancePoint]) -> io::Result<()> {
    for p in points {
        writeln!(
            out,
            "{:.5} {:.5} {:.5} {:.5}",
            p.p1, p.mean, p.variance, p.error
        )?;
    }
    Ok(())
}
