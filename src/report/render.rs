//! Report rendering

use crate::core::types::AnalysisResult;
use crate::report::SessionReport;
use std::io::{self, Write};

const SECTION_DIVIDER: &str = "**************************************************";

/// Renders reports as one textual section per session
pub fn render_text<W: Write>(reports: &[SessionReport], out: &mut W) -> io::Result<()> {
    for report in reports {
        writeln!(out, "{SECTION_DIVIDER}")?;
        writeln!(
            out,
            "Session(V): {:x} ID: {} Processes: {}",
            report.offset, report.session_id, report.process_count
        )?;
        writeln!(
            out,
            "PagedPoolStart: {:x} PagedPoolEnd: {:x}",
            report.paged_pool_start, report.paged_pool_end
        )?;
        for process in &report.processes {
            writeln!(
                out,
                " Process: {} {} {} @ {:#x}",
                process.id, process.name, process.create_time, process.offset
            )?;
        }
        for image in &report.images {
            writeln!(
                out,
                " Image: {:#x}, Address: {:x}, Name: {}",
                image.offset, image.address, image.module
            )?;
        }
    }
    Ok(())
}

/// Renders reports as a JSON array
pub fn render_json<W: Write>(reports: &[SessionReport], out: &mut W) -> AnalysisResult<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)?;
    Ok(())
}
