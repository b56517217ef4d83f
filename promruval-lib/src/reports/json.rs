use super::ValidationReport;
use crate::Result;
use core::fmt::Write;

pub fn generate<W: Write>(report: &ValidationReport, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", serde_json::to_string_pretty(report)?)?;
    Ok(())
}
