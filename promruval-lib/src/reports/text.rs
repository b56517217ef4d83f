use super::{FileReport, GroupReport, ValidationReport, Violation};
use crate::Result;
use core::fmt::Write;
use owo_colors::OwoColorize;

/// Render the report as an indented tree, `indent` spaces per level.
pub fn generate<W: Write>(report: &ValidationReport, indent: usize, use_colors: bool, writer: &mut W) -> Result<()> {
    let pad = |level: usize| " ".repeat(indent * level);

    writeln!(writer, "{}", heading("Validation rules used:", use_colors))?;
    if report.validation_rules.is_empty() {
        writeln!(writer, "{}none", pad(1))?;
    }
    for rule in &report.validation_rules {
        writeln!(writer, "{}{} ({})", pad(1), rule.name, rule.scope)?;
        for validator in &rule.validators {
            writeln!(writer, "{}- {}", pad(2), validator.description)?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "{}", heading("Result:", use_colors))?;
    for file in &report.files {
        write_file(file, indent, use_colors, writer)?;
    }

    writeln!(writer)?;
    let summary = format!(
        "{} errors in {} files, took {}ms",
        report.errors_count,
        report.files_count,
        report.duration.as_millis()
    );
    if report.failed {
        writeln!(writer, "{} {summary}", status("Validation FAILED:", false, use_colors))?;
    } else {
        writeln!(writer, "{} {summary}", status("Validation PASSED:", true, use_colors))?;
    }

    Ok(())
}

fn write_file<W: Write>(file: &FileReport, indent: usize, use_colors: bool, writer: &mut W) -> Result<()> {
    let pad = |level: usize| " ".repeat(indent * level);

    let mark = if file.valid { status("✔", true, use_colors) } else { status("✘", false, use_colors) };
    writeln!(writer, "{}{mark} File: {}", pad(1), file.name)?;

    if let Some(error) = &file.error {
        // Error chains span several lines, keep them under the file
        for line in error.lines() {
            writeln!(writer, "{}{}", pad(2), line)?;
        }
        return Ok(());
    }

    for group in file.groups.iter().filter(|g| !g.valid) {
        write_group(group, indent, use_colors, writer)?;
    }

    Ok(())
}

fn write_group<W: Write>(group: &GroupReport, indent: usize, use_colors: bool, writer: &mut W) -> Result<()> {
    let pad = |level: usize| " ".repeat(indent * level);

    writeln!(writer, "{}Group: {}", pad(2), group.name)?;
    for violation in &group.errors {
        write_violation(violation, &pad(3), use_colors, writer)?;
    }

    for rule in group.rules.iter().filter(|r| !r.valid) {
        writeln!(writer, "{}Rule: {} ({})", pad(3), rule.name, rule.kind)?;
        for violation in &rule.errors {
            write_violation(violation, &pad(4), use_colors, writer)?;
        }
    }

    Ok(())
}

fn write_violation<W: Write>(violation: &Violation, prefix: &str, use_colors: bool, writer: &mut W) -> Result<()> {
    let rule = if use_colors {
        violation.validation_rule.yellow().to_string()
    } else {
        violation.validation_rule.clone()
    };
    writeln!(writer, "{prefix}{rule} [{}]: {}", violation.validator, violation.message)?;
    Ok(())
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors { text.bold().to_string() } else { text.to_string() }
}

fn status(text: &str, ok: bool, use_colors: bool) -> String {
    match (use_colors, ok) {
        (false, _) => text.to_string(),
        (true, true) => text.green().bold().to_string(),
        (true, false) => text.red().bold().to_string(),
    }
}
