use crate::Result;
use crate::rules::ValidationRule;
use core::fmt::Write;

pub fn generate<W: Write>(rules: &[ValidationRule], writer: &mut W) -> Result<()> {
    writeln!(writer, "# Validation rules")?;

    for rule in rules {
        writeln!(writer)?;
        writeln!(writer, "## {}", rule.name())?;
        writeln!(writer)?;
        writeln!(writer, "Scope: `{}`", rule.scope())?;

        if rule.validators().is_empty() {
            continue;
        }

        writeln!(writer)?;
        for validator in rule.validators() {
            writeln!(writer, "- {}", validator.describe())?;
        }
    }

    Ok(())
}
