use crate::Result;
use crate::rules::ValidationRule;
use core::fmt::Write;

pub fn generate<W: Write>(rules: &[ValidationRule], writer: &mut W) -> Result<()> {
    for rule in rules {
        writeln!(writer, "{} ({})", rule.name(), rule.scope())?;
        for validator in rule.validators() {
            writeln!(writer, "  - {}", validator.describe())?;
        }
    }

    Ok(())
}
