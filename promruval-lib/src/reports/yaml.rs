use super::ValidationReport;
use crate::Result;
use core::fmt::Write;

pub fn generate<W: Write>(report: &ValidationReport, writer: &mut W) -> Result<()> {
    write!(writer, "{}", serde_yaml::to_string(report)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_report;

    #[test]
    fn test_generate_yaml_parses_back() {
        let mut output = String::new();
        generate(&test_report(), &mut output).unwrap();

        let value: serde_yaml::Value = serde_yaml::from_str(&output).unwrap();
        assert_eq!(value["failed"], serde_yaml::Value::Bool(true));
        assert_eq!(value["filesCount"].as_u64(), Some(3));
        assert_eq!(value["files"][0]["name"].as_str(), Some("rules/a.yaml"));
        assert_eq!(
            value["files"][0]["groups"][0]["rules"][0]["errors"][0]["validator"].as_str(),
            Some("hasLabels")
        );
    }

    #[test]
    fn test_generate_yaml_empty_report() {
        let mut output = String::new();
        generate(&ValidationReport::new(&[]), &mut output).unwrap();

        insta::assert_snapshot!(output, @r"
        failed: false
        duration: 0s
        filesCount: 0
        errorsCount: 0
        validationRules: []
        files: []
        ");
    }
}
