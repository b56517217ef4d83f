use crate::Result;
use crate::rules::ValidationRule;
use core::fmt::Write;

pub fn generate<W: Write>(rules: &[ValidationRule], writer: &mut W) -> Result<()> {
    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html>")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "  <meta charset=\"UTF-8\">")?;
    writeln!(writer, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(writer, "  <title>Validation rules</title>")?;
    write_styles(writer)?;
    writeln!(writer, "</head>")?;
    writeln!(writer, "<body>")?;
    writeln!(writer, "  <h1>Validation rules</h1>")?;

    for rule in rules {
        writeln!(writer, "  <section class=\"rule\">")?;
        writeln!(writer, "    <h2>{}</h2>", html_escape(rule.name()))?;
        writeln!(writer, "    <p class=\"scope\">Scope: <code>{}</code></p>", html_escape(&rule.scope().to_string()))?;
        if !rule.validators().is_empty() {
            writeln!(writer, "    <ul>")?;
            for validator in rule.validators() {
                writeln!(
                    writer,
                    "      <li title=\"{}\">{}</li>",
                    html_escape(validator.kind()),
                    html_escape(&validator.describe())
                )?;
            }
            writeln!(writer, "    </ul>")?;
        }
        writeln!(writer, "  </section>")?;
    }

    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;
    Ok(())
}

fn write_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "  <style>")?;
    writeln!(writer, "    :root {{")?;
    writeln!(writer, "      --bg-color: #f0f2f5;")?;
    writeln!(writer, "      --card-bg: #ffffff;")?;
    writeln!(writer, "      --text-color: #1a202c;")?;
    writeln!(writer, "      --text-secondary: #64748b;")?;
    writeln!(writer, "      --border-color: #e2e8f0;")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    @media (prefers-color-scheme: dark) {{")?;
    writeln!(writer, "      :root {{")?;
    writeln!(writer, "        --bg-color: #0f172a;")?;
    writeln!(writer, "        --card-bg: #1e293b;")?;
    writeln!(writer, "        --text-color: #e2e8f0;")?;
    writeln!(writer, "        --text-secondary: #94a3b8;")?;
    writeln!(writer, "        --border-color: #334155;")?;
    writeln!(writer, "      }}")?;
    writeln!(writer, "    }}")?;
    writeln!(
        writer,
        "    body {{ font-family: system-ui, sans-serif; background: var(--bg-color); color: var(--text-color); margin: 2rem; }}"
    )?;
    writeln!(
        writer,
        "    .rule {{ background: var(--card-bg); border: 1px solid var(--border-color); border-radius: 8px; padding: 0.5rem 1.5rem; margin-bottom: 1rem; }}"
    )?;
    writeln!(writer, "    .scope {{ color: var(--text-secondary); }}")?;
    writeln!(writer, "  </style>")?;
    Ok(())
}

fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::test_rules;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a < b && c > \"d\" 'e'"), "a &lt; b &amp;&amp; c &gt; &quot;d&quot; &#39;e&#39;");
    }

    #[test]
    fn test_generate_html() {
        let mut output = String::new();
        generate(&test_rules(), &mut output).unwrap();

        assert!(output.starts_with("<!DOCTYPE html>\n"));
        assert!(output.ends_with("</html>\n"));
        assert!(output.contains("<h2>has-severity</h2>"));
        assert!(output.contains("<li title=\"hasLabels\">Rule has labels `severity`.</li>"));
        assert!(output.contains("<h2>&lt;script&gt;</h2>"));
        assert!(!output.contains("<script>"));
        assert_eq!(output.matches("<section class=\"rule\">").count(), 2);
    }
}
