//! Plain text to Confluence storage format.

/// Escapes `text` and wraps each blank-line separated paragraph in `<p>`,
/// keeping single line breaks as `<br/>`.
#[must_use]
pub fn to_storage_format(text: &str) -> String {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let lines: Vec<String> = p.lines().map(escape).collect();
            format!("<p>{}</p>", lines.join("<br/>"))
        })
        .collect()
}

fn escape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_and_breaks() {
        let text = "Problem: pods crash\n\nSolution:\n1. raise memory limit\n2. redeploy";
        assert_eq!(
            to_storage_format(text),
            "<p>Problem: pods crash</p><p>Solution:<br/>1. raise memory limit<br/>2. redeploy</p>"
        );
    }

    #[test]
    fn test_markup_is_escaped() {
        assert_eq!(
            to_storage_format("use <T> & \"quotes\""),
            "<p>use &lt;T&gt; &amp; &quot;quotes&quot;</p>"
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(to_storage_format("  \n\n "), "");
    }
}
