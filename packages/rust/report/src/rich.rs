//! Rich (styled HTML) rendering capability.
//!
//! The capability is optional: it rides on the `rich-reports` cargo
//! feature, and [`probe`] is the runtime feature-probe the renderer
//! calls once per render. When the feature is compiled out the probe
//! fails and the renderer degrades to the plain-text fallback.

use landeval_shared::Result;

#[cfg(not(feature = "rich-reports"))]
use landeval_shared::LandEvalError;

/// Style sheet wrapped around every rich report.
#[cfg(feature = "rich-reports")]
const REPORT_STYLE: &str = r#"
@page {
    size: letter;
    margin: 1.5cm;
}
body {
    font-family: Arial, sans-serif;
    line-height: 1.5;
    margin: 0;
    font-size: 10pt;
}
h1 {
    color: #2c3e50;
    font-size: 18pt;
    margin-bottom: 15px;
    border-bottom: 1px solid #eee;
    padding-bottom: 8px;
}
h2 {
    color: #34495e;
    font-size: 14pt;
    margin-top: 20px;
    margin-bottom: 10px;
    border-bottom: 1px solid #eee;
    padding-bottom: 5px;
}
h3 {
    color: #7f8c8d;
    font-size: 12pt;
    margin-top: 15px;
}
ul, ol {
    margin-top: 5px;
    margin-bottom: 10px;
}
li {
    margin-bottom: 3px;
}
p {
    margin-top: 0;
    margin-bottom: 8px;
}
blockquote {
    border-left: 3px solid #ccc;
    margin-left: 0;
    padding-left: 10px;
    color: #555;
}
code {
    background-color: #f9f9f9;
    padding: 1px 3px;
    border-radius: 3px;
    font-family: monospace;
    font-size: 9pt;
}
table {
    border-collapse: collapse;
    width: 100%;
    margin: 15px 0;
    font-size: 9pt;
}
th, td {
    border: 1px solid #ddd;
    padding: 6px;
    text-align: left;
}
th {
    background-color: #f2f2f2;
    font-weight: bold;
}
tr:nth-child(even) {
    background-color: #f9f9f9;
}
.date {
    color: #7f8c8d;
    font-size: 9pt;
}
"#;

/// Probe the rich-rendering capability.
///
/// Resolved per render call; the renderer treats `Err` as "fallback only
/// for this call" rather than caching the capability as broken.
#[cfg(feature = "rich-reports")]
pub fn probe() -> Result<()> {
    Ok(())
}

/// Probe the rich-rendering capability (compiled out).
#[cfg(not(feature = "rich-reports"))]
pub fn probe() -> Result<()> {
    Err(LandEvalError::Render(
        "rich renderer not available; rebuild with the rich-reports feature".into(),
    ))
}

/// Convert a Markdown report body into a complete styled HTML document
/// with a title embedding the listing identifier.
#[cfg(feature = "rich-reports")]
pub fn to_document(text: &str, listing_id: &str, generated_on: &str) -> Result<String> {
    use pulldown_cmark::{Options, Parser, html};

    let normalized = normalize_markup(text);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(&normalized, options);
    let mut body = String::new();
    html::push_html(&mut body, parser);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Land Listing Evaluation Report - {listing_id}</title>
<style>
{REPORT_STYLE}
</style>
</head>
<body>
<h1>Land Evaluation Report: {listing_id}</h1>
<p class="date">Generated on {generated_on}</p>
{body}
</body>
</html>
"#
    ))
}

/// Light structural normalization before Markdown conversion.
///
/// Engine output sometimes arrives wrapped in a single code fence; the
/// fence would suppress all markup, so it is stripped when it encloses
/// the whole body. Trailing whitespace is trimmed per line.
#[cfg(feature = "rich-reports")]
fn normalize_markup(text: &str) -> String {
    let trimmed = text.trim();

    let unfenced = if trimmed.starts_with("```") && trimmed.ends_with("```") && trimmed.len() > 6 {
        let inner = &trimmed[3..trimmed.len() - 3];
        // Drop an optional language tag on the opening fence line.
        match inner.split_once('\n') {
            Some((first, rest)) if !first.trim().contains(' ') => rest,
            _ => inner,
        }
    } else {
        trimmed
    };

    let mut out = String::with_capacity(unfenced.len());
    for line in unfenced.lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(all(test, feature = "rich-reports"))]
mod tests {
    use super::*;

    #[test]
    fn document_embeds_listing_id_and_style() {
        let doc = to_document("## Summary\n\nGood site.", "A1", "January 01, 2026").unwrap();
        assert!(doc.contains("Land Evaluation Report: A1"));
        assert!(doc.contains("<h2>Summary</h2>"));
        assert!(doc.contains("font-family: Arial"));
        assert!(doc.contains("Generated on January 01, 2026"));
    }

    #[test]
    fn tables_are_rendered() {
        let md = "| a | b |\n| --- | --- |\n| 1 | 2 |\n";
        let doc = to_document(md, "A1", "today").unwrap();
        assert!(doc.contains("<table>"));
    }

    #[test]
    fn wrapping_fence_is_stripped() {
        let md = "```markdown\n# Report\n\nbody\n```";
        assert_eq!(normalize_markup(md), "# Report\n\nbody\n");

        // A fence that does not enclose the whole body is left alone.
        let md = "intro\n```\ncode\n```";
        assert!(normalize_markup(md).contains("```"));
    }
}
