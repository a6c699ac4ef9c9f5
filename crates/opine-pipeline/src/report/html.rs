use std::fmt::Write as _;

use super::{Report, FAILURE_KEYS, STAGE_KEYS};

const MAX_SCORE: f64 = 5.0;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;margin:1rem 0}\
th,td{border:1px solid #ccc;padding:.3rem .6rem;text-align:left;font-size:.9rem}\
th{background:#f3f3f3}\
.chart{max-width:40rem}\
.bar-row{display:flex;align-items:center;margin:.3rem 0}\
.bar-label{width:12rem;font-size:.9rem}\
.bar-track{flex:1;background:#eee;height:1.2rem}\
.bar{background:#3b7dd8;height:100%}\
.bar-value{width:4rem;text-align:right;font-size:.9rem}";

/// Render `report` as a self-contained HTML page.
///
/// `input_label` names the file the report was built from.
#[must_use]
pub fn render_html(report: &Report, input_label: &str) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Opinion Dashboard</title>\n");
    let _ = writeln!(out, "<style>{STYLE}</style>");
    out.push_str("</head>\n<body>\n<h1>Opinion Dashboard</h1>\n");
    let _ = writeln!(
        out,
        "<p>{} scored documents from <code>{}</code>, {} scoring failures.</p>",
        report.rows.len(),
        escape(input_label),
        report.failures.len()
    );

    out.push_str("<h2>Average scores</h2>\n<div class=\"chart\">\n");
    for metric in &report.means {
        let Some(mean) = metric.mean else {
            let _ = writeln!(
                out,
                "<div class=\"bar-row\"><span class=\"bar-label\">{}</span><span class=\"bar-value\">n/a</span></div>",
                escape(metric.metric)
            );
            continue;
        };
        let width = (mean / MAX_SCORE * 100.0).clamp(0.0, 100.0);
        let _ = writeln!(
            out,
            "<div class=\"bar-row\"><span class=\"bar-label\">{}</span>\
             <span class=\"bar-track\"><span class=\"bar\" style=\"display:block;width:{width:.1}%\"></span></span>\
             <span class=\"bar-value\">{mean:.2}</span></div>",
            escape(metric.metric)
        );
    }
    out.push_str("</div>\n");

    out.push_str("<h2>Documents</h2>\n<table>\n<thead><tr><th>collection</th>");
    for column in &report.columns {
        let _ = write!(out, "<th>{}</th>", escape(column));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &report.rows {
        let _ = write!(out, "<tr><td>{}</td>", escape(row.collection));
        for cell in &row.cells {
            let _ = write!(out, "<td>{}</td>", escape(cell.as_deref().unwrap_or("")));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");

    push_section_table(&mut out, "Pipeline stages", STAGE_KEYS, &report.stages);
    push_section_table(&mut out, "Scoring failures", FAILURE_KEYS, &report.failures);

    out.push_str("</body>\n</html>\n");
    out
}

fn push_section_table<const N: usize>(
    out: &mut String,
    title: &str,
    headers: [&str; N],
    rows: &[[String; N]],
) {
    if rows.is_empty() {
        return;
    }
    let _ = write!(out, "<h2>{}</h2>\n<table>\n<thead><tr>", escape(title));
    for header in headers {
        let _ = write!(out, "<th>{}</th>", escape(header));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::build_report;
    use super::*;

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn page_contains_table_and_chart() {
        let report = build_report(&json!({
            "articles": [{
                "work_flexibility": 4, "burnout_risk": 2, "remote_work_appeal": 5,
                "productivity_impact": 4, "overall_sentiment": 4,
                "source": "https://example.com/<article>"
            }],
            "stages": [{ "stage": "quantification", "documents": 1, "average_sentiment": 4.0 }]
        }));
        let page = render_html(&report, "opinions.json");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<th>work_flexibility</th>"));
        assert!(page.contains("https://example.com/&lt;article&gt;"));
        assert!(page.contains("width:100.0%"), "remote_work_appeal bar should be full");
        assert!(page.contains("width:80.0%"));
        assert!(page.contains("<h2>Pipeline stages</h2>"));
        assert!(page.contains("<th>average_sentiment</th>"));
        assert!(page.contains("<td>quantification</td><td>1</td><td>4.0</td>"));
        assert!(!page.contains("<h2>Scoring failures</h2>"));
        assert!(!page.contains("<script"));
    }

    #[test]
    fn empty_report_marks_metrics_unavailable() {
        let page = render_html(&build_report(&serde_json::Value::Null), "missing.json");
        assert!(page.contains("0 scored documents"));
        assert_eq!(page.matches("n/a").count(), 5);
    }
}
