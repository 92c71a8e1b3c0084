/**
 * PAGES HTML - Rendu des lignes du dashboard
 *
 * Gabarits statiques + format!, sans moteur de template.
 * Tout texte venant de la base passe par escape_html avant insertion.
 */

use crate::models::ViewRow;

const LAYOUT_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta http-equiv="refresh" content="60">
    <title>{title} - Vigie</title>
    <link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/3.4.1/css/bootstrap.min.css">
</head>
<body>
<nav class="navbar navbar-default">
    <div class="container">
        <a class="navbar-brand" href="/">Vigie</a>
        <ul class="nav navbar-nav">
            <li><a href="/">Current status</a></li>
            <li><a href="/most-recent">History</a></li>
        </ul>
    </div>
</nav>
<div class="container">
    <h1>{title}</h1>
"#;

const LAYOUT_FOOT: &str = r#"</div>
</body>
</html>
"#;

fn layout(title: &str, body: &str) -> String {
    let mut page = LAYOUT_HEAD.replace("{title}", &escape_html(title));
    page.push_str(body);
    page.push_str(LAYOUT_FOOT);
    page
}

fn status_label(row: &ViewRow) -> String {
    format!(
        r#"<span class="label {}">{}</span>"#,
        escape_html(&row.bs_class),
        escape_html(&row.status)
    )
}

/// Page "statut courant" : une ligne par service supervisé
pub fn render_current_status(rows: &[ViewRow]) -> String {
    if rows.is_empty() {
        return layout("Current status", r#"    <p class="text-muted">No actively checked service.</p>
"#);
    }

    let mut body = String::from(
        "    <table class=\"table table-striped\">\n        <thead><tr><th>Service</th><th>Status</th><th>Since</th></tr></thead>\n        <tbody>\n",
    );
    for row in rows {
        body.push_str(&format!(
            "            <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&row.service),
            status_label(row),
            escape_html(row.last_check.as_deref().unwrap_or("")),
        ));
    }
    body.push_str("        </tbody>\n    </table>\n");
    layout("Current status", &body)
}

/// Page "historique" : dernières transitions, plus récente en premier
pub fn render_history(rows: &[ViewRow]) -> String {
    if rows.is_empty() {
        return layout("History", r#"    <p class="text-muted">No state change recorded.</p>
"#);
    }

    let mut body = String::from(
        "    <table class=\"table table-condensed\">\n        <thead><tr><th>Date</th><th>Service</th><th>Status</th><th>Duration</th></tr></thead>\n        <tbody>\n",
    );
    for row in rows {
        body.push_str(&format!(
            "            <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(row.date_time.as_deref().unwrap_or("")),
            escape_html(&row.service),
            status_label(row),
            escape_html(row.duration.as_deref().unwrap_or("")),
        ));
    }
    body.push_str("        </tbody>\n    </table>\n");
    layout("History", &body)
}

pub fn render_error(code: u16, message: &str) -> String {
    let body = format!(
        "    <div class=\"alert alert-danger\"><strong>{code}</strong> {}</div>\n",
        escape_html(message)
    );
    layout("Error", &body)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(service: &str) -> ViewRow {
        ViewRow {
            service: service.into(),
            status: "LINES DOWN".into(),
            bs_class: "label-danger".into(),
            duration: None,
            last_check: Some("5 minutes ago".into()),
            date_time: None,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
        assert_eq!(escape_html("Line 1"), "Line 1");
    }

    #[test]
    fn test_current_status_page_keeps_row_order() {
        let html = render_current_status(&[row("Line B"), row("Line A")]);
        let b = html.find("Line B").unwrap();
        let a = html.find("Line A").unwrap();
        assert!(b < a);
        assert!(html.contains(r#"<span class="label label-danger">LINES DOWN</span>"#));
        assert!(html.contains("5 minutes ago"));
    }

    #[test]
    fn test_service_names_are_escaped() {
        let html = render_current_status(&[row("<script>alert(1)</script>")]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_history_page() {
        let mut r = row("Line 1");
        r.status = "OK".into();
        r.bs_class = "label-success".into();
        r.last_check = None;
        r.duration = Some("an hour".into());
        r.date_time = Some("14 November 2023, 22:13:20 +00:00".into());

        let html = render_history(&[r]);
        assert!(html.contains("<title>History - Vigie</title>"));
        assert!(html.contains("<td>14 November 2023, 22:13:20 +00:00</td><td>Line 1</td>"));
        assert!(html.contains("<td>an hour</td>"));
    }

    #[test]
    fn test_empty_pages() {
        assert!(render_history(&[]).contains("No state change recorded."));
        assert!(render_current_status(&[]).contains("No actively checked service."));
    }

    #[test]
    fn test_one_table_line_per_row() {
        let html = render_current_status(&[row("Line 1"), row("Line 2"), row("Line 3")]);
        let lines: Vec<&str> = html.lines().filter(|l| l.trim_start().starts_with("<tr><td>")).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.ends_with("</tr>")));
    }
}
