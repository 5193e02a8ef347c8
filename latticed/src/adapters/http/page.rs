// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::types::{ConsolePage, JobRowView, RowAction};

/// Minimal escaper for text interpolated into markup or attribute values.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page_shell(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>lattice console</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; margin: 2em; }}\n\
         table {{ border-collapse: collapse; }}\n\
         th, td {{ border: 1px solid #999; padding: 0.3em 0.8em; }}\n\
         .notice {{ color: #060; }}\n\
         .error {{ color: #a00; }}\n\
         </style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

fn action_cell(action: &RowAction) -> String {
    match action {
        RowAction::Download { href } => {
            format!(
                "<a href=\"{}\">download</a>",
                html_escape(href)
            )
        }
        RowAction::Cancel { owner, job } => format!(
            "<form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\
             <input type=\"hidden\" name=\"usr_name\" value=\"{}\">\
             <input type=\"hidden\" name=\"job_name\" value=\"{}\">\
             <input type=\"hidden\" name=\"cancel_job\" value=\"1\">\
             <button type=\"submit\">cancel</button></form>",
            html_escape(owner),
            html_escape(job),
        ),
        RowAction::Unavailable => "N/A".to_string(),
    }
}

fn job_row(row: &JobRowView) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        html_escape(&row.record.submitted_at),
        html_escape(&row.record.owner),
        html_escape(&row.record.name),
        row.record.status.as_str(),
        action_cell(&row.action),
    )
}

fn job_table(rows: &[JobRowView]) -> String {
    let mut out = String::new();
    out.push_str(
        "<table>\n<tr><th>submitted</th><th>owner</th><th>job</th>\
         <th>status</th><th>result</th></tr>\n",
    );
    for row in rows {
        out.push_str(&job_row(row));
    }
    out.push_str("</table>\n");
    out
}

fn submission_form(owner: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n\
         <p><label>owner <input type=\"text\" name=\"usr_name\" value=\"{owner}\"></label></p>\n\
         <p><label>job name <input type=\"text\" name=\"job_name\"></label></p>\n\
         <p><label>edge list (.tsv) <input type=\"file\" name=\"sif_file\"></label></p>\n\
         <p><label>algorithm <select name=\"cf_algo\">\
         <option value=\"louvain\">louvain</option>\
         <option value=\"leading_eigenvector\">leading eigenvector</option>\
         </select></label></p>\n\
         <p><label>min subgraph vertices <input type=\"number\" name=\"min_vertices\" value=\"3\"></label></p>\n\
         <p><label>key regulator bin width <input type=\"number\" name=\"bin_width\" value=\"50\"></label></p>\n\
         <p><label>output format <select name=\"output_format\">\
         <option value=\"edgelist\">edge list (tsv)</option>\
         <option value=\"json\">json</option>\
         </select></label></p>\n\
         <p><button type=\"submit\" name=\"search_only\" value=\"0\">submit job</button>\n\
         <button type=\"submit\" name=\"search_only\" value=\"1\">search jobs</button></p>\n\
         </form>\n",
        owner = html_escape(owner),
    )
}

pub fn render_console(page: &ConsolePage) -> String {
    let mut body = String::new();
    body.push_str("<h1>lattice console</h1>\n");
    if let Some(notice) = &page.notice {
        body.push_str(&format!("<p class=\"notice\">{}</p>\n", html_escape(notice)));
    }
    body.push_str(&format!(
        "<p>jobs for <strong>{}</strong></p>\n",
        html_escape(&page.owner)
    ));
    body.push_str(&job_table(&page.rows));
    body.push_str(&submission_form(&page.owner));
    page_shell(&body)
}

pub fn render_error(message: &str) -> String {
    let body = format!(
        "<h1>lattice console</h1>\n<p class=\"error\">{}</p>\n\
         <p><a href=\"/\">back to the console</a></p>\n",
        html_escape(message)
    );
    page_shell(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::types::{JobRecord, JobStatus};

    fn row(status: JobStatus, action: RowAction) -> JobRowView {
        JobRowView {
            record: JobRecord {
                submitted_at: "2024-01-01".to_string(),
                owner: "alice".to_string(),
                name: "run1".to_string(),
                status,
            },
            action,
        }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            html_escape("<b>&\"'</b>"),
            "&lt;b&gt;&amp;&quot;&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn console_page_contains_status_label_and_form() {
        let page = ConsolePage {
            owner: "alice".to_string(),
            rows: vec![row(JobStatus::Running, RowAction::Unavailable)],
            notice: None,
        };
        let html = render_console(&page);
        assert!(html.contains("Running"));
        assert!(html.contains("name=\"usr_name\" value=\"alice\""));
        assert!(html.contains("name=\"sif_file\""));
    }

    #[test]
    fn download_action_renders_a_link() {
        let page = ConsolePage {
            owner: "alice".to_string(),
            rows: vec![row(
                JobStatus::Finished,
                RowAction::Download {
                    href: "upload/output_123/".to_string(),
                },
            )],
            notice: None,
        };
        let html = render_console(&page);
        assert!(html.contains("href=\"upload/output_123/\""));
    }

    #[test]
    fn cancel_action_renders_a_cancel_form() {
        let page = ConsolePage {
            owner: "alice".to_string(),
            rows: vec![row(
                JobStatus::Unknown,
                RowAction::Cancel {
                    owner: "N/A".to_string(),
                    job: "N/A".to_string(),
                },
            )],
            notice: None,
        };
        let html = render_console(&page);
        assert!(html.contains("name=\"cancel_job\" value=\"1\""));
        assert!(html.contains("name=\"usr_name\" value=\"N/A\""));
    }

    #[test]
    fn owner_value_is_escaped_in_the_form() {
        let page = ConsolePage {
            owner: "\"><script>".to_string(),
            rows: Vec::new(),
            notice: None,
        };
        let html = render_console(&page);
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn error_page_carries_the_message() {
        let html = render_error("scheduler exited with code 2");
        assert!(html.contains("scheduler exited with code 2"));
        assert!(html.contains("class=\"error\""));
    }
}
