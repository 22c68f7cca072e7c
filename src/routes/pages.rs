// ABOUTME: Minimal server-rendered HTML pages for the browser flow
// ABOUTME: Escapes every value that originates from the HR API before rendering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::response::Html;
use html_escape::encode_text;

use crate::models::UserRecord;

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    ))
}

/// Landing page with the action available to the session
#[must_use]
pub fn home(logged_in: bool) -> Html<String> {
    let body = if logged_in {
        "<h1>HR Sync</h1>\n\
         <p>You are connected to the HR system.</p>\n\
         <p><a href=\"/fetch\">Fetch record</a></p>\n\
         <p><a href=\"/logout\">Log out</a></p>"
    } else {
        "<h1>HR Sync</h1>\n\
         <p>Connect your HR account to import your record.</p>\n\
         <p><a href=\"/login\">Log in</a></p>"
    };
    layout("HR Sync", body)
}

/// Confirmation that the fetched record was stored
#[must_use]
pub fn user_saved(record: &UserRecord) -> Html<String> {
    let body = format!(
        "<h1>Record saved</h1>\n\
         <table>\n\
         <tr><th>ID</th><td>{}</td></tr>\n\
         <tr><th>External ID</th><td>{}</td></tr>\n\
         <tr><th>First name</th><td>{}</td></tr>\n\
         <tr><th>Last name</th><td>{}</td></tr>\n\
         <tr><th>First stored</th><td>{}</td></tr>\n\
         <tr><th>Last fetched</th><td>{}</td></tr>\n\
         </table>\n\
         <p><a href=\"/\">Back</a></p>",
        record.id,
        encode_text(&record.external_id),
        encode_text(&record.first_name),
        encode_text(&record.last_name),
        record.created_at.to_rfc3339(),
        record.fetched_at.to_rfc3339(),
    );
    layout("Record saved", &body)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_home_links() {
        assert!(home(false).0.contains("href=\"/login\""));
        let logged_in = home(true).0;
        assert!(logged_in.contains("href=\"/fetch\""));
        assert!(logged_in.contains("href=\"/logout\""));
        assert!(!logged_in.contains("href=\"/login\""));
    }

    #[test]
    fn test_user_saved_escapes_remote_values() {
        let now = Utc::now();
        let record = UserRecord {
            id: 7,
            external_id: "emp-1".to_owned(),
            first_name: "<script>alert(1)</script>".to_owned(),
            last_name: "O'Neil & Sons".to_owned(),
            created_at: now,
            fetched_at: now,
        };
        let html = user_saved(&record).0;
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; Sons"));
    }
}
