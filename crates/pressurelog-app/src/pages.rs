//! HTML rendering
//!
//! Pure functions from a view model to markup, so handlers stay thin and the
//! output is testable without a server.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use pressurelog_core::datalog::LogEntry;
use pressurelog_core::unit_conversion::psi_to_kpa;

const STYLE: &str = r#"
      body {
          font-family: Arial, sans-serif;
          text-align: center;
          margin: 0;
          padding: 20px;
          background-color: #f5f5f5;
      }
      h2 { color: #333; }
      form, .panel {
          background-color: #fff;
          padding: 15px;
          margin-bottom: 20px;
          border-radius: 8px;
          box-shadow: 0 0 10px rgba(0,0,0,0.1);
      }
      input[type="text"], input[type="time"], input[type="date"] {
          padding: 10px;
          font-size: 16px;
          width: 100%;
          margin-bottom: 10px;
          border: 1px solid #ccc;
          border-radius: 4px;
      }
      button {
          padding: 10px 20px;
          font-size: 16px;
          background-color: #007BFF;
          color: white;
          border: none;
          border-radius: 4px;
          cursor: pointer;
      }
      button:hover { background-color: #0056b3; }
      button.danger { background-color: red; }
      table { margin: 0 auto; border-collapse: collapse; }
      td, th { padding: 4px 12px; border-bottom: 1px solid #ddd; }
      .error { color: #b00020; }
"#;

/// Everything the index page shows
#[derive(Debug)]
pub struct IndexView<'a> {
    pub now: NaiveDateTime,
    pub message: &'a str,
    pub live_psi: Option<f64>,
    pub last_save_error: Option<&'a str>,
    pub entries: &'a [LogEntry],
    pub capacity: usize,
    pub build_id: &'a str,
}

/// Escape text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// One history table row
pub fn render_row(entry: &LogEntry) -> String {
    let t = entry.timestamp();
    format!(
        "<tr><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
        t.format("%Y-%m-%d"),
        t.format("%H:%M"),
        entry.value()
    )
}

/// Render the index page
pub fn render_index(view: &IndexView<'_>) -> String {
    let mut html = String::with_capacity(4096 + view.entries.len() * 64);

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Pressure Logger</title>
  <style>{STYLE}</style>
</head>
<body>
  <div class="panel">
    <h2>{message}</h2>
    <p>{now}</p>
"#,
        message = escape_html(view.message),
        now = view.now.format("%d/%m/%y %H:%M:%S"),
    );

    match view.live_psi {
        Some(psi) => {
            let _ = writeln!(
                html,
                "    <p>P: {:.2} PSI ({:.1} kPa)</p>",
                psi,
                psi_to_kpa(psi)
            );
        }
        None => html.push_str("    <p>P: --</p>\n"),
    }

    if let Some(error) = view.last_save_error {
        let _ = writeln!(
            html,
            "    <p class=\"error\">Last save failed: {}</p>",
            escape_html(error)
        );
    }

    let _ = write!(
        html,
        r#"  </div>

  <h2>Set Date and Time</h2>
  <form action="/set-time" method="GET">
    <input type="date" name="date" value="{date}" required>
    <input type="time" name="time" value="{time}" required>
    <button type="submit">Update Date and Time</button>
  </form>

  <h2>Custom Message</h2>
  <form action="/set-message" method="GET">
    <input type="text" name="message" maxlength="20" placeholder="Message (max 20)" required>
    <button type="submit">Update Message</button>
  </form>

  <h2>Pressure History ({count}/{capacity})</h2>
  <table>
    <tr><th>Date</th><th>Time</th><th>Pressure (PSI)</th></tr>
"#,
        date = view.now.format("%Y-%m-%d"),
        time = view.now.format("%H:%M"),
        count = view.entries.len(),
        capacity = view.capacity,
    );

    for entry in view.entries {
        html.push_str("    ");
        html.push_str(&render_row(entry));
        html.push('\n');
    }

    let _ = write!(
        html,
        r#"  </table>
  <br><br>
  <form action="/download" method="GET">
    <button type="submit">Download CSV</button>
  </form>
  <form action="/clear-log" method="GET" onsubmit="return confirm('Clear the pressure history?');">
    <button type="submit" class="danger">Clear History</button>
  </form>
  <p><small>build {build_id}</small></p>
</body>
</html>
"#,
        build_id = escape_html(view.build_id),
    );

    html
}
