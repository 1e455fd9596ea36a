//! HTML rendering
//!
//! Server-rendered pages for the portal:
//! - Page shell with the navigation sidebar
//! - "Register Patient" and "Get Report" forms with their result areas
//! - The interactive report view

pub mod pages;
pub mod report;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const APP_NAME: &str = "ECGenius";

/// Severity of a message shown in a result area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    fn css_class(&self) -> &'static str {
        match self {
            Level::Success => "notice success",
            Level::Info => "notice info",
            Level::Warning => "notice warning",
            Level::Error => "notice error",
        }
    }
}

/// One user-facing message, optionally followed by detail text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub text: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Notice {
            level,
            text: text.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if !detail.is_empty() {
            self.detail = Some(detail);
        }
        self
    }

    pub fn render(&self) -> String {
        let detail = self
            .detail
            .as_deref()
            .map(|d| format!("<pre class=\"detail\">{}</pre>", escape_html(d)))
            .unwrap_or_default();
        format!(
            "<div class=\"{}\"><p>{}</p>{}</div>",
            self.level.css_class(),
            escape_html(&self.text),
            detail
        )
    }
}

/// Which view the sidebar marks as current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Register,
    Report,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Register => "/register",
            View::Report => "/report",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Register => "Register Patient",
            View::Report => "Get Report",
        }
    }
}

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

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

const STYLE: &str = "
body { font-family: sans-serif; margin: 0; display: flex; color: #262730; }
nav { width: 14rem; min-height: 100vh; background: #f0f2f6; padding: 1.5rem; }
nav a { display: block; padding: .4rem 0; color: #262730; text-decoration: none; }
nav a.current { font-weight: bold; }
main { max-width: 46rem; padding: 2rem 3rem; flex: 1; }
label { display: block; margin-top: .8rem; }
input, select, textarea { width: 100%; padding: .4rem; box-sizing: border-box; }
button { margin-top: 1rem; padding: .5rem 1.2rem; }
.notice { padding: .6rem 1rem; border-radius: .4rem; margin: .6rem 0; }
.notice p { margin: 0; }
.success { background: #dff5e3; } .info { background: #e0ecfb; }
.warning { background: #fff4d6; } .error { background: #fde2e2; }
.detail { white-space: pre-wrap; margin: .4rem 0 0; }
.columns { display: flex; gap: 2rem; } .columns > div { flex: 1; }
.conditions { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; }
img.waveform { max-width: 100%; }
.caption { color: #6b6f76; font-size: .9rem; }
";

/// Wrap `content` in the full page with the navigation sidebar.
pub fn page_shell(current: View, content: &str) -> String {
    let nav: String = [View::Register, View::Report]
        .iter()
        .map(|view| {
            let class = if *view == current { " class=\"current\"" } else { "" };
            format!("<a href=\"{}\"{}>{}</a>", view.path(), class, view.label())
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{app} Portal</title>\n<style>{style}</style>\n</head>\n<body>\n\
         <nav><h2>{app}</h2><p>Navigation</p>{nav}</nav>\n<main>\n{content}\n</main>\n</body>\n</html>\n",
        app = APP_NAME,
        style = STYLE,
        nav = nav,
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri("text/plain", b"hi"), "data:text/plain;base64,aGk=");
    }

    #[test]
    fn test_notice_escapes_and_skips_empty_detail() {
        let notice = Notice::new(Level::Error, "<oops>").with_detail("");
        assert_eq!(notice.render(), "<div class=\"notice error\"><p>&lt;oops&gt;</p></div>");
    }

    #[test]
    fn test_shell_marks_current_view() {
        let html = page_shell(View::Report, "<p>body</p>");
        assert!(html.contains("<a href=\"/report\" class=\"current\">Get Report</a>"));
        assert!(html.contains("<a href=\"/register\">Register Patient</a>"));
        assert!(html.contains("<p>body</p>"));
    }
}
