//! Document shell around the streamed regions.

use crate::escape::escape_html;

/// Head content for the shell.
#[derive(Debug, Clone, Default)]
pub struct HeadContent {
    pub title: Option<String>,
    /// `<meta name content>` pairs.
    pub meta: Vec<(String, String)>,
    /// Raw link and style tags.
    pub links: Vec<String>,
    /// Inline scripts.
    pub scripts: Vec<String>,
}

impl HeadContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.meta.push((name.to_string(), content.to_string()));
        self
    }

    pub fn with_stylesheet(mut self, href: &str) -> Self {
        self.links.push(format!(
            r#"<link rel="stylesheet" href="{}">"#,
            escape_html(href)
        ));
        self
    }

    pub fn with_style(mut self, css: &str) -> Self {
        self.links.push(format!("<style>{}</style>", css));
        self
    }

    pub fn with_script(mut self, js: &str) -> Self {
        self.scripts.push(js.to_string());
        self
    }

    pub fn render(&self) -> String {
        let mut html = String::from("<meta charset=\"utf-8\">\n");

        if let Some(title) = &self.title {
            html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        }
        for (name, content) in &self.meta {
            html.push_str(&format!(
                "<meta name=\"{}\" content=\"{}\">\n",
                escape_html(name),
                escape_html(content)
            ));
        }
        for link in &self.links {
            html.push_str(link);
            html.push('\n');
        }
        for script in &self.scripts {
            html.push_str(&format!("<script>{}</script>\n", script));
        }

        html
    }
}

/// The page chrome: everything before and after the regions.
#[derive(Debug, Clone)]
pub struct Shell {
    pub lang: String,
    pub head: HeadContent,
    /// HTML before the regions (opening body, navigation, wrappers).
    pub body_start: String,
    /// HTML after the regions.
    pub body_end: String,
}

impl Shell {
    pub fn new(head: HeadContent) -> Self {
        Self {
            lang: "en".to_string(),
            head,
            body_start: "<body>\n<main>\n".to_string(),
            body_end: "</main>\n</body>\n".to_string(),
        }
    }

    pub fn with_body_start(mut self, html: impl Into<String>) -> Self {
        self.body_start = html.into();
        self
    }

    pub fn with_body_end(mut self, html: impl Into<String>) -> Self {
        self.body_end = html.into();
        self
    }

    /// Everything up to the first region.
    pub fn render_opening(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n{}</head>\n{}",
            escape_html(&self.lang),
            self.head.render(),
            self.body_start
        )
    }

    /// Everything after the last region.
    pub fn render_closing(&self) -> String {
        format!("{}</html>\n", self.body_end)
    }
}
