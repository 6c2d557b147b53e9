//! Static dashboard page assembly

use bikeshare_common::escape_html;
use std::fmt::Write as _;

/// Notice shown in place of a chart whose view is empty
pub const NO_DATA_NOTICE: &str = "No data available";

/// Body of one dashboard section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContent {
    /// Inline SVG chart, with the file name of its PNG copy when one was written
    Chart {
        /// SVG document, embedded as is
        svg: String,
        /// PNG file name relative to the page
        png_file: Option<String>,
    },
    /// The view had no rows
    Empty,
}

/// A headed section of the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSection {
    /// Section title
    pub heading: String,
    /// Chart or notice
    pub content: SectionContent,
}

/// The dashboard page: a sidebar and a column of sections
#[derive(Debug, Clone, Default)]
pub struct DashboardPage {
    title: String,
    author: Option<String>,
    logo_url: Option<String>,
    sections: Vec<DashboardSection>,
}

impl DashboardPage {
    /// Empty page titled `title`
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Show "by `author`" under the title
    #[must_use]
    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    /// Show the image at `logo_url` above the title
    #[must_use]
    pub fn with_logo(mut self, logo_url: Option<String>) -> Self {
        self.logo_url = logo_url;
        self
    }

    /// Append a section
    pub fn push_section(&mut self, heading: impl Into<String>, content: SectionContent) {
        self.sections.push(DashboardSection {
            heading: heading.into(),
            content,
        });
    }

    /// Sections in page order
    pub fn sections(&self) -> &[DashboardSection] {
        &self.sections
    }

    /// Renders the complete HTML document.
    ///
    /// Headings, sidebar text and attribute values are escaped; chart markup
    /// is embedded as produced by the renderer.
    pub fn to_html(&self) -> String {
        let title = escape_html(&self.title);
        let mut html = String::with_capacity(
            4096 + self
                .sections
                .iter()
                .map(|s| match &s.content {
                    SectionContent::Chart { svg, .. } => svg.len(),
                    SectionContent::Empty => 0,
                })
                .sum::<usize>(),
        );

        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{title}</title>\n<style>\n{STYLESHEET}</style>\n</head>\n<body>\n"
        );

        html.push_str("<aside class=\"sidebar\">\n");
        if let Some(logo) = &self.logo_url {
            let _ = writeln!(
                html,
                "<img class=\"logo\" src=\"{}\" alt=\"{title}\">",
                escape_html(logo)
            );
        }
        let _ = writeln!(html, "<h1>{title}</h1>");
        if let Some(author) = &self.author {
            let _ = writeln!(html, "<h3>by {}</h3>", escape_html(author));
        }
        html.push_str("</aside>\n<main>\n");

        for section in &self.sections {
            let _ = writeln!(
                html,
                "<section>\n<h2>{}</h2>",
                escape_html(&section.heading)
            );
            match &section.content {
                SectionContent::Chart { svg, png_file } => {
                    let _ = writeln!(html, "<figure class=\"chart\">\n{}\n</figure>", strip_xml_prolog(svg));
                    if let Some(file) = png_file {
                        let file = escape_html(file);
                        let _ = writeln!(html, "<p class=\"download\"><a href=\"{file}\">{file}</a></p>");
                    }
                }
                SectionContent::Empty => {
                    let _ = writeln!(html, "<p class=\"empty\">{NO_DATA_NOTICE}</p>");
                }
            }
            html.push_str("</section>\n");
        }

        html.push_str("</main>\n</body>\n</html>\n");
        html
    }
}

/// Drops a leading `<?xml ...?>` declaration, which has no meaning inside HTML
fn strip_xml_prolog(svg: &str) -> &str {
    let trimmed = svg.trim_start();
    trimmed
        .strip_prefix("<?xml")
        .and_then(|rest| rest.find("?>").map(|end| rest[end + 2..].trim_start()))
        .unwrap_or(trimmed)
}

const STYLESHEET: &str = "body { margin: 0; display: flex; font-family: sans-serif; background: #FFFFFF; color: #262730; }
.sidebar { width: 260px; min-height: 100vh; padding: 24px; box-sizing: border-box; background: #F0F2F6; }
.sidebar .logo { max-width: 100%; border-radius: 8px; }
main { flex: 1; padding: 24px 48px; }
section { margin-bottom: 48px; }
figure.chart { margin: 0; }
figure.chart svg { max-width: 100%; height: auto; }
p.empty { padding: 16px; background: #FFF4E5; border-radius: 4px; }
";
