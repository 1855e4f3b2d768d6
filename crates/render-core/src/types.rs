use serde::{Deserialize, Serialize};

/// One render call's input: the model's markdown plus caller-supplied header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub title: String,
    /// Header metadata such as the generation date or subject fields. A `\n`
    /// inside a line is a hard line break, not a new paragraph.
    #[serde(default)]
    pub info_lines: Vec<String>,
    pub markdown: String,
}

impl Report {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_info_line(mut self, line: impl Into<String>) -> Self {
        self.info_lines.push(line.into());
        self
    }

    /// The whole report as one markdown text, header first, for backends
    /// that only take markdown. Info-line breaks become markdown hard breaks.
    pub fn to_markdown_document(&self) -> String {
        let mut out = String::new();
        if !self.title.trim().is_empty() {
            out.push_str("# ");
            out.push_str(self.title.trim());
            out.push_str("\n\n");
        }
        for line in &self.info_lines {
            out.push_str(&line.replace('\n', "  \n"));
            out.push_str("\n\n");
        }
        out.push_str(&self.markdown);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_document_embeds_header() {
        let report = Report::new("## Section\nBody")
            .with_title("Annual Report")
            .with_info_line("Date: 2025-06-01\nName: Ada");
        assert_eq!(
            report.to_markdown_document(),
            "# Annual Report\n\nDate: 2025-06-01  \nName: Ada\n\n## Section\nBody"
        );
    }

    #[test]
    fn test_markdown_document_without_header_is_unchanged() {
        let report = Report::new("plain");
        assert_eq!(report.to_markdown_document(), "plain");
    }

    #[test]
    fn test_report_deserializes_from_json() {
        let report: Report = serde_json::from_str(
            r#"{"title": "T", "infoLines": ["a"], "markdown": "- x"}"#,
        )
        .unwrap();
        assert_eq!(report.info_lines, vec!["a".to_string()]);
        assert_eq!(report.markdown, "- x");
    }
}
