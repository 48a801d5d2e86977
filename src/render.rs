//! Terminal view of a generation run.

use crossterm::style::Stylize;

use crate::schemas::{Metadata, QueryResult, QuestionItem};

/// What the CLI shows: a status line, question blocks, metadata list and
/// whether exports are available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultView {
    pub loading: bool,
    pub status: Option<String>,
    pub question_blocks: Vec<String>,
    pub metadata_entries: Vec<String>,
    pub exports_enabled: bool,
}

#[derive(Debug, Default)]
pub struct ResultRenderer {
    styled: bool,
    view: ResultView,
}

impl ResultRenderer {
    pub fn new(styled: bool) -> Self {
        Self {
            styled,
            view: ResultView::default(),
        }
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    /// Clear previous output and show the loading indicator.
    pub fn begin_loading(&mut self) {
        self.view = ResultView {
            loading: true,
            ..Default::default()
        };
    }

    /// Replace rendered questions; one block per item, in order.
    pub fn render_questions(&mut self, questions: &[QuestionItem]) {
        self.view.question_blocks = questions.iter().map(|q| self.question_block(q)).collect();
    }

    fn question_block(&self, item: &QuestionItem) -> String {
        let mut segments = Vec::with_capacity(3);
        if let Some(title) = &item.title {
            segments.push(if self.styled {
                title.as_str().bold().cyan().to_string()
            } else {
                title.clone()
            });
        }
        segments.push(if self.styled {
            item.question.as_str().bold().to_string()
        } else {
            item.question.clone()
        });
        if let Some(context) = &item.context {
            segments.push(if self.styled {
                context.as_str().dim().to_string()
            } else {
                context.clone()
            });
        }
        segments.join("\n")
    }

    /// Replace the metadata list with one `Key: value` entry per pair.
    pub fn render_metadata(&mut self, metadata: &Metadata) {
        self.view.metadata_entries = metadata
            .iter()
            .map(|(key, value)| {
                let label = format!("{}:", humanize_key(key));
                if self.styled {
                    format!("{} {}", label.as_str().bold(), value)
                } else {
                    format!("{} {}", label, value)
                }
            })
            .collect();
    }

    /// Show a successful result and enable exports.
    pub fn render_result(&mut self, result: &QueryResult) {
        self.view.loading = false;
        self.view.status = None;
        self.render_questions(&result.questions);
        self.render_metadata(&result.metadata);
        self.view.exports_enabled = true;
    }

    /// Replace the loading indicator with a message. Exports stay disabled.
    pub fn render_error(&mut self, message: impl Into<String>) {
        self.view.loading = false;
        self.view.status = Some(message.into());
        self.view.exports_enabled = false;
    }

    /// Status message that leaves the rest of the view untouched.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.view.status = Some(message.into());
    }

    /// Printable form of the whole view.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.view.loading {
            out.push_str("Generating questions...\n");
        }
        if let Some(status) = &self.view.status {
            out.push_str(status);
            out.push('\n');
        }
        for block in &self.view.question_blocks {
            out.push('\n');
            out.push_str(block);
            out.push('\n');
        }
        if !self.view.metadata_entries.is_empty() {
            out.push('\n');
            for entry in &self.view.metadata_entries {
                out.push_str("  - ");
                out.push_str(entry);
                out.push('\n');
            }
        }
        if self.view.exports_enabled {
            out.push_str("\nExport with: json | txt | pdf\n");
        }
        out
    }
}

/// Capitalize the first letter and replace the first underscore with a space.
///
/// Only the first underscore is replaced: `fecha_de_generacion` becomes
/// `Fecha de_generacion`.
pub fn humanize_key(key: &str) -> String {
    let mut chars = key.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    capitalized.replacen('_', " ", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_replaces_only_first_underscore() {
        assert_eq!(humanize_key("fecha_generacion"), "Fecha generacion");
        assert_eq!(humanize_key("fecha_de_generacion"), "Fecha de_generacion");
        assert_eq!(humanize_key("nicho"), "Nicho");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn questions_render_in_order_with_optional_segments() {
        let mut renderer = ResultRenderer::new(false);
        renderer.render_questions(&[
            QuestionItem::new("Q1?").with_title("T1").with_context("C1"),
            QuestionItem::new("Q2?"),
            QuestionItem::new("Q1?").with_title("T1").with_context("C1"),
        ]);
        let blocks = &renderer.view().question_blocks;
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], "T1\nQ1?\nC1");
        assert_eq!(blocks[1], "Q2?");
        assert_eq!(blocks[2], blocks[0]);
    }

    #[test]
    fn render_questions_replaces_previous_content() {
        let mut renderer = ResultRenderer::new(false);
        renderer.render_questions(&[QuestionItem::new("a"), QuestionItem::new("b")]);
        renderer.render_questions(&[QuestionItem::new("c")]);
        assert_eq!(renderer.view().question_blocks, vec!["c".to_string()]);
    }

    #[test]
    fn metadata_entries_are_humanized() {
        let mut renderer = ResultRenderer::new(false);
        let metadata: Metadata = [("nicho", "yoga"), ("fecha_generacion", "2024-01-01")]
            .into_iter()
            .collect();
        renderer.render_metadata(&metadata);
        assert_eq!(
            renderer.view().metadata_entries,
            vec!["Nicho: yoga", "Fecha generacion: 2024-01-01"]
        );
    }

    #[test]
    fn error_disables_exports_and_clears_loading() {
        let mut renderer = ResultRenderer::new(false);
        renderer.begin_loading();
        assert!(renderer.view().loading);
        renderer.render_error("boom");
        assert!(!renderer.view().loading);
        assert!(!renderer.view().exports_enabled);
        assert!(renderer.to_text().contains("boom"));
    }
}
