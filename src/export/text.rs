use crate::schemas::{
    META_AUDIENCE, META_GENERATED_AT, META_LOCATION, META_NICHE, META_PLATFORM, QueryResult,
};

pub const DOCUMENT_TITLE: &str = "KEY QUESTIONS FOR NICHE RESEARCH";
pub const DIVIDER: &str = "---------------------------------------------";

/// The five header lines shared by the TXT and PDF exports.
pub fn header_lines(result: &QueryResult) -> [String; 5] {
    let meta = &result.metadata;
    [
        format!("Niche: {}", meta.value_or_empty(META_NICHE)),
        format!("Audience: {}", meta.value_or_empty(META_AUDIENCE)),
        format!("Location: {}", meta.value_or_empty(META_LOCATION)),
        format!("Platform: {}", meta.value_or_empty(META_PLATFORM)),
        format!("Generated: {}", meta.value_or_empty(META_GENERATED_AT)),
    ]
}

pub fn render_text(result: &QueryResult) -> String {
    let mut out = String::new();
    out.push_str(DOCUMENT_TITLE);
    out.push_str("\n\n");
    for line in header_lines(result) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(DIVIDER);
    out.push_str("\n\n");

    for (index, item) in result.questions.iter().enumerate() {
        out.push_str(&format!("{}. ", index + 1));
        if let Some(title) = &item.title {
            out.push_str(title);
            out.push('\n');
        }
        out.push_str(&item.question);
        out.push_str("\n\n");
        if let Some(context) = &item.context {
            out.push_str(context);
            out.push_str("\n\n");
        }
        out.push_str(DIVIDER);
        out.push_str("\n\n");
    }

    out
}
