//! Best-effort cleanup of HubSpot rich-text post bodies.
//!
//! This is a chain of regex removals, not an HTML parser: the result is
//! plain text with template artefacts and metadata fragments stripped.

use crate::domain::model::BlogPost;
use regex::Regex;
use std::sync::LazyLock;

/// Post fields that are dropped from rendered posts, and whose `"key":value,`
/// fragments are stripped from bodies.
pub const METADATA_KEYS: [&str; 4] = ["slug", "state", "updatedById", "useFeaturedImage"];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("cleaner patterns are valid")
}

// 順序有意義：script 規則排在標籤與換行處理之後
static REMOVALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\{%.*?%\}",
        r"\{\{.*?\}\}",
        r"<[^>]+>",
        r"\{'.*?'\}",
        r#"\{".*?"\}"#,
        r"\{.*?\}",
        r#"widget-type-space[^"]*"#,
        r#"\d+"@hubspot/[^"]*""#,
    ]
    .into_iter()
    .map(compile)
    .collect()
});

static METADATA_PAIRS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    METADATA_KEYS
        .iter()
        .map(|key| compile(&format!(r#""{}":.*?,"#, regex::escape(key))))
        .collect()
});

static NEWLINES: LazyLock<Regex> = LazyLock::new(|| compile(r"\\n|\n"));
static SCRIPT_BLOCKS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?s)<script\b[^>]*>.*?</script>"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

/// Strips placeholders, markup and metadata fragments from a post body.
/// Pure and deterministic.
pub fn clean_post_content(content: &str) -> String {
    let mut text = content.to_string();

    for re in REMOVALS.iter().chain(METADATA_PAIRS.iter()) {
        text = re.replace_all(&text, "").into_owned();
    }

    let text = NEWLINES.replace_all(&text, " ");
    let text = SCRIPT_BLOCKS.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Cleans `postBody` and drops the metadata fields from the post.
pub fn clean_post_data(mut post: BlogPost) -> BlogPost {
    if let Some(body) = post.post_body.take() {
        post.post_body = Some(clean_post_content(&body));
    }
    for key in METADATA_KEYS {
        post.extra.remove(key);
    }
    post
}
