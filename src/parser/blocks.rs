use serde::{Deserialize, Serialize};
use url::Url;

/// A section title resolved to the page that holds its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReference {
    pub title: String,
    pub url: Url,
}

/// Key names used for heading-grouped blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingKeys {
    /// Every heading level is emitted under `heading`.
    #[default]
    Unified,
    /// h1 is emitted under `Topic`, h2/h3 under `Sub-topic`.
    Leveled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentBlock {
    Heading {
        heading: String,
        texts: Vec<String>,
    },
    Topic {
        #[serde(rename = "Topic")]
        topic: String,
        texts: Vec<String>,
    },
    SubTopic {
        #[serde(rename = "Sub-topic")]
        sub_topic: String,
        texts: Vec<String>,
    },
    Article {
        #[serde(rename = "Info", default, skip_serializing_if = "Option::is_none")]
        info: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        links: Vec<ArticleLink>,
    },
}

impl ContentBlock {
    /// Build a heading-grouped block, picking the key for `level` (1-3).
    pub fn heading(level: u8, text: String, texts: Vec<String>, keys: HeadingKeys) -> Self {
        match (keys, level) {
            (HeadingKeys::Unified, _) => ContentBlock::Heading { heading: text, texts },
            (HeadingKeys::Leveled, 1) => ContentBlock::Topic { topic: text, texts },
            (HeadingKeys::Leveled, _) => ContentBlock::SubTopic {
                sub_topic: text,
                texts,
            },
        }
    }

    pub fn texts(&self) -> &[String] {
        match self {
            ContentBlock::Heading { texts, .. }
            | ContentBlock::Topic { texts, .. }
            | ContentBlock::SubTopic { texts, .. } => texts,
            ContentBlock::Article { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleLink {
    #[serde(rename = "Sub-Topic")]
    pub subtopic: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContent {
    pub content: Vec<ContentBlock>,
}

/// One scraped section, as written to the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: String,
    pub url: String,
    pub source: String,
    /// Always a single element; kept for output compatibility.
    pub sections: Vec<SectionContent>,
}

impl PageRecord {
    pub fn new(reference: &SectionReference, source: &str, content: Vec<ContentBlock>) -> Self {
        PageRecord {
            title: reference.title.clone(),
            url: reference.url.to_string(),
            source: source.to_string(),
            sections: vec![SectionContent { content }],
        }
    }
}

// ── Tests ──
