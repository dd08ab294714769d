use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::parser::blocks::PageRecord;

/// Pretty-printed (2-space) JSON; non-ASCII text is written literally.
pub fn to_json(records: &[PageRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

pub fn write_records(path: &Path, records: &[PageRecord]) -> Result<()> {
    let json = to_json(records).context("Failed to serialize records")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    info!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::blocks::{ArticleLink, ContentBlock, SectionReference};
    use url::Url;

    fn sample() -> Vec<PageRecord> {
        let react = SectionReference {
            title: "Describing the UI".into(),
            url: Url::parse("https://react.dev/learn/describing-the-ui").unwrap(),
        };
        let aws = SectionReference {
            title: "Example apps".into(),
            url: Url::parse("https://docs.aws.amazon.com/lambda/latest/dg/example-apps.html").unwrap(),
        };
        vec![
            PageRecord::new(
                &react,
                "react",
                vec![ContentBlock::Article {
                    info: Some("Café – déjà vu".into()),
                    links: vec![ArticleLink {
                        subtopic: "Your first component".into(),
                        link: "https://react.dev/learn/your-first-component".into(),
                    }],
                }],
            ),
            PageRecord::new(
                &aws,
                "aws_lambda",
                vec![
                    ContentBlock::Heading {
                        heading: "Example apps".into(),
                        texts: vec!["Try these.".into()],
                    },
                    ContentBlock::SubTopic {
                        sub_topic: "File processing".into(),
                        texts: vec![],
                    },
                ],
            ),
        ]
    }

    #[test]
    fn round_trip() {
        let records = sample();
        let json = to_json(&records).unwrap();
        let back: Vec<PageRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn non_ascii_written_literally() {
        let json = to_json(&sample()).unwrap();
        assert!(json.contains("Café – déjà vu"));
        assert!(!json.contains("\\u00e9"));
    }

    #[test]
    fn two_space_indent_and_field_names() {
        let json = to_json(&sample()).unwrap();
        assert!(json.starts_with("[\n  {\n    \"title\": \"Describing the UI\""));
        assert!(json.contains("\"Info\""));
        assert!(json.contains("\"Sub-Topic\""));
        assert!(json.contains("\"Sub-topic\""));
        assert!(json.contains("\"sections\": [\n      {\n        \"content\""));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documentation_scraped.json");
        write_records(&path, &sample()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["sections"][0]["content"][0]["heading"], "Example apps");
    }

    #[test]
    fn empty_output_is_empty_array() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }
}
