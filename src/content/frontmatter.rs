//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A front-matter block that could not be split or deserialized
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct FrontMatterError(pub String);

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Identifiers are often written as bare numbers (`id: 42`)
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct Scalar;

    impl<'de> Visitor<'de> for Scalar {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Scalar)
}

/// Front-matter data from a blog post or project file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub summary: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "techStack", deserialize_with = "string_or_vec")]
    pub tech_stack: Vec<String>,
    #[serde(rename = "githubUrl")]
    pub github_url: Option<String>,
    #[serde(rename = "liveUrl")]
    pub live_url: Option<String>,
    pub featured: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split file text into front-matter and body.
    ///
    /// The metadata block is YAML between a leading `---` line and the next
    /// `---` line. Text without a leading delimiter has empty metadata and is
    /// returned whole as the body. The body starts right after the closing
    /// delimiter line and is otherwise untouched.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some(rest) = strip_delimiter_line(content) else {
            return Ok((FrontMatter::default(), content));
        };

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if is_delimiter(line) {
                let yaml = &rest[..offset];
                let body = &rest[offset + line.len()..];
                return Ok((Self::from_yaml(yaml)?, body));
            }
            offset += line.len();
        }

        Err(FrontMatterError(
            "front-matter block is not closed with '---'".to_string(),
        ))
    }

    fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        let value: serde_yaml::Value = serde_yaml::from_str(yaml)
            .map_err(|e| FrontMatterError(format!("invalid YAML: {}", e)))?;

        match value {
            serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value)
                .map_err(|e| FrontMatterError(format!("invalid field: {}", e))),
            serde_yaml::Value::Null => Ok(FrontMatter::default()),
            _ => Err(FrontMatterError(
                "front-matter must be a mapping of keys to values".to_string(),
            )),
        }
    }

    /// Parse the date string into a timestamp
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Returns the text after the opening delimiter line, if there is one
fn strip_delimiter_line(content: &str) -> Option<&str> {
    let (first, rest) = match content.find('\n') {
        Some(pos) => (&content[..pos], &content[pos + 1..]),
        None => (content, ""),
    };
    is_delimiter(first).then_some(rest)
}

/// Parse an ISO-8601 style date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
        // Try parsing date only
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 with an offset, normalised to UTC
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}
