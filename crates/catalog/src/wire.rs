//! Defensive decoding of pool payloads.
//!
//! The REST API's schema is inferred, not owned: endpoints disagree on the
//! response envelope and individual entries are occasionally malformed. The
//! policy is one level of tolerance per concern: an unrecognized envelope is
//! an error, a malformed entry inside a recognized envelope is skipped with
//! a warning, an unknown difficulty tag degrades to "untagged".

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use prep_core::model::{
    AnswerOption, Block, Content, Difficulty, MediaUri, OptionLabel, Question, QuestionDraft,
    QuestionId, Topic,
};

use crate::source::SourceError;

//
// ─── ENVELOPES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PoolEnvelope {
    Wrapped { data: Vec<Value> },
    WrappedObject { data: QuestionsObject },
    Named { questions: Vec<Value> },
    Bare(Vec<Value>),
}

#[derive(Debug, Deserialize)]
struct QuestionsObject {
    questions: Vec<Value>,
}

impl PoolEnvelope {
    fn into_entries(self) -> Vec<Value> {
        match self {
            PoolEnvelope::Wrapped { data } => data,
            PoolEnvelope::WrappedObject { data } => data.questions,
            PoolEnvelope::Named { questions } => questions,
            PoolEnvelope::Bare(entries) => entries,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TopicsEnvelope {
    Wrapped { data: Vec<Value> },
    Named { topics: Vec<Value> },
    Bare(Vec<Value>),
}

impl TopicsEnvelope {
    fn into_entries(self) -> Vec<Value> {
        match self {
            TopicsEnvelope::Wrapped { data } => data,
            TopicsEnvelope::Named { topics } => topics,
            TopicsEnvelope::Bare(entries) => entries,
        }
    }
}

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct QuestionDto {
    id: u64,
    #[serde(alias = "question", alias = "text")]
    prompt: ContentDto,
    options: Vec<OptionDto>,
    #[serde(rename = "correct", alias = "answer", alias = "correct_answer")]
    correct: String,
    #[serde(default)]
    explanation: Option<ContentDto>,
    #[serde(default)]
    difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OptionDto {
    label: String,
    #[serde(alias = "text", alias = "value")]
    content: ContentDto,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentDto {
    Plain(String),
    Blocks(Vec<BlockDto>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum BlockDto {
    Text {
        #[serde(alias = "text")]
        value: String,
    },
    Formula {
        #[serde(alias = "formula")]
        value: String,
    },
    Image {
        url: String,
    },
    Video {
        url: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TopicDto {
    Name(String),
    Object {
        #[serde(alias = "topic", alias = "slug")]
        name: String,
    },
}

//
// ─── MAPPING ───────────────────────────────────────────────────────────────────
//

impl ContentDto {
    fn into_content(self) -> Result<Content, String> {
        match self {
            ContentDto::Plain(text) => Content::plain(text).map_err(|e| e.to_string()),
            ContentDto::Blocks(blocks) => {
                let mut mapped = Vec::with_capacity(blocks.len());
                for block in blocks {
                    mapped.push(block.into_block()?);
                }
                Content::from_blocks(mapped).map_err(|e| e.to_string())
            }
        }
    }
}

impl BlockDto {
    fn into_block(self) -> Result<Block, String> {
        match self {
            BlockDto::Text { value } => Ok(Block::Text(value)),
            BlockDto::Formula { value } => Ok(Block::Formula(value)),
            BlockDto::Image { url } => MediaUri::parse(url)
                .map(Block::Image)
                .map_err(|e| e.to_string()),
            BlockDto::Video { url } => MediaUri::parse(url)
                .map(Block::Video)
                .map_err(|e| e.to_string()),
        }
    }
}

impl QuestionDto {
    fn into_question(self) -> Result<Question, String> {
        let prompt = self.prompt.into_content()?;
        let correct = OptionLabel::new(self.correct).map_err(|e| e.to_string())?;

        let mut options = Vec::with_capacity(self.options.len());
        for option in self.options {
            options.push(AnswerOption {
                label: OptionLabel::new(option.label).map_err(|e| e.to_string())?,
                content: option.content.into_content()?,
            });
        }

        let explanation = match self.explanation {
            None => None,
            Some(dto) => Some(dto.into_content()?),
        };

        let difficulty = self.difficulty.as_deref().and_then(|tag| {
            match tag.parse::<Difficulty>() {
                Ok(level) => Some(level),
                Err(_) => {
                    warn!(tag, "unknown difficulty tag, treating question as untagged");
                    None
                }
            }
        });

        let id = QuestionId::new(self.id);
        QuestionDraft {
            prompt,
            options,
            correct,
            explanation,
            difficulty,
        }
        .validate()
        .map(|validated| validated.assign_id(id))
        .map_err(|e| e.to_string())
    }
}

/// Decode a pool payload body into validated questions.
///
/// # Errors
///
/// Returns `SourceError::Decode` when the body matches none of the known
/// envelopes. Individual malformed entries are skipped with a warning.
pub(crate) fn decode_pool(body: &[u8]) -> Result<Vec<Question>, SourceError> {
    let envelope: PoolEnvelope =
        serde_json::from_slice(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    let entries = envelope.into_entries();
    let mut questions = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<QuestionDto>(entry)
            .map_err(|e| e.to_string())
            .and_then(QuestionDto::into_question)
        {
            Ok(question) => questions.push(question),
            Err(reason) => warn!(%reason, "skipping malformed question entry"),
        }
    }
    Ok(questions)
}

/// Decode a topics payload body.
///
/// # Errors
///
/// Returns `SourceError::Decode` for an unrecognized envelope; blank or
/// malformed entries are skipped with a warning.
pub(crate) fn decode_topics(body: &[u8]) -> Result<Vec<Topic>, SourceError> {
    let envelope: TopicsEnvelope =
        serde_json::from_slice(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    let mut topics = Vec::new();
    for entry in envelope.into_entries() {
        let name = match serde_json::from_value::<TopicDto>(entry) {
            Ok(TopicDto::Name(name) | TopicDto::Object { name }) => name,
            Err(reason) => {
                warn!(%reason, "skipping malformed topic entry");
                continue;
            }
        };
        match Topic::new(name) {
            Ok(topic) => topics.push(topic),
            Err(reason) => warn!(%reason, "skipping blank topic entry"),
        }
    }
    Ok(topics)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_QUESTION: &str = r#"{
        "id": 1,
        "prompt": "What does `typeof null` evaluate to?",
        "options": [
            {"label": "a", "content": "\"object\""},
            {"label": "b", "content": "\"null\""}
        ],
        "correct": "a",
        "difficulty": "easy"
    }"#;

    fn wrap(entries: &str, envelope: &str) -> Vec<u8> {
        match envelope {
            "data" => format!(r#"{{"data": [{entries}]}}"#).into_bytes(),
            "questions" => format!(r#"{{"questions": [{entries}]}}"#).into_bytes(),
            _ => format!("[{entries}]").into_bytes(),
        }
    }

    #[test]
    fn decodes_all_three_envelopes() {
        for envelope in ["data", "questions", "bare"] {
            let pool = decode_pool(&wrap(GOOD_QUESTION, envelope)).unwrap();
            assert_eq!(pool.len(), 1, "envelope {envelope}");
            assert_eq!(pool[0].id(), QuestionId::new(1));
        }
    }

    #[test]
    fn decodes_nested_data_object_envelope() {
        let body = format!(r#"{{"data": {{"questions": [{GOOD_QUESTION}]}}}}"#);
        let pool = decode_pool(body.as_bytes()).unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn normalizes_difficulty_synonyms() {
        let pool = decode_pool(&wrap(GOOD_QUESTION, "data")).unwrap();
        assert_eq!(pool[0].difficulty(), Some(Difficulty::Beginner));
    }

    #[test]
    fn unknown_difficulty_degrades_to_untagged() {
        let entry = GOOD_QUESTION.replace("easy", "brutal");
        let pool = decode_pool(&wrap(&entry, "data")).unwrap();
        assert_eq!(pool[0].difficulty(), None);
    }

    #[test]
    fn malformed_entry_is_skipped_not_fatal() {
        let entries = format!(r#"{GOOD_QUESTION}, {{"id": 2}}"#);
        let pool = decode_pool(&wrap(&entries, "data")).unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn unrecognized_envelope_is_an_error() {
        let err = decode_pool(br#"{"payload": 42}"#).unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn decodes_block_content() {
        let entry = r#"{
            "id": 3,
            "prompt": [
                {"kind": "text", "value": "Given the diagram"},
                {"kind": "image", "url": "https://cdn.example.com/d.png"},
                {"kind": "formula", "value": "E = mc^2"}
            ],
            "options": [
                {"label": "A", "content": "yes"},
                {"label": "B", "content": "no"}
            ],
            "answer": "B"
        }"#;
        let pool = decode_pool(&wrap(entry, "bare")).unwrap();
        assert!(pool[0].prompt().has_media());
        assert_eq!(pool[0].correct_label().as_str(), "B");
    }

    #[test]
    fn decodes_topic_shapes() {
        let topics =
            decode_topics(br#"{"data": ["javascript", {"name": "react"}, {"slug": "css"}, ""]}"#)
                .unwrap();
        let names: Vec<&str> = topics.iter().map(Topic::as_str).collect();
        assert_eq!(names, vec!["javascript", "react", "css"]);
    }
}
