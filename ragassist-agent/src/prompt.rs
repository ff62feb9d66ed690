//! Prompt templates with `{context}` and `{question}` placeholders.
//!
//! Templates are stored as YAML mappings. Every string value is one block of
//! the template; blocks are joined with newlines in the order they appear in
//! the file, and non-string values are ignored:
//!
//! ```yaml
//! role: You answer questions using only the provided context.
//! context: "Context:\n{context}"
//! question: "Question: {question}"
//! ```
//!
//! Inside a template, `{{` and `}}` stand for literal braces.

use std::path::Path;

use serde_yaml::Value;
use tracing::{info, warn};

use crate::error::{AgentError, Result};

const CONTEXT: &str = "context";
const QUESTION: &str = "question";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Context,
    Question,
}

/// A parsed prompt template.
///
/// Substitution is single-pass: text inserted for `{context}` is never
/// scanned for placeholders again.
///
/// ```rust
/// use ragassist_agent::PromptComposer;
///
/// let composer = PromptComposer::from_template("Use {context} to answer {question}.").unwrap();
/// assert_eq!(composer.build("notes", "why?"), "Use notes to answer why?.");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptComposer {
    segments: Vec<Segment>,
}

impl PromptComposer {
    /// A template that builds empty prompts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `template`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Prompt`] if a non-empty template lacks either
    /// placeholder, names an unknown placeholder, or has an unbalanced brace.
    pub fn from_template(template: &str) -> Result<Self> {
        let segments = parse_template(template).map_err(AgentError::Prompt)?;
        if !segments.is_empty() {
            for (placeholder, segment) in [(CONTEXT, Segment::Context), (QUESTION, Segment::Question)]
            {
                if !segments.contains(&segment) {
                    return Err(AgentError::Prompt(format!(
                        "template is missing the {{{placeholder}}} placeholder"
                    )));
                }
            }
        }
        Ok(Self { segments })
    }

    /// Parse a template stored as a YAML mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Prompt`] if the YAML is invalid, is not a mapping,
    /// or the joined template is rejected by [`from_template`](Self::from_template).
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_template(&join_yaml_blocks(yaml)?)
    }

    /// Load a template from a YAML file, falling back to an empty template.
    ///
    /// A missing, unreadable, or malformed file is logged as a warning and
    /// yields [`PromptComposer::empty`]; the assistant still runs.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let yaml = match std::fs::read_to_string(path) {
            Ok(yaml) => yaml,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read prompt template, using an empty one");
                return Self::empty();
            }
        };
        match Self::from_yaml(&yaml) {
            Ok(composer) => {
                info!(path = %path.display(), "loaded prompt template");
                composer
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid prompt template, using an empty one");
                Self::empty()
            }
        }
    }

    /// True if the template produces empty prompts.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The template text, with literal braces escaped again.
    pub fn template(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.replace('{', "{{").replace('}', "}}"),
                Segment::Context => format!("{{{CONTEXT}}}"),
                Segment::Question => format!("{{{QUESTION}}}"),
            })
            .collect()
    }

    /// Fill in the placeholders.
    pub fn build(&self, context: &str, question: &str) -> String {
        let mut prompt = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => prompt.push_str(text),
                Segment::Context => prompt.push_str(context),
                Segment::Question => prompt.push_str(question),
            }
        }
        prompt
    }
}

/// Join the string values of a YAML mapping with newlines, in file order.
fn join_yaml_blocks(yaml: &str) -> Result<String> {
    let value: Value = serde_yaml::from_str(yaml)
        .map_err(|e| AgentError::Prompt(format!("invalid YAML: {e}")))?;
    let Value::Mapping(mapping) = value else {
        return Err(AgentError::Prompt("prompt file must be a YAML mapping".to_string()));
    };
    let blocks: Vec<&str> = mapping.values().filter_map(Value::as_str).collect();
    Ok(blocks.join("\n"))
}

fn parse_template(template: &str) -> std::result::Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        match ch {
            '{' if chars.peek().map(|(_, c)| *c) == Some('{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek().map(|(_, c)| *c) == Some('}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(format!("unclosed '{{' at byte {position}"));
                }
                let segment = match name.as_str() {
                    CONTEXT => Segment::Context,
                    QUESTION => Segment::Question,
                    other => return Err(format!("unknown placeholder {{{other}}}")),
                };
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
            }
            '}' => return Err(format!("unmatched '}}' at byte {position}")),
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
