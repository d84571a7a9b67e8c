//! Prompt text for the AI collaborator and parsing of its reply.

use playground_types::{PlaygroundError, Result, session::SourcePair};
use serde::Deserialize;
use crate::ports::GenerationRequest;

const RULES_PROMPT: &str = r#"
You are an expert React and Tailwind CSS developer.
You must return a single, valid JSON object and nothing else.
The JSON object must contain two keys: "jsx" and "css".

**CRITICAL RULES:**
1.  The "jsx" value must be a string containing a complete, self-contained React component.
2.  The component MUST start with 'export default function...'
3.  The JSX code inside the return statement MUST be well-formed. It must have a single root element.
4.  All styling must be done using Tailwind CSS classes inside the `className` attribute.
5.  Do not include any explanation, preamble, or any text outside of the JSON object.

**COMMON MISTAKES TO AVOID:**
- DO NOT output incomplete code snippets.
- DO NOT have syntax errors like missing closing tags.
- DO NOT forget the 'export default function...' part.

---
"#;

const TEXT_MODE: &str = "A user will provide a prompt to create or modify a React component.";
const IMAGE_MODE: &str =
    "Analyze the provided image and generate a React component that visually matches its design.";

/// The text parts sent ahead of any image, in order.
pub fn prompt_parts(req: &GenerationRequest) -> Vec<String> {
    match req.image {
        Some(_) => {
            let mut parts = vec![format!("{}\n{}", RULES_PROMPT, IMAGE_MODE)];
            if !req.prompt.trim().is_empty() {
                parts.push(format!("Additional user instructions: \"{}\"", req.prompt));
            }
            parts
        }
        None => vec![
            format!("{}\n{}", RULES_PROMPT, TEXT_MODE),
            format!("User prompt: \"{}\"", req.prompt),
        ],
    }
}

#[derive(Deserialize)]
struct ComponentReply {
    jsx: serde_json::Value,
    #[serde(default)]
    css: Option<serde_json::Value>,
}

/// Parse the model's reply: optional Markdown fences around one JSON
/// object with a string `jsx` and an optional string `css`.
pub fn parse_component_json(text: &str) -> Result<SourcePair> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(PlaygroundError::Generation(
            "The AI returned an empty response".to_string(),
        ));
    }

    let reply: ComponentReply = serde_json::from_str(cleaned).map_err(|e| {
        PlaygroundError::Generation(format!("The AI returned malformed JSON: {}", e))
    })?;

    let markup = match reply.jsx {
        serde_json::Value::String(s) => s,
        _ => {
            return Err(PlaygroundError::Generation(
                "The AI response is missing a \"jsx\" string".to_string(),
            ))
        }
    };
    let style = match reply.css {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(_) => {
            return Err(PlaygroundError::Generation(
                "The AI response has a non-string \"css\" value".to_string(),
            ))
        }
    };

    Ok(SourcePair::new(markup, style))
}
