//! Defensive extraction of JSON objects from model output.

use crate::error::LlmError;

/// Pull the JSON object out of text that may contain markdown fences or
/// commentary around it.
///
/// Code-fence markers are removed, then everything from the first `{` to
/// the last `}` is returned.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

/// Parse the embedded JSON object into `T`.
pub fn parse_embedded<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let stripped = text.replace("```json", "").replace("```", "");
    let json = extract_json_object(&stripped).ok_or_else(|| LlmError::MalformedResponse {
        reason: "no JSON object found in response".to_string(),
    })?;
    serde_json::from_str(json).map_err(|e| LlmError::MalformedResponse {
        reason: e.to_string(),
    })
}
