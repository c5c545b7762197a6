//! AI responder: one completion call shaped for speech output.
//!
//! Never surfaces an error to the router: any client failure resolves to a
//! static fallback sentence, and the returned text is bounded for the voice
//! platform's payload limit.

use crate::llm::{ChatMessage, OpenAiClient};

/// System instruction keeping replies short and speakable.
const SYSTEM_PROMPT: &str = "You are a helpful AI assistant speaking through a voice device. \
Keep responses concise and conversational, two to three sentences at most. \
Speak naturally, as if talking to someone. Avoid lists, headings, or any formatting. \
If you have several items to mention, say them in a flowing sentence. \
Do not announce your answer with phrases like \"Here's what I found\" — just give the information.";

/// Completion cap keeping replies short for voice.
const MAX_COMPLETION_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.7;

/// Platform payload limit and the point we cut at when exceeded.
const SPEECH_LIMIT: usize = 8000;
const SPEECH_TRUNCATE_AT: usize = 7900;
const ELLIPSIS: &str = "...";

const FALLBACK_TEXT: &str = "I'm having trouble connecting to my knowledge base right now. Please try again in a moment.";

/// Generate a speakable reply for a free-text query. `user_id` is an opaque passthrough,
/// currently only logged (reserved for per-user context).
pub async fn generate_reply(
    client: &OpenAiClient,
    model: &str,
    query: &str,
    user_id: &str,
) -> String {
    log::info!("responder: generating reply for user {}", user_id);
    let messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(query)];
    let reply = match client
        .chat(model, messages, MAX_COMPLETION_TOKENS, TEMPERATURE)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            log::error!("responder: completion failed: {}", e);
            return FALLBACK_TEXT.to_string();
        }
    };
    let reply = reply.trim().to_string();
    if reply.is_empty() {
        log::error!("responder: completion content was empty");
        return FALLBACK_TEXT.to_string();
    }
    truncate_for_speech(reply)
}

/// Static text used when the completion service is unavailable.
pub fn fallback_text() -> &'static str {
    FALLBACK_TEXT
}

/// Cut oversized text to SPEECH_TRUNCATE_AT (backing up to a char boundary) plus an ellipsis.
fn truncate_for_speech(mut text: String) -> String {
    if text.len() <= SPEECH_LIMIT {
        return text;
    }
    let mut cut = SPEECH_TRUNCATE_AT;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
    text.push_str(ELLIPSIS);
    text
}
