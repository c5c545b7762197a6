//! Request routing: dispatch an inbound skill request to a response builder.
//!
//! Routing is total: every request kind, including unknown ones, resolves to a
//! valid speech response. Semantic failures (unknown intent, missing slot) are
//! answered in speech and logged; they never become HTTP errors.

use crate::gateway::{SkillRequest, SkillResponse};
use crate::llm::OpenAiClient;
use crate::responder;

const GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";
const GREETING_REPROMPT: &str = "What would you like me to help you with?";
const HELP_TEXT: &str = "I'm your AI assistant. You can ask me questions, get information, or have a conversation. Just say what you need help with!";
const GOODBYE: &str = "Goodbye!";
const REPEAT_PROMPT: &str = "I didn't catch what you said. Could you repeat that?";
const UNKNOWN_INTENT: &str = "I didn't understand that request.";
const UNKNOWN_REQUEST: &str = "Unknown request type";

/// The free-text slot carrying the user's query on the chat intent.
const QUERY_SLOT: &str = "query";

/// Route one inbound request to a response. The OpenAI client is only consulted
/// for the chat intent; every other path is static.
pub async fn route_request(
    client: &OpenAiClient,
    model: &str,
    req: &SkillRequest,
) -> SkillResponse {
    match req.request.typ.as_str() {
        "LaunchRequest" => SkillResponse::speech_with_reprompt(GREETING, GREETING_REPROMPT),
        "IntentRequest" => route_intent(client, model, req).await,
        "SessionEndedRequest" => SkillResponse::empty(),
        other => {
            log::error!("routing: unknown request type: {}", other);
            SkillResponse::speech(UNKNOWN_REQUEST, false)
        }
    }
}

/// Sub-dispatch by intent name. Matching is exact-string; the platform sends
/// canonical names (e.g. "AMAZON.StopIntent") and no normalization is applied.
async fn route_intent(client: &OpenAiClient, model: &str, req: &SkillRequest) -> SkillResponse {
    let Some(name) = req.intent_name() else {
        log::error!("routing: intent request without an intent object");
        return SkillResponse::speech(UNKNOWN_INTENT, false);
    };
    match name {
        "ChatIntent" => chat_response(client, model, req).await,
        "AMAZON.HelpIntent" => SkillResponse::speech(HELP_TEXT, false),
        "AMAZON.CancelIntent" | "AMAZON.StopIntent" => SkillResponse::speech(GOODBYE, true),
        other => {
            log::error!("routing: unrecognized intent: {}", other);
            SkillResponse::speech(UNKNOWN_INTENT, false)
        }
    }
}

/// Chat intent: hand the query slot to the responder. An absent or empty slot is
/// answered with a repeat prompt without calling out.
async fn chat_response(client: &OpenAiClient, model: &str, req: &SkillRequest) -> SkillResponse {
    let Some(query) = req.slot_value(QUERY_SLOT) else {
        log::error!("routing: chat intent with missing or empty query slot");
        return SkillResponse::speech(REPEAT_PROMPT, false);
    };
    let reply = responder::generate_reply(client, model, query, req.user_id()).await;
    SkillResponse::speech(reply, false)
}
