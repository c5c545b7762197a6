//! Alexa skill wire types (request envelope and speech response).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inbound request envelope: `{ "session"?, "request": { "type", "intent"? } }`.
/// A body without a `request` object is not a skill request and fails to parse.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillRequest {
    #[serde(default)]
    pub session: Option<Session>,
    pub request: RequestBody,
}

/// The `request` object: type discriminator plus the intent payload for intent requests.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub intent: Option<Intent>,
}

/// A recognized intent: name plus named slots. A missing slots map is treated as empty.
#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

/// One slot: the platform may send a slot entry without a resolved value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub value: Option<String>,
}

/// Session context (only the user id is used, as an opaque passthrough).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub user_id: Option<String>,
}

impl SkillRequest {
    /// Intent name, when this is an intent request carrying one.
    pub fn intent_name(&self) -> Option<&str> {
        self.request.intent.as_ref().map(|i| i.name.as_str())
    }

    /// Trimmed, non-empty value of a named slot.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.request
            .intent
            .as_ref()
            .and_then(|i| i.slots.get(name))
            .and_then(|s| s.value.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// User id from the session, "unknown" when absent.
    pub fn user_id(&self) -> &str {
        self.session
            .as_ref()
            .and_then(|s| s.user.as_ref())
            .and_then(|u| u.user_id.as_deref())
            .unwrap_or("unknown")
    }
}

/// Outbound response envelope: `{ "version": "1.0", "response": { ... } }`.
#[derive(Debug, Clone, Serialize)]
pub struct SkillResponse {
    pub version: String,
    pub response: ResponseBody,
}

/// The `response` object. All fields are optional and skipped when absent so the
/// session-ended case serializes as `{"version":"1.0","response":{}}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

/// Plain-text speech payload.
#[derive(Debug, Clone, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub typ: String,
    pub text: String,
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            typ: "PlainText".to_string(),
            text: text.into(),
        }
    }
}

/// Reprompt wrapper (same speech shape one level down).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

const PROTOCOL_VERSION: &str = "1.0";

impl SkillResponse {
    /// Speech response without a reprompt.
    pub fn speech(text: impl Into<String>, end_session: bool) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            response: ResponseBody {
                output_speech: Some(OutputSpeech::plain(text)),
                reprompt: None,
                should_end_session: Some(end_session),
            },
        }
    }

    /// Speech response with a reprompt (session stays open).
    pub fn speech_with_reprompt(text: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            response: ResponseBody {
                output_speech: Some(OutputSpeech::plain(text)),
                reprompt: Some(Reprompt {
                    output_speech: OutputSpeech::plain(reprompt),
                }),
                should_end_session: Some(false),
            },
        }
    }

    /// Empty response body (session-ended acknowledgement).
    pub fn empty() -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            response: ResponseBody::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_response_serializes_to_empty_object() {
        let value = serde_json::to_value(SkillResponse::empty()).expect("serialize");
        assert_eq!(value, json!({"version": "1.0", "response": {}}));
    }

    #[test]
    fn speech_response_wire_shape() {
        let value = serde_json::to_value(SkillResponse::speech("Goodbye!", true)).expect("serialize");
        assert_eq!(
            value,
            json!({
                "version": "1.0",
                "response": {
                    "outputSpeech": {"type": "PlainText", "text": "Goodbye!"},
                    "shouldEndSession": true
                }
            })
        );
    }

    #[test]
    fn reprompt_nests_output_speech() {
        let value =
            serde_json::to_value(SkillResponse::speech_with_reprompt("hi", "still there?"))
                .expect("serialize");
        assert_eq!(
            value["response"]["reprompt"]["outputSpeech"]["text"],
            json!("still there?")
        );
        assert_eq!(value["response"]["shouldEndSession"], json!(false));
    }

    #[test]
    fn envelope_without_request_fails_to_parse() {
        let err = serde_json::from_str::<SkillRequest>(r#"{"session":{}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn missing_slots_and_session_default_to_empty() {
        let req: SkillRequest = serde_json::from_value(json!({
            "request": {"type": "IntentRequest", "intent": {"name": "ChatIntent"}}
        }))
        .expect("parse");
        assert_eq!(req.intent_name(), Some("ChatIntent"));
        assert_eq!(req.slot_value("query"), None);
        assert_eq!(req.user_id(), "unknown");
    }

    #[test]
    fn slot_value_is_trimmed_and_empty_is_none() {
        let req: SkillRequest = serde_json::from_value(json!({
            "session": {"user": {"userId": "amzn1.ask.account.TEST"}},
            "request": {
                "type": "IntentRequest",
                "intent": {"name": "ChatIntent", "slots": {
                    "query": {"value": "  what is rust  "},
                    "blank": {"value": "   "},
                    "unresolved": {}
                }}
            }
        }))
        .expect("parse");
        assert_eq!(req.slot_value("query"), Some("what is rust"));
        assert_eq!(req.slot_value("blank"), None);
        assert_eq!(req.slot_value("unresolved"), None);
        assert_eq!(req.user_id(), "amzn1.ask.account.TEST");
    }
}
