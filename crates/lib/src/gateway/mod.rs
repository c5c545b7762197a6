//! Gateway: HTTP endpoint for the skill webhook.
//!
//! Single port serves the health probe and the Alexa skill endpoint. Transport
//! failures (wrong method, bad body) get JSON error bodies; everything that
//! parses gets an always-200 speech-shaped response.

mod protocol;
mod server;

pub use protocol::{
    Intent, OutputSpeech, Reprompt, RequestBody, ResponseBody, Session, SessionUser, SkillRequest,
    SkillResponse, Slot,
};
pub use server::{run_gateway, GatewayState};
