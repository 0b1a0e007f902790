//! Login and signup request bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Signup body. Field names are camelCase on the wire, as sent by the mobile client.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupReq {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lab_types::loose::opt_text")]
    pub contact_number: Option<String>,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
}
