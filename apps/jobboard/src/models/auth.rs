use serde::{Deserialize, Serialize};

/// Body of `POST /auth/request-otp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRequest {
    pub email: String,
}

/// Body of `POST /auth/verify-otp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerify {
    pub email: String,
    pub otp_code: String,
}

/// Token issued by `POST /auth/verify-otp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Msg {
    pub msg: String,
}
