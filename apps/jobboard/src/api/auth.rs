use reqwest::Method;
use tracing::info;

use super::ApiClient;
use crate::errors::AppError;
use crate::models::{Msg, OtpRequest, OtpVerify, Token};

impl ApiClient {
    /// POST /auth/request-otp
    pub async fn request_otp(&self, req: &OtpRequest) -> Result<Msg, AppError> {
        let endpoint = "/auth/request-otp";
        let response = self
            .execute(self.request(Method::POST, endpoint, None).json(req), endpoint)
            .await?;
        info!("OTP requested for {}", req.email);
        Self::read_json(response).await
    }

    /// POST /auth/verify-otp
    pub async fn verify_otp(&self, req: &OtpVerify) -> Result<Token, AppError> {
        let endpoint = "/auth/verify-otp";
        let response = self
            .execute(self.request(Method::POST, endpoint, None).json(req), endpoint)
            .await?;
        Self::read_json(response).await
    }
}
