use tracing::info;

use super::{prompt, redirect_hint};
use crate::errors::AppError;
use crate::forms;
use crate::guards::{evaluate, Decision, Route};
use crate::state::AppState;

/// Request-OTP page followed by the verify-OTP page.
pub async fn login(state: &AppState, email: &str, otp: Option<&str>) -> Result<(), AppError> {
    let request = forms::validate_login(email)?;
    let sent = state.api.request_otp(&request).await?;
    println!("{}", sent.msg);

    let code = match otp {
        Some(code) => code.to_string(),
        None => prompt::read_line(&format!(
            "Enter the {}-digit code sent to {}: ",
            forms::OTP_LENGTH,
            request.email
        ))?,
    };
    let verify = forms::validate_otp(&request.email, &code)?;
    let token = state.api.verify_otp(&verify).await?;
    let user = state.session.login(token).await?;
    println!("Logged in as {}", user.display_name());

    let route = Route::VerifyOtp {
        email: Some(request.email),
        redirect: None,
    };
    if let Decision::Redirect(next @ Route::CompleteProfile { .. }) =
        evaluate(&state.session.snapshot(), &route)
    {
        println!("{}", redirect_hint(&route, &next));
    }
    Ok(())
}

pub async fn logout(state: &AppState) -> Result<(), AppError> {
    state.session.logout(&Route::home()).await;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(state: &AppState) -> Result<(), AppError> {
    if state.session.is_loading() {
        println!("Session is still loading.");
        return Ok(());
    }
    let Some(user) = state.session.user() else {
        println!("Not logged in.");
        return Ok(());
    };

    println!("{}", user.display_name());
    if let Some(email) = &user.email {
        println!("  email:   {email}");
    }
    if let Some(mobile) = &user.mobile_number {
        println!("  mobile:  {mobile}");
    }
    println!(
        "  admin:   {}",
        if state.session.is_admin() { "yes" } else { "no" }
    );
    println!(
        "  profile: {}",
        if state.session.is_profile_complete() {
            "complete"
        } else {
            "incomplete"
        }
    );
    Ok(())
}

/// Complete-profile page: validate, submit, swap the session user.
pub async fn complete_profile(
    state: &AppState,
    full_name: &str,
    mobile_number: &str,
) -> Result<(), AppError> {
    let update = forms::validate_profile(full_name, mobile_number)?;
    let token = state.session.token();
    let user = state
        .api
        .update_current_user(token.as_deref(), &update)
        .await?;
    info!("Profile completed for user {}", user.id);
    state.session.update_current_user(user);
    println!("Profile updated.");
    Ok(())
}
