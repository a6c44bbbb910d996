//! Input validation for the login, OTP, profile and job forms.
//!
//! Each form validates into the request body it feeds, so nothing
//! unvalidated can reach the network.

use std::str::FromStr;

use email_address::EmailAddress;
use url::Url;

use crate::errors::AppError;
use crate::models::{JobPostCreate, JobPosting, OtpRequest, OtpVerify, ReferralStatus, UserUpdate};

pub const OTP_LENGTH: usize = 6;
const FULL_NAME_MAX: usize = 100;
const MOBILE_MIN_DIGITS: usize = 8;
const MOBILE_MAX_DIGITS: usize = 15;

/// RFC 5322 addr-spec with a dotted domain name. Quoted local parts,
/// domain literals and display names are rejected.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(|c| c.is_whitespace() || c == '<') {
        return false;
    }
    let Ok(address) = EmailAddress::from_str(value) else {
        return false;
    };
    let local = address.local_part();
    !local.starts_with('"')
        && !local.split('.').any(str::is_empty)
        && !address.domain().starts_with('[')
        && address.domain().contains('.')
}

/// Absolute http(s) URL with a host.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

/// `^\+?[1-9]\d{7,14}$`
pub fn is_valid_mobile(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    let count = digits.chars().count();
    digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
        && (MOBILE_MIN_DIGITS..=MOBILE_MAX_DIGITS).contains(&count)
}

fn required(field: &'static str, value: &str, message: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(field, message));
    }
    Ok(value.to_string())
}

/// Empty optional strings are sent as null.
fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn validate_login(email: &str) -> Result<OtpRequest, AppError> {
    let email = required("email", email, "Email is required")?;
    if !is_valid_email(&email) {
        return Err(AppError::validation("email", "Invalid email address"));
    }
    Ok(OtpRequest { email })
}

pub fn validate_otp(email: &str, otp_code: &str) -> Result<OtpVerify, AppError> {
    let OtpRequest { email } = validate_login(email)?;
    let otp_code = otp_code.trim();
    if otp_code.chars().count() != OTP_LENGTH || !otp_code.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation("otp_code", "OTP must be 6 digits"));
    }
    Ok(OtpVerify {
        email,
        otp_code: otp_code.to_string(),
    })
}

pub fn validate_profile(full_name: &str, mobile_number: &str) -> Result<UserUpdate, AppError> {
    let full_name = required("full_name", full_name, "Full name is required")?;
    if full_name.chars().count() > FULL_NAME_MAX {
        return Err(AppError::validation("full_name", "Full name is too long"));
    }
    let mobile_number = required("mobile_number", mobile_number, "Mobile number is required")?;
    if !is_valid_mobile(&mobile_number) {
        return Err(AppError::validation(
            "mobile_number",
            "Invalid mobile number format (e.g., +1234567890, 8-15 digits)",
        ));
    }
    Ok(UserUpdate {
        full_name: Some(full_name),
        mobile_number: Some(mobile_number),
    })
}

/// Raw admin job form input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobForm {
    pub role_name: String,
    pub company_name: String,
    pub job_description: String,
    pub department_name: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub application_link: Option<String>,
    pub referral_status: Option<String>,
}

impl JobForm {
    /// Prefills the form from an existing posting for editing.
    pub fn from_job(job: &JobPosting) -> Self {
        JobForm {
            role_name: job.role_name.clone(),
            company_name: job.company_name.clone(),
            job_description: job.job_description.clone(),
            department_name: job.department_name.clone(),
            location: job.location.clone(),
            contact_email: job.contact_email.clone(),
            application_link: job.application_link.clone(),
            referral_status: job.referral_status.clone(),
        }
    }

    /// Overlays every field set in `other` on top of this form.
    pub fn merge(mut self, other: JobForm) -> Self {
        fn pick(current: String, new: String) -> String {
            if new.trim().is_empty() {
                current
            } else {
                new
            }
        }
        self.role_name = pick(self.role_name, other.role_name);
        self.company_name = pick(self.company_name, other.company_name);
        self.job_description = pick(self.job_description, other.job_description);
        self.department_name = other.department_name.or(self.department_name);
        self.location = other.location.or(self.location);
        self.contact_email = other.contact_email.or(self.contact_email);
        self.application_link = other.application_link.or(self.application_link);
        self.referral_status = other.referral_status.or(self.referral_status);
        self
    }

    pub fn validate(&self) -> Result<JobPostCreate, AppError> {
        let role_name = required("RoleName", &self.role_name, "Role name is required")?;
        let company_name = required("CompanyName", &self.company_name, "Company name is required")?;
        let job_description = required(
            "JobDescription",
            &self.job_description,
            "Job description is required",
        )?;

        let contact_email = optional(self.contact_email.as_deref());
        if let Some(email) = &contact_email {
            if !is_valid_email(email) {
                return Err(AppError::validation("ContactEmail", "Invalid email address"));
            }
        }

        let application_link = optional(self.application_link.as_deref());
        if let Some(link) = &application_link {
            if !is_valid_url(link) {
                return Err(AppError::validation("ApplicationLink", "Invalid URL"));
            }
        }

        let referral_status = match optional(self.referral_status.as_deref()) {
            None => ReferralStatus::default(),
            Some(value) => ReferralStatus::parse(&value).ok_or_else(|| {
                AppError::validation("ReferralStatus", "Expected one of yes, no, maybe, ask")
            })?,
        };

        Ok(JobPostCreate {
            role_name,
            company_name,
            job_description,
            department_name: optional(self.department_name.as_deref()),
            location: optional(self.location.as_deref()),
            contact_email,
            application_link,
            referral_status: Some(referral_status.as_str().to_string()),
        })
    }
}
