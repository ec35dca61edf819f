//! Pure per-endpoint input validation.
//!
//! Each operation gets a validation function `fields -> Result<ValidatedInput,
//! ValidationError>` decoupled from the store call, so the field rules are
//! unit-testable without a database. Fields arrive as a flat string map (JSON
//! bodies and multipart forms both reduce to this); empty strings count as
//! absent, matching how the HTTP layer treats falsy form values.

use std::collections::HashMap;

use thiserror::Error;

use crate::application::ApplicationStatus;
use crate::job::JobType;
use crate::user::Role;

/// Flat field map extracted from a JSON or multipart request body.
pub type FieldMap = HashMap<String, String>;

/// Validation failure with the message returned to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,
    /// Job posting uses its own phrasing for the same condition.
    #[error("All fields are required.")]
    MissingJobFields,
    #[error("Invalid role. Must be 'student' or 'recruiter'")]
    InvalidRole,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Invalid phone number")]
    InvalidPhone,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Company name is required.")]
    CompanyNameRequired,
    #[error("Company name cannot be empty")]
    CompanyNameEmpty,
    #[error("Invalid salary amount.")]
    InvalidSalary,
    #[error("Invalid experience level.")]
    InvalidExperience,
    #[error("Invalid position count.")]
    InvalidPosition,
    #[error("Invalid job type.")]
    InvalidJobType,
    #[error("Status is required.")]
    StatusRequired,
    #[error("Invalid status.")]
    InvalidStatus,
    /// Document-schema constraint surfaced before the store is touched.
    #[error("{0}")]
    Constraint(&'static str),
}

pub mod constraints {
    //! Field constraint messages, phrased as stored-schema rules.

    pub const COMPANY_NAME_MIN: &str = "Company name must be at least 2 characters long";
    pub const COMPANY_NAME_MAX: &str = "Company name cannot exceed 100 characters";
    pub const DESCRIPTION_MAX: &str = "Description cannot exceed 1000 characters";
    pub const WEBSITE_INVALID: &str = "Please enter a valid website URL";
    pub const BIO_MAX: &str = "Bio cannot exceed 500 characters";
    pub const JOB_TITLE_MIN: &str = "Job title must be at least 3 characters long";
    pub const JOB_TITLE_MAX: &str = "Job title cannot exceed 100 characters";
    pub const JOB_DESCRIPTION_MIN: &str = "Job description must be at least 10 characters long";
    pub const JOB_DESCRIPTION_MAX: &str = "Job description cannot exceed 2000 characters";
    pub const EXPERIENCE_MAX: &str = "Experience level cannot exceed 50 years";
}

/// Validated registration input. Email is trimmed and lowercased; the
/// password is still plaintext here and must be hashed before persisting.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserInput {
    pub fullname: String,
    pub email: String,
    pub phone_number: u64,
    pub password: String,
    pub role: Role,
}

/// Validated login input. Role stays a raw string: an unknown role is not a
/// validation failure, it simply fails the stored-role comparison later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Validated partial profile update. `None` means "leave untouched".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdateInput {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<u64>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
}

/// Validated partial company update. `None` means "leave untouched".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

/// Validated job posting input. `company_id` is still an unparsed id string.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJobInput {
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: f64,
    pub experience_level: f64,
    pub location: String,
    pub job_type: JobType,
    pub position: u32,
    pub company_id: String,
}

/// Look up a field, treating missing and empty-string values the same.
fn non_empty<'a>(fields: &'a FieldMap, key: &str) -> Option<&'a str> {
    fields.get(key).map(String::as_str).filter(|s| !s.is_empty())
}

/// Split delimited text into trimmed, non-empty segments, order preserved.
pub fn split_delimited(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Address check: local part, `@`, domain with a dot, no whitespace and no
/// second `@` anywhere.
fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot + 1 < domain.len(),
        None => false,
    }
}

/// Phone numbers are digit strings of 10 to 12 characters.
fn parse_phone(s: &str) -> Option<u64> {
    let s = s.trim();
    if !(10..=12).contains(&s.len()) || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Validate registration input.
pub fn validate_register(fields: &FieldMap) -> Result<NewUserInput, ValidationError> {
    let fullname = non_empty(fields, "fullname").ok_or(ValidationError::MissingFields)?;
    let email = non_empty(fields, "email").ok_or(ValidationError::MissingFields)?;
    let phone = non_empty(fields, "phoneNumber").ok_or(ValidationError::MissingFields)?;
    let password = non_empty(fields, "password").ok_or(ValidationError::MissingFields)?;
    let role = non_empty(fields, "role").ok_or(ValidationError::MissingFields)?;

    let role = Role::parse(role).ok_or(ValidationError::InvalidRole)?;

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    let phone_number = parse_phone(phone).ok_or(ValidationError::InvalidPhone)?;

    if password.len() < 6 {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(NewUserInput {
        fullname: fullname.trim().to_string(),
        email,
        phone_number,
        password: password.to_string(),
        role,
    })
}

/// Validate login input. Only presence is checked here; credential and role
/// checks happen against the stored record.
pub fn validate_login(fields: &FieldMap) -> Result<LoginInput, ValidationError> {
    let email = non_empty(fields, "email").ok_or(ValidationError::MissingFields)?;
    let password = non_empty(fields, "password").ok_or(ValidationError::MissingFields)?;
    let role = non_empty(fields, "role").ok_or(ValidationError::MissingFields)?;

    Ok(LoginInput {
        email: email.trim().to_lowercase(),
        password: password.to_string(),
        role: role.to_string(),
    })
}

/// Validate a partial profile update. Absent fields stay `None`.
pub fn validate_profile_update(fields: &FieldMap) -> Result<ProfileUpdateInput, ValidationError> {
    let mut input = ProfileUpdateInput::default();

    if let Some(fullname) = non_empty(fields, "fullname") {
        input.fullname = Some(fullname.trim().to_string());
    }

    if let Some(email) = non_empty(fields, "email") {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }
        input.email = Some(email);
    }

    if let Some(phone) = non_empty(fields, "phoneNumber") {
        input.phone_number = Some(parse_phone(phone).ok_or(ValidationError::InvalidPhone)?);
    }

    if let Some(bio) = non_empty(fields, "bio") {
        if bio.chars().count() > 500 {
            return Err(ValidationError::Constraint(constraints::BIO_MAX));
        }
        input.bio = Some(bio.to_string());
    }

    if let Some(skills) = non_empty(fields, "skills") {
        input.skills = Some(split_delimited(skills));
    }

    Ok(input)
}

fn check_company_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len < 2 {
        return Err(ValidationError::Constraint(constraints::COMPANY_NAME_MIN));
    }
    if len > 100 {
        return Err(ValidationError::Constraint(constraints::COMPANY_NAME_MAX));
    }
    Ok(())
}

fn check_website(url: &str) -> Result<(), ValidationError> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(r) if !r.is_empty() => Ok(()),
        _ => Err(ValidationError::Constraint(constraints::WEBSITE_INVALID)),
    }
}

/// Validate a company registration name. Returns the trimmed name.
pub fn validate_company_name(fields: &FieldMap) -> Result<String, ValidationError> {
    let name = fields
        .get("companyName")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::CompanyNameRequired)?;
    check_company_name(name)?;
    Ok(name.to_string())
}

/// Validate a partial company update. Absent fields stay `None`.
pub fn validate_company_update(fields: &FieldMap) -> Result<CompanyUpdateInput, ValidationError> {
    let mut input = CompanyUpdateInput::default();

    if let Some(name) = fields.get("name").filter(|s| !s.is_empty()) {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::CompanyNameEmpty);
        }
        check_company_name(name)?;
        input.name = Some(name.to_string());
    }

    if let Some(description) = non_empty(fields, "description") {
        if description.chars().count() > 1000 {
            return Err(ValidationError::Constraint(constraints::DESCRIPTION_MAX));
        }
        input.description = Some(description.trim().to_string());
    }

    if let Some(website) = non_empty(fields, "website") {
        let website = website.trim();
        check_website(website)?;
        input.website = Some(website.to_string());
    }

    if let Some(location) = non_empty(fields, "location") {
        input.location = Some(location.trim().to_string());
    }

    Ok(input)
}

/// Validate a job posting. All nine fields are required before any
/// field-specific rule is applied.
pub fn validate_post_job(fields: &FieldMap) -> Result<NewJobInput, ValidationError> {
    let title = non_empty(fields, "title").ok_or(ValidationError::MissingJobFields)?;
    let description = non_empty(fields, "description").ok_or(ValidationError::MissingJobFields)?;
    let requirements = non_empty(fields, "requirements").ok_or(ValidationError::MissingJobFields)?;
    let salary = non_empty(fields, "salary").ok_or(ValidationError::MissingJobFields)?;
    let location = non_empty(fields, "location").ok_or(ValidationError::MissingJobFields)?;
    let job_type = non_empty(fields, "jobType").ok_or(ValidationError::MissingJobFields)?;
    let experience = non_empty(fields, "experience").ok_or(ValidationError::MissingJobFields)?;
    let position = non_empty(fields, "position").ok_or(ValidationError::MissingJobFields)?;
    let company_id = non_empty(fields, "companyId").ok_or(ValidationError::MissingJobFields)?;

    let salary: f64 = salary
        .trim()
        .parse()
        .ok()
        .filter(|s: &f64| s.is_finite() && *s > 0.0)
        .ok_or(ValidationError::InvalidSalary)?;

    let experience_level: f64 = experience
        .trim()
        .parse()
        .ok()
        .filter(|e: &f64| e.is_finite() && *e >= 0.0)
        .ok_or(ValidationError::InvalidExperience)?;
    if experience_level > 50.0 {
        return Err(ValidationError::Constraint(constraints::EXPERIENCE_MAX));
    }

    let position: u32 = position
        .trim()
        .parse()
        .ok()
        .filter(|p: &u32| *p >= 1)
        .ok_or(ValidationError::InvalidPosition)?;

    let job_type = JobType::parse(job_type).ok_or(ValidationError::InvalidJobType)?;

    let title = title.trim();
    let title_len = title.chars().count();
    if title_len < 3 {
        return Err(ValidationError::Constraint(constraints::JOB_TITLE_MIN));
    }
    if title_len > 100 {
        return Err(ValidationError::Constraint(constraints::JOB_TITLE_MAX));
    }

    let description = description.trim();
    let description_len = description.chars().count();
    if description_len < 10 {
        return Err(ValidationError::Constraint(constraints::JOB_DESCRIPTION_MIN));
    }
    if description_len > 2000 {
        return Err(ValidationError::Constraint(constraints::JOB_DESCRIPTION_MAX));
    }

    Ok(NewJobInput {
        title: title.to_string(),
        description: description.to_string(),
        requirements: split_delimited(requirements),
        salary,
        experience_level,
        location: location.trim().to_string(),
        job_type,
        position,
        company_id: company_id.trim().to_string(),
    })
}

/// Validate an application status update.
pub fn validate_status(fields: &FieldMap) -> Result<ApplicationStatus, ValidationError> {
    let status = non_empty(fields, "status").ok_or(ValidationError::StatusRequired)?;
    ApplicationStatus::parse(status).ok_or(ValidationError::InvalidStatus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn register_fields() -> FieldMap {
        map(&[
            ("fullname", "A"),
            ("email", "a@a.com"),
            ("phoneNumber", "1234567890"),
            ("password", "secret1"),
            ("role", "student"),
        ])
    }

    #[test]
    fn test_register_ok() {
        let input = validate_register(&register_fields()).unwrap();
        assert_eq!(input.fullname, "A");
        assert_eq!(input.email, "a@a.com");
        assert_eq!(input.phone_number, 1234567890);
        assert_eq!(input.role, Role::Student);
    }

    #[test]
    fn test_register_missing_field() {
        for key in ["fullname", "email", "phoneNumber", "password", "role"] {
            let mut fields = register_fields();
            fields.remove(key);
            assert_eq!(
                validate_register(&fields),
                Err(ValidationError::MissingFields),
                "missing {key}"
            );

            let mut fields = register_fields();
            fields.insert(key.to_string(), String::new());
            assert_eq!(validate_register(&fields), Err(ValidationError::MissingFields));
        }
    }

    #[test]
    fn test_register_invalid_role() {
        let mut fields = register_fields();
        fields.insert("role".into(), "admin".into());
        assert_eq!(validate_register(&fields), Err(ValidationError::InvalidRole));
    }

    #[test]
    fn test_register_invalid_email() {
        for bad in ["not-an-email", "a@b", "a b@c.com", "@x.com", "a@.com", "a@b.com@c"] {
            let mut fields = register_fields();
            fields.insert("email".into(), bad.into());
            assert_eq!(
                validate_register(&fields),
                Err(ValidationError::InvalidEmail),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_register_lowercases_email() {
        let mut fields = register_fields();
        fields.insert("email".into(), "Jane.Doe@Example.COM".into());
        let input = validate_register(&fields).unwrap();
        assert_eq!(input.email, "jane.doe@example.com");
    }

    #[test]
    fn test_register_invalid_phone() {
        for bad in ["123456789", "1234567890123", "12345abcde", "+1234567890"] {
            let mut fields = register_fields();
            fields.insert("phoneNumber".into(), bad.into());
            assert_eq!(
                validate_register(&fields),
                Err(ValidationError::InvalidPhone),
                "{bad}"
            );
        }
        // 10, 11 and 12 digits are all fine
        for good in ["1234567890", "12345678901", "123456789012"] {
            let mut fields = register_fields();
            fields.insert("phoneNumber".into(), good.into());
            assert!(validate_register(&fields).is_ok(), "{good}");
        }
    }

    #[test]
    fn test_register_short_password() {
        let mut fields = register_fields();
        fields.insert("password".into(), "12345".into());
        assert_eq!(
            validate_register(&fields),
            Err(ValidationError::PasswordTooShort)
        );
    }

    #[test]
    fn test_login_requires_all_fields() {
        let fields = map(&[("email", "a@a.com"), ("password", "secret1")]);
        assert_eq!(validate_login(&fields), Err(ValidationError::MissingFields));

        let fields = map(&[("email", "a@a.com"), ("password", "secret1"), ("role", "student")]);
        let input = validate_login(&fields).unwrap();
        assert_eq!(input.role, "student");
    }

    #[test]
    fn test_login_accepts_unknown_role_string() {
        // Role mismatch is reported against the stored record, not here.
        let fields = map(&[("email", "a@a.com"), ("password", "x12345"), ("role", "alien")]);
        assert!(validate_login(&fields).is_ok());
    }

    #[test]
    fn test_profile_update_partial() {
        let input = validate_profile_update(&map(&[("bio", "Rustacean")])).unwrap();
        assert_eq!(input.bio.as_deref(), Some("Rustacean"));
        assert!(input.email.is_none());
        assert!(input.fullname.is_none());
        assert!(input.skills.is_none());
    }

    #[test]
    fn test_profile_update_skills_split() {
        let input =
            validate_profile_update(&map(&[("skills", " rust , tokio ,,  axum , ")])).unwrap();
        assert_eq!(
            input.skills,
            Some(vec!["rust".to_string(), "tokio".to_string(), "axum".to_string()])
        );
    }

    #[test]
    fn test_profile_update_rejects_bad_email() {
        let fields = map(&[("email", "nope")]);
        assert_eq!(
            validate_profile_update(&fields),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_company_name_rules() {
        assert_eq!(
            validate_company_name(&map(&[])),
            Err(ValidationError::CompanyNameRequired)
        );
        assert_eq!(
            validate_company_name(&map(&[("companyName", "   ")])),
            Err(ValidationError::CompanyNameRequired)
        );
        assert_eq!(
            validate_company_name(&map(&[("companyName", "X")])),
            Err(ValidationError::Constraint(constraints::COMPANY_NAME_MIN))
        );
        let long_name = "x".repeat(101);
        assert_eq!(
            validate_company_name(&map(&[("companyName", long_name.as_str())])),
            Err(ValidationError::Constraint(constraints::COMPANY_NAME_MAX))
        );
        assert_eq!(
            validate_company_name(&map(&[("companyName", "  Acme  ")])).unwrap(),
            "Acme"
        );
    }

    #[test]
    fn test_company_update_website_pattern() {
        assert!(validate_company_update(&map(&[("website", "https://acme.io")])).is_ok());
        assert!(validate_company_update(&map(&[("website", "http://acme.io")])).is_ok());
        assert_eq!(
            validate_company_update(&map(&[("website", "acme.io")])),
            Err(ValidationError::Constraint(constraints::WEBSITE_INVALID))
        );
        assert_eq!(
            validate_company_update(&map(&[("website", "https://")])),
            Err(ValidationError::Constraint(constraints::WEBSITE_INVALID))
        );
    }

    fn job_fields() -> FieldMap {
        map(&[
            ("title", "Backend Engineer"),
            ("description", "Build and run the API services."),
            ("requirements", "Rust, MongoDB , ,axum"),
            ("salary", "90000"),
            ("location", "Remote"),
            ("jobType", "Full-Time"),
            ("experience", "3"),
            ("position", "2"),
            ("companyId", "64f000000000000000000001"),
        ])
    }

    #[test]
    fn test_post_job_ok() {
        let input = validate_post_job(&job_fields()).unwrap();
        assert_eq!(input.job_type, JobType::FullTime);
        assert_eq!(
            input.requirements,
            vec!["Rust".to_string(), "MongoDB".to_string(), "axum".to_string()]
        );
        assert_eq!(input.salary, 90000.0);
        assert_eq!(input.position, 2);
    }

    #[test]
    fn test_post_job_missing_any_field() {
        for key in [
            "title", "description", "requirements", "salary", "location", "jobType",
            "experience", "position", "companyId",
        ] {
            let mut fields = job_fields();
            fields.remove(key);
            assert_eq!(
                validate_post_job(&fields),
                Err(ValidationError::MissingJobFields),
                "missing {key}"
            );
        }
    }

    #[test]
    fn test_post_job_invalid_salary() {
        for bad in ["-5", "0", "abc", "NaN"] {
            let mut fields = job_fields();
            fields.insert("salary".into(), bad.into());
            assert_eq!(
                validate_post_job(&fields),
                Err(ValidationError::InvalidSalary),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_post_job_experience_bounds() {
        let mut fields = job_fields();
        fields.insert("experience".into(), "-1".into());
        assert_eq!(
            validate_post_job(&fields),
            Err(ValidationError::InvalidExperience)
        );

        let mut fields = job_fields();
        fields.insert("experience".into(), "51".into());
        assert_eq!(
            validate_post_job(&fields),
            Err(ValidationError::Constraint(constraints::EXPERIENCE_MAX))
        );

        let mut fields = job_fields();
        fields.insert("experience".into(), "0".into());
        assert!(validate_post_job(&fields).is_ok());
    }

    #[test]
    fn test_post_job_invalid_position() {
        for bad in ["0", "-2", "1.5", "many"] {
            let mut fields = job_fields();
            fields.insert("position".into(), bad.into());
            assert_eq!(
                validate_post_job(&fields),
                Err(ValidationError::InvalidPosition),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_post_job_invalid_type() {
        let mut fields = job_fields();
        fields.insert("jobType".into(), "gig".into());
        assert_eq!(validate_post_job(&fields), Err(ValidationError::InvalidJobType));
    }

    #[test]
    fn test_post_job_title_and_description_lengths() {
        let mut fields = job_fields();
        fields.insert("title".into(), "ab".into());
        assert_eq!(
            validate_post_job(&fields),
            Err(ValidationError::Constraint(constraints::JOB_TITLE_MIN))
        );

        let mut fields = job_fields();
        fields.insert("description".into(), "too short".into());
        assert_eq!(
            validate_post_job(&fields),
            Err(ValidationError::Constraint(constraints::JOB_DESCRIPTION_MIN))
        );
    }

    #[test]
    fn test_status_validation() {
        assert_eq!(validate_status(&map(&[])), Err(ValidationError::StatusRequired));
        assert_eq!(
            validate_status(&map(&[("status", "onhold")])),
            Err(ValidationError::InvalidStatus)
        );
        assert_eq!(
            validate_status(&map(&[("status", "Accepted")])),
            Ok(ApplicationStatus::Accepted)
        );
    }

    #[test]
    fn test_error_messages_verbatim() {
        assert_eq!(ValidationError::MissingFields.to_string(), "All fields are required");
        assert_eq!(ValidationError::MissingJobFields.to_string(), "All fields are required.");
        assert_eq!(ValidationError::InvalidSalary.to_string(), "Invalid salary amount.");
        assert_eq!(
            ValidationError::InvalidRole.to_string(),
            "Invalid role. Must be 'student' or 'recruiter'"
        );
    }
}
