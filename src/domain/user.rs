use serde::{Deserialize, Serialize};

pub const FIRST_NAME_REQUIRED: &str = "Please provide a first name.";
pub const LAST_NAME_REQUIRED: &str = "Please provide a last name.";
pub const EMAIL_REQUIRED: &str = "Please provide an email address.";
pub const EMAIL_INVALID: &str = "Email address provided is not valid.";
pub const EMAIL_IN_USE: &str = "The email you have provided is already in use.";
pub const PASSWORD_REQUIRED: &str = "Please provide a password.";

/// A stored user. Not `Serialize`; responses use [`UserSummary`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password_hash: String,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email_address: self.email_address.clone(),
        }
    }
}

/// Public projection of a user: no id, no password, no timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

/// A user ready to be inserted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password_hash: String,
}

/// Registration payload as received from the client. Every field is optional
/// so that missing fields surface as validation messages instead of a
/// deserialization failure.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
}

/// Registration fields that passed validation; the password is still plaintext.
#[derive(Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password: String,
}

impl RegisterUser {
    /// Runs every field rule and collects all violations.
    pub fn validate(self) -> Result<Registration, Vec<String>> {
        let mut errors = Vec::new();

        let first_name = required(self.first_name, FIRST_NAME_REQUIRED, &mut errors);
        let last_name = required(self.last_name, LAST_NAME_REQUIRED, &mut errors);
        let email_address = required(self.email_address, EMAIL_REQUIRED, &mut errors)
            .filter(|email| {
                let valid = is_valid_email(email);
                if !valid {
                    errors.push(EMAIL_INVALID.to_string());
                }
                valid
            });
        let password = required(self.password, PASSWORD_REQUIRED, &mut errors);

        match (first_name, last_name, email_address, password) {
            (Some(first_name), Some(last_name), Some(email_address), Some(password))
                if errors.is_empty() =>
            {
                Ok(Registration {
                    first_name,
                    last_name,
                    email_address,
                    password,
                })
            }
            _ => Err(errors),
        }
    }
}

pub(crate) fn required(
    value: Option<String>,
    message: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            errors.push(message.to_string());
            None
        }
    }
}

/// Syntactic email check: a non-empty local part, a single `@`, and a domain
/// of at least two dot-separated labels ending in an alphabetic TLD.
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic));

    labels_ok && tld_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> RegisterUser {
        RegisterUser {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email_address: Some("ada@example.com".to_string()),
            password: Some("analytical".to_string()),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        let registration = payload().validate().unwrap();
        assert_eq!(registration.first_name, "Ada");
        assert_eq!(registration.email_address, "ada@example.com");
        assert_eq!(registration.password, "analytical");
    }

    #[test]
    fn test_empty_payload_reports_every_field() {
        let errors = RegisterUser::default().validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                FIRST_NAME_REQUIRED,
                LAST_NAME_REQUIRED,
                EMAIL_REQUIRED,
                PASSWORD_REQUIRED
            ]
        );
    }

    #[test]
    fn test_blank_strings_count_as_missing() {
        let mut req = payload();
        req.first_name = Some("   ".to_string());
        req.password = Some(String::new());

        let errors = req.validate().unwrap_err();
        assert_eq!(errors, vec![FIRST_NAME_REQUIRED, PASSWORD_REQUIRED]);
    }

    #[test]
    fn test_invalid_email_is_reported_alongside_other_errors() {
        let mut req = payload();
        req.email_address = Some("not-an-email".to_string());
        req.last_name = None;

        let errors = req.validate().unwrap_err();
        assert_eq!(errors, vec![LAST_NAME_REQUIRED, EMAIL_INVALID]);
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b..com"));
        assert!(!is_valid_email("a@-b.com"));
        assert!(!is_valid_email("a@b.c0m"));
    }

    #[test]
    fn test_summary_omits_secret() {
        let user = User {
            id: 7,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email_address: "a@b.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
        };
        let json = serde_json::to_value(user.summary()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"firstName": "A", "lastName": "B", "emailAddress": "a@b.com"})
        );
    }
}
