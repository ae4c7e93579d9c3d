use crate::model::id::{EventId, UserId};
use derive_new::new;
use garde::Validate;

#[derive(new, Debug)]
pub struct RegisterUser {
    pub event_id: EventId,
    pub registrant: Registrant,
}

/// Who is being registered: an existing user by id, or a user resolved
/// lazily by email (created when no row with that email exists yet).
#[derive(Debug)]
pub enum Registrant {
    Existing(UserId),
    New(NewUser),
}

#[derive(Debug, Validate)]
pub struct NewUser {
    #[garde(custom(required_name))]
    pub name: String,
    #[garde(custom(required_email))]
    pub email: String,
}

fn required_name(value: &str, _context: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("name is required and must be a string"));
    }
    Ok(())
}

fn required_email(value: &str, _context: &()) -> garde::Result {
    if value.trim().is_empty() || !value.contains('@') {
        return Err(garde::Error::new(
            "email is required and must be a valid email string",
        ));
    }
    Ok(())
}

#[derive(new, Debug)]
pub struct CancelRegistration {
    pub event_id: EventId,
    pub user_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_with_valid_fields_passes() {
        let user = NewUser {
            name: "Alice".into(),
            email: "alice@example.com".into(),
        };
        assert!(user.validate().is_ok());
    }

    #[test]
    fn empty_fields_report_both_errors() {
        let user = NewUser {
            name: "".into(),
            email: "".into(),
        };
        let report = user.validate().unwrap_err();
        let messages: Vec<String> = report.iter().map(|(_, e)| e.to_string()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("name is required"));
        assert!(messages[1].contains("email is required"));
    }

    #[test]
    fn email_without_at_sign_is_rejected() {
        let user = NewUser {
            name: "Bob".into(),
            email: "bob.example.com".into(),
        };
        assert!(user.validate().is_err());
    }
}
