//! Form models bound from the HTML pages.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{NewUser, User, UserProfile, UserUpdate};

/// Form backing both the signup page and the user management form.
///
/// Only the username is validated at binding time; everything else is
/// checked by the workflow. The password is accepted on create only and
/// never serialized back into a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UserForm {
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub roles: Vec<String>,
}

impl UserForm {
    /// Build the domain request for the create path
    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            profile: self.profile(),
            password: self.password.clone(),
            roles: self.roles.clone(),
        }
    }

    /// Build the domain request for the update path; requires an id
    pub fn to_update(&self) -> Option<UserUpdate> {
        self.id.map(|id| UserUpdate {
            id,
            profile: self.profile(),
            roles: self.roles.clone(),
        })
    }

    /// Pre-fill the form from a stored user; the password never travels back
    pub fn from_user(user: &User) -> Self {
        Self {
            id: Some(user.id),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: None,
            roles: user.roles.iter().map(|role| role.name.clone()).collect(),
        }
    }

    fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Standalone password sub-form shown next to the edit form.
///
/// It has no submission route yet; the form only binds and validates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChangePasswordForm {
    pub id: i64,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[serde(skip_serializing)]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    #[serde(skip_serializing)]
    pub confirm_password: String,
}

impl ChangePasswordForm {
    /// Empty sub-form bound to a user
    pub fn for_user(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}
