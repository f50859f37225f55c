//! View model - Pages, tabs and the attributes handed to the renderer.
//!
//! Controllers return a [`View`]; the route layer turns it into an HTTP
//! response by rendering the page through a [`ViewRenderer`] or issuing
//! a redirect.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Role, User};
use crate::errors::{AppError, AppResult};
use crate::web::binding::FieldError;
use crate::web::forms::{ChangePasswordForm, UserForm};

/// Template names shared with the renderer
pub const VIEW_INDEX: &str = "index";
pub const VIEW_SIGNUP: &str = "user-form/user-signup";
pub const VIEW_USER_FORM: &str = "user-form/user-view";

/// Which tab of the user management page is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    List,
    Form,
}

impl Tab {
    /// Attribute name the templates use to mark the active tab
    pub fn attribute(self) -> &'static str {
        match self {
            Tab::List => "listTab",
            Tab::Form => "formTab",
        }
    }
}

/// Data shared by every rendering of the user management page
#[derive(Debug, Clone, Default)]
pub struct FormContext {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
}

/// State for the signup page
#[derive(Debug, Clone)]
pub struct SignupView {
    pub form: UserForm,
    pub roles: Vec<Role>,
    pub field_errors: Vec<FieldError>,
    pub form_error: Option<String>,
}

impl SignupView {
    /// Fresh signup page with an empty form
    pub fn fresh(roles: Vec<Role>) -> Self {
        Self {
            form: UserForm::default(),
            roles,
            field_errors: Vec::new(),
            form_error: None,
        }
    }

    /// Re-render after a submission failed on specific fields
    pub fn retry(form: UserForm, roles: Vec<Role>, field_errors: Vec<FieldError>) -> Self {
        Self {
            form,
            roles,
            field_errors,
            form_error: None,
        }
    }

    /// Re-render after a submission failed outright
    pub fn failed(form: UserForm, roles: Vec<Role>, message: String) -> Self {
        Self {
            form,
            roles,
            field_errors: Vec::new(),
            form_error: Some(message),
        }
    }
}

/// State for the combined list + form management page
#[derive(Debug, Clone)]
pub struct UserFormView {
    pub tab: Tab,
    pub form: UserForm,
    pub context: FormContext,
    pub edit_mode: bool,
    pub password_form: Option<ChangePasswordForm>,
    pub field_errors: Vec<FieldError>,
    pub form_error: Option<String>,
    pub list_error: Option<String>,
}

impl UserFormView {
    fn new(tab: Tab, form: UserForm, context: FormContext) -> Self {
        Self {
            tab,
            form,
            context,
            edit_mode: false,
            password_form: None,
            field_errors: Vec::new(),
            form_error: None,
            list_error: None,
        }
    }

    /// Plain page with the list tab active and an empty form
    pub fn list(context: FormContext) -> Self {
        Self::new(Tab::List, UserForm::default(), context)
    }

    /// List tab with a banner above the table
    pub fn list_with_error(context: FormContext, message: String) -> Self {
        Self {
            list_error: Some(message),
            ..Self::new(Tab::List, UserForm::default(), context)
        }
    }

    /// Form tab re-rendered with field errors and the submitted values
    pub fn form_retry(form: UserForm, context: FormContext, field_errors: Vec<FieldError>) -> Self {
        Self {
            field_errors,
            ..Self::new(Tab::Form, form, context)
        }
    }

    /// Form tab re-rendered with a banner after a failed submission
    pub fn form_failed(form: UserForm, context: FormContext, message: String) -> Self {
        Self {
            form_error: Some(message),
            ..Self::new(Tab::Form, form, context)
        }
    }

    /// Form tab in edit mode, pre-filled from a stored user
    pub fn edit(form: UserForm, context: FormContext) -> Self {
        let password_form = ChangePasswordForm::for_user(form.id.unwrap_or_default());
        Self {
            edit_mode: true,
            password_form: Some(password_form),
            ..Self::new(Tab::Form, form, context)
        }
    }

    /// Edit form re-rendered with field errors
    pub fn edit_retry(form: UserForm, context: FormContext, field_errors: Vec<FieldError>) -> Self {
        Self {
            field_errors,
            ..Self::edit(form, context)
        }
    }

    /// Edit form re-rendered with a banner
    pub fn edit_failed(form: UserForm, context: FormContext, message: String) -> Self {
        Self {
            form_error: Some(message),
            ..Self::edit(form, context)
        }
    }
}

/// Result of a controller operation: a page to render or a redirect
#[derive(Debug, Clone)]
pub enum View {
    Page(Page),
    Redirect(String),
}

impl View {
    /// The landing page
    pub fn home() -> Self {
        View::Page(Page::Home)
    }

    /// The signup page
    pub fn signup(view: SignupView) -> Self {
        View::Page(Page::Signup(view))
    }

    /// The user management page
    pub fn user_form(view: UserFormView) -> Self {
        View::Page(Page::UserForm(view))
    }

    /// A redirect to another location
    pub fn redirect(location: impl Into<String>) -> Self {
        View::Redirect(location.into())
    }
}

/// A renderable page and its state
#[derive(Debug, Clone)]
pub enum Page {
    Home,
    Signup(SignupView),
    UserForm(UserFormView),
}

impl Page {
    /// Template the page renders with
    pub fn template(&self) -> &'static str {
        match self {
            Page::Home => VIEW_INDEX,
            Page::Signup(_) => VIEW_SIGNUP,
            Page::UserForm(_) => VIEW_USER_FORM,
        }
    }

    /// Model attributes handed to the renderer.
    ///
    /// Optional attributes (banners, field errors, edit markers) are
    /// only present when set; templates key off their presence.
    pub fn attributes(&self) -> AppResult<ViewAttributes> {
        let mut attributes = ViewAttributes::new();

        match self {
            Page::Home => {}
            Page::Signup(view) => {
                attributes.put("signup", true)?;
                attributes.put("userForm", &view.form)?;
                attributes.put("roles", &view.roles)?;
                if !view.field_errors.is_empty() {
                    attributes.put("fieldErrors", &view.field_errors)?;
                }
                if let Some(message) = &view.form_error {
                    attributes.put("formErrorMessage", message)?;
                }
            }
            Page::UserForm(view) => {
                attributes.put("userForm", &view.form)?;
                attributes.put("userList", &view.context.users)?;
                attributes.put("roles", &view.context.roles)?;
                attributes.put(view.tab.attribute(), "active")?;
                if view.edit_mode {
                    attributes.put("editMode", "true")?;
                }
                if let Some(password_form) = &view.password_form {
                    attributes.put("passwordForm", password_form)?;
                }
                if !view.field_errors.is_empty() {
                    attributes.put("fieldErrors", &view.field_errors)?;
                }
                if let Some(message) = &view.form_error {
                    attributes.put("formErrorMessage", message)?;
                }
                if let Some(message) = &view.list_error {
                    attributes.put("listErrorMessage", message)?;
                }
            }
        }

        Ok(attributes)
    }
}

/// Attribute map handed from a page to the renderer.
///
/// Keys are the attribute names the templates consume; values are the
/// serialized page state. Ordered so rendering is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ViewAttributes {
    values: BTreeMap<&'static str, Value>,
}

impl ViewAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, serializing the value
    pub fn put(&mut self, key: &'static str, value: impl Serialize) -> AppResult<()> {
        let value = serde_json::to_value(value).map_err(|e| {
            AppError::internal(format!("Failed to serialize view attribute {}: {}", key, e))
        })?;
        self.values.insert(key, value);
        Ok(())
    }

    /// Look up an attribute
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether an attribute is present
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Renders a template name plus attributes into an HTML page.
pub trait ViewRenderer: Send + Sync {
    /// Render the named template with the given attributes
    fn render(&self, template: &str, attributes: &ViewAttributes) -> AppResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_user() -> User {
        let now = chrono::Utc::now();
        User {
            id: 9,
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "alice@example.com".to_string(),
            roles: vec![Role {
                id: 1,
                name: "USER".to_string(),
            }],
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_context() -> FormContext {
        FormContext {
            users: vec![sample_user()],
            roles: vec![
                Role {
                    id: 1,
                    name: "USER".to_string(),
                },
                Role {
                    id: 2,
                    name: "ADMIN".to_string(),
                },
            ],
        }
    }

    #[test]
    fn home_page_has_no_attributes() {
        let page = Page::Home;
        assert_eq!(page.template(), "index");
        assert!(page.attributes().unwrap().is_empty());
    }

    #[test]
    fn signup_page_marks_itself() {
        let page = Page::Signup(SignupView::fresh(sample_context().roles));
        assert_eq!(page.template(), "user-form/user-signup");

        let attributes = page.attributes().unwrap();
        assert_eq!(attributes.get("signup"), Some(&Value::Bool(true)));
        assert!(attributes.contains("userForm"));
        assert!(attributes.contains("roles"));
        assert!(!attributes.contains("fieldErrors"));
        assert!(!attributes.contains("formErrorMessage"));
    }

    #[test]
    fn list_page_activates_list_tab() {
        let page = Page::UserForm(UserFormView::list(sample_context()));
        assert_eq!(page.template(), "user-form/user-view");

        let attributes = page.attributes().unwrap();
        assert_eq!(attributes.get("listTab"), Some(&json!("active")));
        assert!(!attributes.contains("formTab"));
        assert!(!attributes.contains("editMode"));
        assert!(!attributes.contains("passwordForm"));
    }

    #[test]
    fn edit_page_sets_edit_mode_and_password_form() {
        let form = UserForm::from_user(&sample_user());
        let page = Page::UserForm(UserFormView::edit(form, sample_context()));

        let attributes = page.attributes().unwrap();
        assert_eq!(attributes.get("formTab"), Some(&json!("active")));
        assert!(!attributes.contains("listTab"));
        assert_eq!(attributes.get("editMode"), Some(&json!("true")));

        let password_form = attributes.get("passwordForm").unwrap();
        assert_eq!(password_form["id"], json!(9));
        assert!(password_form.get("new_password").is_none());
    }

    #[test]
    fn banners_only_render_when_present() {
        let view = UserFormView::list_with_error(sample_context(), "User not found".to_string());
        let attributes = Page::UserForm(view).attributes().unwrap();

        assert_eq!(attributes.get("listErrorMessage"), Some(&json!("User not found")));
        assert!(!attributes.contains("formErrorMessage"));
    }

    #[test]
    fn retry_carries_field_errors() {
        let mut form = UserForm::default();
        form.email = "alice@example.com".to_string();
        let errors = vec![FieldError {
            field: "username".to_string(),
            message: "Username is required".to_string(),
        }];

        let view = UserFormView::form_retry(form, sample_context(), errors);
        let attributes = Page::UserForm(view).attributes().unwrap();

        assert_eq!(attributes.get("fieldErrors").unwrap()[0]["field"], json!("username"));
        assert_eq!(
            attributes.get("userForm").unwrap()["email"],
            json!("alice@example.com")
        );
    }

    #[test]
    fn user_list_omits_password_hashes() {
        let page = Page::UserForm(UserFormView::list(sample_context()));
        let attributes = page.attributes().unwrap();

        let list = attributes.get("userList").unwrap();
        assert!(list[0].get("password_hash").is_none());
        assert_eq!(list[0]["username"], json!("alice"));
        assert_eq!(list[0]["roles"][0]["name"], json!("USER"));
    }
}
