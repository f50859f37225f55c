//! Server-rendered HTML pages.
//!
//! Implements [`ViewRenderer`] by expanding each template name into a
//! complete page from the view attributes. Templates key off attribute
//! presence: a missing banner attribute means no banner is rendered.

use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::web::views::{
    ViewAttributes, ViewRenderer, VIEW_INDEX, VIEW_SIGNUP, VIEW_USER_FORM,
};

/// Renderer producing self-contained HTML pages
#[derive(Debug, Default)]
pub struct HtmlPages;

impl HtmlPages {
    /// Create new renderer instance
    pub fn new() -> Self {
        Self
    }
}

impl ViewRenderer for HtmlPages {
    fn render(&self, template: &str, attributes: &ViewAttributes) -> AppResult<String> {
        match template {
            VIEW_INDEX => Ok(index_page()),
            VIEW_SIGNUP => Ok(signup_page(attributes)),
            VIEW_USER_FORM => Ok(user_form_page(attributes)),
            other => Err(AppError::internal(format!("Unknown template: {}", other))),
        }
    }
}

/// Landing page linking the two entry points
fn index_page() -> String {
    page_shell(
        "User Management",
        "<h1>User Management</h1>\n\
         <ul>\n\
         <li><a href=\"/signup\">Sign up</a></li>\n\
         <li><a href=\"/userForm\">User form</a></li>\n\
         </ul>\n",
    )
}

/// Public signup page
fn signup_page(attributes: &ViewAttributes) -> String {
    let mut body = String::new();
    body.push_str("<h1>Sign Up</h1>\n");
    push_banner(&mut body, "form-error", attributes.get("formErrorMessage"));
    push_field_errors(&mut body, attributes);

    body.push_str("<form method=\"post\" action=\"/signup\">\n");
    push_text_input(&mut body, "Username", "username", form_value(attributes, "username"));
    push_text_input(
        &mut body,
        "First name",
        "first_name",
        form_value(attributes, "first_name"),
    );
    push_text_input(
        &mut body,
        "Last name",
        "last_name",
        form_value(attributes, "last_name"),
    );
    push_text_input(&mut body, "Email", "email", form_value(attributes, "email"));
    body.push_str("<label>Password<input type=\"password\" name=\"password\"></label>\n");
    push_role_checkboxes(&mut body, attributes);
    body.push_str("<button type=\"submit\">Sign Up</button>\n</form>\n");
    body.push_str("<p><a href=\"/\">Back</a></p>\n");

    page_shell("Sign Up", &body)
}

/// Combined user list and user form page
fn user_form_page(attributes: &ViewAttributes) -> String {
    let edit_mode = attributes.get("editMode").and_then(Value::as_str) == Some("true");

    let mut body = String::new();
    body.push_str("<h1>Users</h1>\n");

    body.push_str("<ul class=\"nav\">\n");
    push_tab(&mut body, "Users", attributes.contains("listTab"));
    push_tab(&mut body, "User Form", attributes.contains("formTab"));
    body.push_str("</ul>\n");

    body.push_str("<section id=\"list\">\n");
    push_banner(&mut body, "list-error", attributes.get("listErrorMessage"));
    push_user_table(&mut body, attributes);
    body.push_str("</section>\n");

    body.push_str("<section id=\"form\">\n");
    push_banner(&mut body, "form-error", attributes.get("formErrorMessage"));
    push_field_errors(&mut body, attributes);

    let action = if edit_mode { "/editUser" } else { "/userForm" };
    body.push_str(&format!("<form method=\"post\" action=\"{}\">\n", action));
    if edit_mode {
        body.push_str(&format!(
            "<input type=\"hidden\" name=\"id\" value=\"{}\">\n",
            form_id(attributes)
        ));
    }
    push_text_input(&mut body, "Username", "username", form_value(attributes, "username"));
    push_text_input(
        &mut body,
        "First name",
        "first_name",
        form_value(attributes, "first_name"),
    );
    push_text_input(
        &mut body,
        "Last name",
        "last_name",
        form_value(attributes, "last_name"),
    );
    push_text_input(&mut body, "Email", "email", form_value(attributes, "email"));
    if !edit_mode {
        body.push_str("<label>Password<input type=\"password\" name=\"password\"></label>\n");
    }
    push_role_checkboxes(&mut body, attributes);
    body.push_str("<button type=\"submit\">Save</button>\n");
    if edit_mode {
        body.push_str("<a href=\"/userForm/cancel\">Cancel</a>\n");
    }
    body.push_str("</form>\n");

    if let Some(password_form) = attributes.get("passwordForm") {
        push_password_form(&mut body, password_form);
    }
    body.push_str("</section>\n");

    page_shell("Users", &body)
}

/// Error page used for unrecoverable request failures
pub(crate) fn error_page(code: &str, message: &str) -> String {
    page_shell(
        "Error",
        &format!(
            "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Home</a></p>\n",
            escape(code),
            escape(message)
        ),
    )
}

/// Escape text for safe interpolation into HTML
pub(crate) fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn page_shell(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

/// Read a text field out of the userForm attribute
fn form_value<'a>(attributes: &'a ViewAttributes, field: &str) -> &'a str {
    attributes
        .get("userForm")
        .and_then(|form| form.get(field))
        .and_then(Value::as_str)
        .unwrap_or("")
}

fn form_id(attributes: &ViewAttributes) -> String {
    attributes
        .get("userForm")
        .and_then(|form| form.get("id"))
        .and_then(Value::as_i64)
        .map(|id| id.to_string())
        .unwrap_or_default()
}

fn form_has_role(attributes: &ViewAttributes, name: &str) -> bool {
    attributes
        .get("userForm")
        .and_then(|form| form.get("roles"))
        .and_then(Value::as_array)
        .map(|roles| roles.iter().any(|role| role.as_str() == Some(name)))
        .unwrap_or(false)
}

fn push_tab(html: &mut String, label: &str, active: bool) {
    if active {
        html.push_str(&format!("<li class=\"active\">{}</li>\n", label));
    } else {
        html.push_str(&format!("<li>{}</li>\n", label));
    }
}

fn push_banner(html: &mut String, class: &str, message: Option<&Value>) {
    if let Some(message) = message.and_then(Value::as_str) {
        html.push_str(&format!(
            "<div class=\"{}\">{}</div>\n",
            class,
            escape(message)
        ));
    }
}

fn push_field_errors(html: &mut String, attributes: &ViewAttributes) {
    if let Some(errors) = attributes.get("fieldErrors").and_then(Value::as_array) {
        html.push_str("<ul class=\"field-errors\">\n");
        for error in errors {
            if let Some(message) = error.get("message").and_then(Value::as_str) {
                html.push_str(&format!("<li>{}</li>\n", escape(message)));
            }
        }
        html.push_str("</ul>\n");
    }
}

fn push_text_input(html: &mut String, label: &str, name: &str, value: &str) {
    html.push_str(&format!(
        "<label>{}<input type=\"text\" name=\"{}\" value=\"{}\"></label>\n",
        label,
        name,
        escape(value)
    ));
}

fn push_role_checkboxes(html: &mut String, attributes: &ViewAttributes) {
    let empty = Vec::new();
    let roles = attributes
        .get("roles")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    html.push_str("<fieldset>\n<legend>Roles</legend>\n");
    for role in roles {
        if let Some(name) = role.get("name").and_then(Value::as_str) {
            let checked = if form_has_role(attributes, name) {
                " checked"
            } else {
                ""
            };
            html.push_str(&format!(
                "<label><input type=\"checkbox\" name=\"roles\" value=\"{}\"{}> {}</label>\n",
                escape(name),
                checked,
                escape(name)
            ));
        }
    }
    html.push_str("</fieldset>\n");
}

fn push_user_table(html: &mut String, attributes: &ViewAttributes) {
    html.push_str(
        "<table>\n<thead><tr><th>Username</th><th>First Name</th><th>Last Name</th>\
         <th>Email</th><th>Roles</th><th></th></tr></thead>\n<tbody>\n",
    );

    let empty = Vec::new();
    let users = attributes
        .get("userList")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    for user in users {
        let id = user.get("id").and_then(Value::as_i64).unwrap_or_default();
        let roles = user
            .get("roles")
            .and_then(Value::as_array)
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(|role| role.get("name").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            escape(cell(user, "username")),
            escape(cell(user, "first_name")),
            escape(cell(user, "last_name")),
            escape(cell(user, "email")),
            escape(&roles)
        ));
        html.push_str(&format!(
            "<td><a href=\"/editUser/{}\">Edit</a> <a href=\"/deleteUser/{}\">Delete</a></td></tr>\n",
            id, id
        ));
    }

    html.push_str("</tbody>\n</table>\n");
}

fn cell<'a>(user: &'a Value, field: &str) -> &'a str {
    user.get(field).and_then(Value::as_str).unwrap_or("")
}

fn push_password_form(html: &mut String, password_form: &Value) {
    let id = password_form
        .get("id")
        .and_then(Value::as_i64)
        .unwrap_or_default();

    html.push_str("<fieldset class=\"password-form\">\n<legend>Change Password</legend>\n");
    html.push_str(&format!(
        "<input type=\"hidden\" name=\"id\" value=\"{}\">\n",
        id
    ));
    html.push_str("<label>New password<input type=\"password\" name=\"new_password\"></label>\n");
    html.push_str(
        "<label>Confirm password<input type=\"password\" name=\"confirm_password\"></label>\n",
    );
    html.push_str("</fieldset>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, User};
    use crate::web::forms::UserForm;
    use crate::web::views::{FormContext, Page, SignupView, UserFormView};

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

    fn sample_roles() -> Vec<Role> {
        vec![
            Role {
                id: 1,
                name: "USER".to_string(),
            },
            Role {
                id: 2,
                name: "ADMIN".to_string(),
            },
        ]
    }

    fn sample_context() -> FormContext {
        FormContext {
            users: vec![sample_user()],
            roles: sample_roles(),
        }
    }

    fn render(page: Page) -> String {
        HtmlPages::new()
            .render(page.template(), &page.attributes().unwrap())
            .unwrap()
    }

    #[test]
    fn index_links_both_pages() {
        let html = render(Page::Home);
        assert!(html.contains("href=\"/signup\""));
        assert!(html.contains("href=\"/userForm\""));
    }

    #[test]
    fn signup_prefills_submitted_values_but_not_password() {
        let mut form = UserForm::default();
        form.username = "alice".to_string();
        form.password = Some("secret".to_string());

        let html = render(Page::Signup(SignupView::retry(form, sample_roles(), vec![])));

        assert!(html.contains("action=\"/signup\""));
        assert!(html.contains("value=\"alice\""));
        assert!(!html.contains("secret"));
    }

    #[test]
    fn list_shows_rows_with_actions() {
        let html = render(Page::UserForm(UserFormView::list(sample_context())));

        assert!(html.contains("<td>alice</td>"));
        assert!(html.contains("<td>USER</td>"));
        assert!(html.contains("href=\"/editUser/9\""));
        assert!(html.contains("href=\"/deleteUser/9\""));
    }

    #[test]
    fn create_form_posts_to_user_form_route_with_password() {
        let html = render(Page::UserForm(UserFormView::list(sample_context())));

        assert!(html.contains("action=\"/userForm\""));
        assert!(html.contains("name=\"password\""));
        assert!(!html.contains("/userForm/cancel"));
    }

    #[test]
    fn edit_form_posts_to_edit_route_without_password_input() {
        let form = UserForm::from_user(&sample_user());
        let html = render(Page::UserForm(UserFormView::edit(form, sample_context())));

        assert!(html.contains("action=\"/editUser\""));
        assert!(html.contains("name=\"id\" value=\"9\""));
        assert!(!html.contains("name=\"password\""));
        assert!(html.contains("/userForm/cancel"));
        assert!(html.contains("Change Password"));
        assert!(html.contains("name=\"new_password\""));
    }

    #[test]
    fn checked_roles_follow_the_form() {
        let mut form = UserForm::default();
        form.username = "alice".to_string();
        form.roles = vec!["ADMIN".to_string()];

        let html = render(Page::UserForm(UserFormView::form_retry(
            form,
            sample_context(),
            vec![],
        )));

        assert!(html.contains("value=\"ADMIN\" checked"));
        assert!(!html.contains("value=\"USER\" checked"));
    }

    #[test]
    fn escapes_markup_in_values() {
        assert_eq!(escape("a&b"), "a&amp;b");
        assert_eq!(escape("<b>\"x\"</b>"), "&lt;b&gt;&quot;x&quot;&lt;/b&gt;");

        let mut form = UserForm::default();
        form.username = "<script>".to_string();
        let html = render(Page::Signup(SignupView::retry(form, vec![], vec![])));

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let renderer = HtmlPages::new();
        assert!(renderer.render("missing", &ViewAttributes::new()).is_err());
    }

    #[test]
    fn error_page_shows_code_and_message() {
        let html = error_page("NOT_FOUND", "Resource not found");
        assert!(html.contains("NOT_FOUND"));
        assert!(html.contains("Resource not found"));
    }
}
