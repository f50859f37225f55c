//! Integration tests for the page controller.
//!
//! These tests drive the controller with trait doubles, checking which
//! page every operation lands on and what state it carries.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use validator::Validate;

use user_management::domain::{NewUser, Role, User, UserUpdate};
use user_management::errors::{AppError, AppResult};
use user_management::infra::RoleRepository;
use user_management::services::{UserWorkflow, WorkflowError, WorkflowResult};
use user_management::web::binding::BindingResult;
use user_management::web::forms::UserForm;
use user_management::web::views::{Page, Tab, View};
use user_management::web::UserController;

// =============================================================================
// Test Doubles
// =============================================================================

/// Role repository double with the two stock roles
struct StubRoles;

#[async_trait]
impl RoleRepository for StubRoles {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(match name {
            "USER" => Some(Role {
                id: 1,
                name: "USER".to_string(),
            }),
            "ADMIN" => Some(Role {
                id: 2,
                name: "ADMIN".to_string(),
            }),
            _ => None,
        })
    }

    async fn find_all(&self) -> AppResult<Vec<Role>> {
        Ok(vec![
            Role {
                id: 1,
                name: "USER".to_string(),
            },
            Role {
                id: 2,
                name: "ADMIN".to_string(),
            },
        ])
    }
}

/// Workflow double returning predefined outcomes
#[derive(Default)]
struct StubWorkflow {
    users: Vec<User>,
    create_error: Option<WorkflowError>,
    update_error: Option<WorkflowError>,
    delete_error: Option<WorkflowError>,
}

#[async_trait]
impl UserWorkflow for StubWorkflow {
    async fn create_user(&self, new_user: NewUser) -> WorkflowResult<User> {
        if let Some(err) = &self.create_error {
            return Err(err.clone());
        }
        Ok(test_user(1, &new_user.profile.username))
    }

    async fn update_user(&self, _update: UserUpdate) -> WorkflowResult<()> {
        match &self.update_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn delete_user(&self, _id: i64) -> WorkflowResult<()> {
        match &self.delete_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn get_user(&self, id: i64) -> WorkflowResult<User> {
        self.users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(WorkflowError::NotFound)
    }

    async fn list_users(&self) -> WorkflowResult<Vec<User>> {
        Ok(self.users.clone())
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn test_user(id: i64, username: &str) -> User {
    let now = Utc::now();
    User {
        id,
        username: username.to_string(),
        password_hash: "hash".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: "test@example.com".to_string(),
        roles: vec![Role {
            id: 1,
            name: "USER".to_string(),
        }],
        created_at: now,
        updated_at: now,
    }
}

fn controller(workflow: StubWorkflow) -> UserController {
    UserController::new(Arc::new(workflow), Arc::new(StubRoles))
}

/// Bind a form the way the request extractor does
fn bind(form: &UserForm) -> BindingResult {
    match form.validate() {
        Ok(()) => BindingResult::clean(),
        Err(errors) => BindingResult::from_validation(&errors),
    }
}

// =============================================================================
// Home and Signup Page Tests
// =============================================================================

#[tokio::test]
async fn test_home_is_the_index_view() {
    let controller = controller(StubWorkflow::default());
    assert!(matches!(controller.show_home(), View::Page(Page::Home)));
}

#[tokio::test]
async fn test_signup_page_offers_only_the_default_role() {
    let controller = controller(StubWorkflow::default());
    let view = controller.show_signup().await.unwrap();

    match view {
        View::Page(Page::Signup(signup)) => {
            assert_eq!(signup.roles.len(), 1);
            assert_eq!(signup.roles[0].name, "USER");
            assert!(signup.form.username.is_empty());
            assert!(signup.field_errors.is_empty());
        }
        other => panic!("Expected signup page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_signup_success_lands_on_home() {
    let controller = controller(StubWorkflow::default());
    let form = UserForm {
        username: "alice".to_string(),
        password: Some("secret".to_string()),
        ..Default::default()
    };
    let binding = bind(&form);

    let view = controller.submit_signup(form, binding).await.unwrap();
    assert!(matches!(view, View::Page(Page::Home)));
}

#[tokio::test]
async fn test_signup_duplicate_username_returns_field_error() {
    let workflow = StubWorkflow {
        create_error: Some(WorkflowError::Field {
            field: "username",
            message: "Username is not available".to_string(),
        }),
        ..Default::default()
    };
    let controller = controller(workflow);
    let form = UserForm {
        username: "alice".to_string(),
        password: Some("secret".to_string()),
        ..Default::default()
    };
    let binding = bind(&form);

    let view = controller.submit_signup(form, binding).await.unwrap();

    match view {
        View::Page(Page::Signup(signup)) => {
            assert_eq!(signup.form.username, "alice");
            assert_eq!(signup.field_errors.len(), 1);
            assert_eq!(signup.field_errors[0].field, "username");
            assert_eq!(signup.field_errors[0].message, "Username is not available");
            assert!(signup.form_error.is_none());
        }
        other => panic!("Expected signup page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_signup_structural_errors_rerender_with_values() {
    let controller = controller(StubWorkflow::default());
    let form = UserForm {
        email: "alice@example.com".to_string(),
        ..Default::default()
    };
    let binding = bind(&form);
    assert!(binding.has_errors());

    let view = controller.submit_signup(form, binding).await.unwrap();

    match view {
        View::Page(Page::Signup(signup)) => {
            assert_eq!(signup.field_errors[0].message, "Username is required");
            assert_eq!(signup.form.email, "alice@example.com");
        }
        other => panic!("Expected signup page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_signup_general_failure_banners_the_form() {
    let workflow = StubWorkflow {
        create_error: Some(WorkflowError::General("A database error occurred".to_string())),
        ..Default::default()
    };
    let controller = controller(workflow);
    let form = UserForm {
        username: "alice".to_string(),
        password: Some("secret".to_string()),
        ..Default::default()
    };
    let binding = bind(&form);

    let view = controller.submit_signup(form, binding).await.unwrap();

    match view {
        View::Page(Page::Signup(signup)) => {
            assert_eq!(
                signup.form_error,
                Some("A database error occurred".to_string())
            );
            assert!(signup.field_errors.is_empty());
        }
        other => panic!("Expected signup page, got {:?}", other),
    }
}

// =============================================================================
// User Form Page Tests
// =============================================================================

#[tokio::test]
async fn test_user_form_defaults_to_list_tab() {
    let workflow = StubWorkflow {
        users: vec![test_user(1, "alice")],
        ..Default::default()
    };
    let controller = controller(workflow);

    let view = controller.show_user_form().await.unwrap();

    match view {
        View::Page(Page::UserForm(page)) => {
            assert_eq!(page.tab, Tab::List);
            assert!(!page.edit_mode);
            assert_eq!(page.context.users.len(), 1);
            assert_eq!(page.context.roles.len(), 2);
            assert!(page.list_error.is_none());
        }
        other => panic!("Expected user form page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_success_returns_to_the_list() {
    let controller = controller(StubWorkflow::default());
    let form = UserForm {
        username: "bob".to_string(),
        password: Some("hunter2".to_string()),
        ..Default::default()
    };
    let binding = bind(&form);

    let view = controller.create_user(form, binding).await.unwrap();

    match view {
        View::Page(Page::UserForm(page)) => {
            assert_eq!(page.tab, Tab::List);
            assert!(page.form.username.is_empty());
        }
        other => panic!("Expected user form page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_failure_stays_on_form_tab() {
    let workflow = StubWorkflow {
        create_error: Some(WorkflowError::Field {
            field: "username",
            message: "Username is not available".to_string(),
        }),
        ..Default::default()
    };
    let controller = controller(workflow);
    let form = UserForm {
        username: "bob".to_string(),
        password: Some("hunter2".to_string()),
        ..Default::default()
    };
    let binding = bind(&form);

    let view = controller.create_user(form, binding).await.unwrap();

    match view {
        View::Page(Page::UserForm(page)) => {
            assert_eq!(page.tab, Tab::Form);
            assert_eq!(page.form.username, "bob");
            assert_eq!(page.field_errors.len(), 1);
            assert_eq!(page.field_errors[0].field, "username");
        }
        other => panic!("Expected user form page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_structural_errors_rerender_the_form_tab() {
    let controller = controller(StubWorkflow::default());
    let form = UserForm {
        first_name: "Bob".to_string(),
        email: "bob@example.com".to_string(),
        ..Default::default()
    };
    let binding = bind(&form);
    assert!(binding.has_errors());

    let view = controller.create_user(form, binding).await.unwrap();

    match view {
        View::Page(Page::UserForm(page)) => {
            assert_eq!(page.tab, Tab::Form);
            assert!(!page.edit_mode);
            assert_eq!(page.form.first_name, "Bob");
            assert_eq!(page.form.email, "bob@example.com");
            assert_eq!(page.field_errors.len(), 1);
            assert_eq!(page.field_errors[0].field, "username");
            assert_eq!(page.field_errors[0].message, "Username is required");
        }
        other => panic!("Expected user form page, got {:?}", other),
    }
}

// =============================================================================
// Edit Tests
// =============================================================================

#[tokio::test]
async fn test_edit_form_preloads_the_user() {
    let workflow = StubWorkflow {
        users: vec![test_user(7, "alice")],
        ..Default::default()
    };
    let controller = controller(workflow);

    let view = controller.show_edit_form(7).await.unwrap();

    match view {
        View::Page(Page::UserForm(page)) => {
            assert_eq!(page.tab, Tab::Form);
            assert!(page.edit_mode);
            assert_eq!(page.form.id, Some(7));
            assert_eq!(page.form.username, "alice");
            assert!(page.form.password.is_none());
            assert_eq!(page.password_form.as_ref().unwrap().id, 7);
        }
        other => panic!("Expected user form page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_edit_missing_user_is_not_found() {
    let controller = controller(StubWorkflow::default());
    let err = controller.show_edit_form(42).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_edit_submission_failure_banners_the_edit_form() {
    let workflow = StubWorkflow {
        update_error: Some(WorkflowError::General("Username is not available".to_string())),
        ..Default::default()
    };
    let controller = controller(workflow);
    let form = UserForm {
        id: Some(7),
        username: "alice".to_string(),
        ..Default::default()
    };
    let binding = bind(&form);

    let view = controller.submit_edit(form, binding).await.unwrap();

    match view {
        View::Page(Page::UserForm(page)) => {
            assert!(page.edit_mode);
            assert_eq!(page.form_error, Some("Username is not available".to_string()));
            assert_eq!(page.form.username, "alice");
        }
        other => panic!("Expected user form page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_edit_without_id_banners_the_edit_form() {
    let controller = controller(StubWorkflow::default());
    let form = UserForm {
        username: "alice".to_string(),
        ..Default::default()
    };
    let binding = bind(&form);

    let view = controller.submit_edit(form, binding).await.unwrap();

    match view {
        View::Page(Page::UserForm(page)) => {
            assert!(page.edit_mode);
            assert_eq!(page.form_error, Some("Missing user id".to_string()));
        }
        other => panic!("Expected user form page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_edit_redirects_to_the_list() {
    let controller = controller(StubWorkflow::default());

    match controller.cancel_edit() {
        View::Redirect(location) => assert_eq!(location, "/userForm"),
        other => panic!("Expected redirect, got {:?}", other),
    }
}

// =============================================================================
// Delete Tests
// =============================================================================

#[tokio::test]
async fn test_delete_success_returns_to_the_list() {
    let workflow = StubWorkflow {
        users: vec![test_user(1, "alice")],
        ..Default::default()
    };
    let controller = controller(workflow);

    let view = controller.delete_user(1).await.unwrap();

    match view {
        View::Page(Page::UserForm(page)) => {
            assert_eq!(page.tab, Tab::List);
            assert!(page.list_error.is_none());
        }
        other => panic!("Expected user form page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_missing_user_banners_the_list() {
    let workflow = StubWorkflow {
        delete_error: Some(WorkflowError::NotFound),
        ..Default::default()
    };
    let controller = controller(workflow);

    let view = controller.delete_user(99).await.unwrap();

    match view {
        View::Page(Page::UserForm(page)) => {
            assert_eq!(page.tab, Tab::List);
            assert_eq!(page.list_error, Some("User not found".to_string()));
        }
        other => panic!("Expected user form page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_other_failure_is_an_error() {
    let workflow = StubWorkflow {
        delete_error: Some(WorkflowError::General("A database error occurred".to_string())),
        ..Default::default()
    };
    let controller = controller(workflow);

    let err = controller.delete_user(1).await.unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));
}
