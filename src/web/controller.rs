//! User controller - Drives the signup and user management pages.
//!
//! SOLID (SRP): Translates workflow outcomes into views only.
//! Field-level workflow failures land back on the field that caused
//! them; general failures become banners on the page that was
//! submitted.

use std::sync::Arc;

use crate::config::ROLE_USER;
use crate::domain::{NewUser, Role};
use crate::errors::{AppError, AppResult};
use crate::infra::RoleRepository;
use crate::services::{UserWorkflow, WorkflowError};
use crate::web::binding::BindingResult;
use crate::web::forms::UserForm;
use crate::web::views::{FormContext, SignupView, UserFormView, View};

/// Drives every page of the application
pub struct UserController {
    workflow: Arc<dyn UserWorkflow>,
    roles: Arc<dyn RoleRepository>,
}

impl UserController {
    /// Create new controller instance
    pub fn new(workflow: Arc<dyn UserWorkflow>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { workflow, roles }
    }

    /// Landing page
    pub fn show_home(&self) -> View {
        View::home()
    }

    /// Signup page with an empty form and the default role on offer
    pub async fn show_signup(&self) -> AppResult<View> {
        let roles = self.signup_roles().await?;
        Ok(View::signup(SignupView::fresh(roles)))
    }

    /// Handle a signup submission.
    ///
    /// Whatever roles were submitted, a signup always gets the default
    /// USER role. Success lands on the home page; any failure re-renders
    /// the signup page with the submitted values preserved.
    pub async fn submit_signup(
        &self,
        form: UserForm,
        mut binding: BindingResult,
    ) -> AppResult<View> {
        if binding.has_errors() {
            let roles = self.signup_roles().await?;
            return Ok(View::signup(SignupView::retry(
                form,
                roles,
                binding.into_errors(),
            )));
        }

        let new_user = NewUser {
            roles: vec![ROLE_USER.to_string()],
            ..form.to_new_user()
        };

        match self.workflow.create_user(new_user).await {
            Ok(_) => Ok(View::home()),
            Err(WorkflowError::Field { field, message }) => {
                binding.reject(field, message);
                let roles = self.signup_roles().await?;
                Ok(View::signup(SignupView::retry(
                    form,
                    roles,
                    binding.into_errors(),
                )))
            }
            Err(err) => {
                let roles = self.signup_roles().await?;
                Ok(View::signup(SignupView::failed(form, roles, err.to_string())))
            }
        }
    }

    /// User management page with the list tab active
    pub async fn show_user_form(&self) -> AppResult<View> {
        let context = self.form_context().await?;
        Ok(View::user_form(UserFormView::list(context)))
    }

    /// User management page with an error banner above the list
    pub async fn user_list_with_error(&self, message: String) -> AppResult<View> {
        let context = self.form_context().await?;
        Ok(View::user_form(UserFormView::list_with_error(context, message)))
    }

    /// Handle a create submission from the user form tab
    pub async fn create_user(&self, form: UserForm, mut binding: BindingResult) -> AppResult<View> {
        if binding.has_errors() {
            let context = self.form_context().await?;
            return Ok(View::user_form(UserFormView::form_retry(
                form,
                context,
                binding.into_errors(),
            )));
        }

        match self.workflow.create_user(form.to_new_user()).await {
            Ok(_) => self.show_user_form().await,
            Err(WorkflowError::Field { field, message }) => {
                binding.reject(field, message);
                let context = self.form_context().await?;
                Ok(View::user_form(UserFormView::form_retry(
                    form,
                    context,
                    binding.into_errors(),
                )))
            }
            Err(err) => {
                let context = self.form_context().await?;
                Ok(View::user_form(UserFormView::form_failed(
                    form,
                    context,
                    err.to_string(),
                )))
            }
        }
    }

    /// Edit page for a stored user, form tab active and pre-filled
    pub async fn show_edit_form(&self, id: i64) -> AppResult<View> {
        let user = self.workflow.get_user(id).await?;
        let context = self.form_context().await?;
        Ok(View::user_form(UserFormView::edit(
            UserForm::from_user(&user),
            context,
        )))
    }

    /// Handle an edit submission
    pub async fn submit_edit(&self, form: UserForm, binding: BindingResult) -> AppResult<View> {
        if binding.has_errors() {
            let context = self.form_context().await?;
            return Ok(View::user_form(UserFormView::edit_retry(
                form,
                context,
                binding.into_errors(),
            )));
        }

        let update = match form.to_update() {
            Some(update) => update,
            None => {
                let context = self.form_context().await?;
                return Ok(View::user_form(UserFormView::edit_failed(
                    form,
                    context,
                    "Missing user id".to_string(),
                )));
            }
        };

        match self.workflow.update_user(update).await {
            Ok(()) => self.show_user_form().await,
            Err(err) => {
                let context = self.form_context().await?;
                Ok(View::user_form(UserFormView::edit_failed(
                    form,
                    context,
                    err.to_string(),
                )))
            }
        }
    }

    /// Abandon an edit and return to the list
    pub fn cancel_edit(&self) -> View {
        View::redirect("/userForm")
    }

    /// Handle a delete request.
    ///
    /// A missing user renders the list with a banner; anything else is
    /// a real failure.
    pub async fn delete_user(&self, id: i64) -> AppResult<View> {
        match self.workflow.delete_user(id).await {
            Ok(()) => self.show_user_form().await,
            Err(err @ WorkflowError::NotFound) => self.user_list_with_error(err.to_string()).await,
            Err(err) => Err(AppError::from(err)),
        }
    }

    /// The signup page only ever offers the default role
    async fn signup_roles(&self) -> AppResult<Vec<Role>> {
        let role = self
            .roles
            .find_by_name(ROLE_USER)
            .await?
            .ok_or_else(|| AppError::internal("Default role USER is not provisioned"))?;

        Ok(vec![role])
    }

    /// Users and roles backing the management page; fetched fresh after
    /// every mutation so the list tab reflects it
    async fn form_context(&self) -> AppResult<FormContext> {
        let users = self.workflow.list_users().await?;
        let roles = self.roles.find_all().await?;

        Ok(FormContext { users, roles })
    }
}
