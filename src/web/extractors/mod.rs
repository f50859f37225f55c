//! Custom request extractors

mod bound_form;

pub use bound_form::BoundForm;
