#![doc(test(attr(deny(warnings))))]

//! Benefits Core models a multi-step benefits application as a tree of
//! validated fields, with cascading rules between fields, a step wizard,
//! review-screen projections and submission assembly.

pub mod application;
pub mod cascade;
pub mod config;
pub mod errors;
pub mod form;
pub mod projection;
pub mod reference;
pub mod session;
pub mod submission;
pub mod utils;
pub mod validation;
pub mod wizard;

pub use application::{build_application_form, ApplicationType, Section};
pub use errors::{FormError, Result};
pub use form::{Control, Field, FieldPath, FormTree, Group, RepeatedGroup, Value};
pub use session::ApplicationSession;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Benefits Core tracing initialized.");
    });
}
