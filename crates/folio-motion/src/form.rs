//! Contact form validation and submission feedback.
//!
//! Submission never leaves the page: a valid form is cleared and a success
//! indicator is shown for five seconds.

use crate::host::{FrameScheduler, HostRef, TimerId};
use crate::surface::SurfaceRef;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

/// How long the success indicator stays visible
pub const SUCCESS_VISIBLE_MS: f64 = 5000.0;

/// Class that reveals error and success indicators
pub const SHOW_CLASS: &str = "show";

#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid literal")
});

/// Whether `email` looks like `local@domain.tld`.
///
/// Shape check only: one `@`, a dot in the domain part, no whitespace.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Fields of the contact form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    /// Sender name
    Name,
    /// Sender email
    Email,
    /// Message subject
    Subject,
    /// Message body
    Message,
}

impl FormField {
    /// Every field, in form order
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    /// Input id
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    /// Id of the error element under the input
    #[must_use]
    pub const fn error_id(self) -> &'static str {
        match self {
            Self::Name => "nameError",
            Self::Email => "emailError",
            Self::Subject => "subjectError",
            Self::Message => "messageError",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One failed field check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Offending field
    pub field: FormField,
    /// Message shown to the visitor
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Current contents of the contact form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Message subject
    pub subject: String,
    /// Message body
    pub message: String,
}

impl ContactForm {
    /// Create a filled form
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Value of one field
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Subject => &self.subject,
            FormField::Message => &self.message,
        }
    }

    /// Check every field, returning one error per invalid field.
    ///
    /// Presence is checked on trimmed values; the email shape is checked on
    /// the raw value.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let blank = |s: &str| s.trim().is_empty();

        if blank(&self.name) {
            errors.push(FieldError {
                field: FormField::Name,
                message: "Please enter your name",
            });
        }
        if blank(&self.email) {
            errors.push(FieldError {
                field: FormField::Email,
                message: "Please enter your email",
            });
        } else if !is_valid_email(&self.email) {
            errors.push(FieldError {
                field: FormField::Email,
                message: "Please enter a valid email",
            });
        }
        if blank(&self.subject) {
            errors.push(FieldError {
                field: FormField::Subject,
                message: "Please enter a subject",
            });
        }
        if blank(&self.message) {
            errors.push(FieldError {
                field: FormField::Message,
                message: "Please enter your message",
            });
        }
        errors
    }

    /// Whether every field passes
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Clear every field
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Result of a submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Form was valid, cleared and acknowledged
    Accepted,
    /// Form was left as is
    Rejected(Vec<FieldError>),
}

impl Submission {
    /// Whether the form was accepted
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Drives the form's error and success indicators.
pub struct ContactFormController {
    host: HostRef,
    success: SurfaceRef,
    errors: HashMap<FormField, SurfaceRef>,
    hide_timer: Rc<Cell<Option<TimerId>>>,
}

impl fmt::Debug for ContactFormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactFormController")
            .field("success", &self.success.id())
            .field("error_slots", &self.errors.len())
            .field("hide_timer", &self.hide_timer.get())
            .finish_non_exhaustive()
    }
}

impl ContactFormController {
    /// Create a controller showing success on `success`
    #[must_use]
    pub fn new(host: HostRef, success: SurfaceRef) -> Self {
        Self {
            host,
            success,
            errors: HashMap::new(),
            hide_timer: Rc::new(Cell::new(None)),
        }
    }

    /// Show errors for `field` on `surface`
    #[must_use]
    pub fn with_error_slot(mut self, field: FormField, surface: SurfaceRef) -> Self {
        self.errors.insert(field, surface);
        self
    }

    /// Validate and submit `form`.
    ///
    /// Previous error indicators are hidden first. On success the form is
    /// cleared and the success indicator shown; a resubmission while it is
    /// showing restarts its five seconds.
    pub fn submit(&self, form: &mut ContactForm) -> Submission {
        for slot in self.errors.values() {
            slot.remove_class(SHOW_CLASS);
        }

        let errors = form.validate();
        if !errors.is_empty() {
            for error in &errors {
                if let Some(slot) = self.errors.get(&error.field) {
                    slot.set_text(error.message);
                    slot.add_class(SHOW_CLASS);
                }
            }
            tracing::debug!(errors = errors.len(), "contact form rejected");
            return Submission::Rejected(errors);
        }

        self.success.add_class(SHOW_CLASS);
        form.reset();

        if let Some(previous) = self.hide_timer.take() {
            self.host.clear_timeout(previous);
        }
        let success = Rc::clone(&self.success);
        let slot = Rc::clone(&self.hide_timer);
        let timer = self.host.set_timeout(
            SUCCESS_VISIBLE_MS,
            Box::new(move || {
                success.remove_class(SHOW_CLASS);
                slot.set(None);
            }),
        );
        self.hide_timer.set(Some(timer));
        tracing::debug!("contact form accepted");
        Submission::Accepted
    }
}

/// Mark an input's wrapper as focused
pub fn on_input_focus(wrapper: &SurfaceRef) {
    wrapper.add_class("focused");
}

/// Drop the focused mark when the input is left empty
pub fn on_input_blur(wrapper: &SurfaceRef, value: &str) {
    if value.is_empty() {
        wrapper.remove_class("focused");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::host::SimulatedHost;
    use crate::surface::{RecordingSurface, Surface};

    fn filled() -> ContactForm {
        ContactForm::new("Ada", "ada@example.com", "Hello", "Nice portfolio")
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_empty_form_has_four_errors() {
        let errors = ContactForm::default().validate();
        let fields: Vec<FormField> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, FormField::ALL.to_vec());
        assert_eq!(errors[1].message, "Please enter your email");
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let form = ContactForm::new("   ", "ada@example.com", "\t", "ok");
        let fields: Vec<FormField> = form.validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![FormField::Name, FormField::Subject]);
    }

    #[test]
    fn test_whitespace_only_form_reports_every_field() {
        let form = ContactForm::new("  ", " \t ", "\n", "   ");
        let errors = form.validate();
        let fields: Vec<FormField> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, FormField::ALL.to_vec());
        assert_eq!(errors[1].message, "Please enter your email");
    }

    #[test]
    fn test_spaced_email_is_invalid() {
        let mut form = filled();
        form.email = "a b@c.com".into();
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, FormField::Email);
        assert_eq!(errors[0].message, "Please enter a valid email");
    }

    #[test]
    fn test_invalid_email_message() {
        let mut form = filled();
        form.email = "not-an-email".into();
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Please enter a valid email");
        assert_eq!(errors[0].to_string(), "email: Please enter a valid email");
    }

    #[test]
    fn test_field_ids() {
        assert_eq!(FormField::Subject.id(), "subject");
        assert_eq!(FormField::Message.error_id(), "messageError");
    }

    fn controller() -> (
        Rc<SimulatedHost>,
        Rc<RecordingSurface>,
        Rc<RecordingSurface>,
        ContactFormController,
    ) {
        let host = SimulatedHost::shared();
        let success = RecordingSurface::new().shared();
        let name_error = RecordingSurface::new().shared();
        let controller = ContactFormController::new(host.clone(), success.clone())
            .with_error_slot(FormField::Name, name_error.clone());
        (host, success, name_error, controller)
    }

    #[test]
    fn test_valid_submit_shows_success_and_clears() {
        let (host, success, _, controller) = controller();
        let mut form = filled();

        assert!(controller.submit(&mut form).is_accepted());
        assert!(success.has_class(SHOW_CLASS));
        assert_eq!(form, ContactForm::default());

        host.advance_to(4999.0);
        assert!(success.has_class(SHOW_CLASS));
        host.advance_to(5000.0);
        assert!(!success.has_class(SHOW_CLASS));
    }

    #[test]
    fn test_invalid_submit_shows_errors_and_keeps_form() {
        let (_, success, name_error, controller) = controller();
        let mut form = filled();
        form.name.clear();

        match controller.submit(&mut form) {
            Submission::Rejected(errors) => assert_eq!(errors.len(), 1),
            Submission::Accepted => panic!("blank name accepted"),
        }
        assert!(!success.has_class(SHOW_CLASS));
        assert!(name_error.has_class(SHOW_CLASS));
        assert_eq!(name_error.text(), "Please enter your name");
        assert_eq!(form.email, "ada@example.com");

        form.name = "Ada".into();
        assert!(controller.submit(&mut form).is_accepted());
        assert!(!name_error.has_class(SHOW_CLASS));
    }

    #[test]
    fn test_empty_submit_fills_every_error_slot() {
        let host = SimulatedHost::shared();
        let success = RecordingSurface::new().shared();
        let slots: Vec<(FormField, Rc<RecordingSurface>)> = FormField::ALL
            .iter()
            .map(|&field| (field, RecordingSurface::new().shared()))
            .collect();
        let controller = slots.iter().fold(
            ContactFormController::new(host.clone(), success.clone()),
            |controller, (field, slot)| controller.with_error_slot(*field, slot.clone()),
        );

        let mut form = ContactForm::default();
        let Submission::Rejected(errors) = controller.submit(&mut form) else {
            panic!("empty form accepted");
        };
        assert_eq!(errors.len(), 4);

        let shown: Vec<String> = slots.iter().map(|(_, slot)| slot.text()).collect();
        assert_eq!(
            shown,
            vec![
                "Please enter your name",
                "Please enter your email",
                "Please enter a subject",
                "Please enter your message",
            ]
        );
        assert!(slots.iter().all(|(_, slot)| slot.has_class(SHOW_CLASS)));

        host.advance_to(10_000.0);
        assert!(!success.has_class(SHOW_CLASS));
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn test_resubmit_restarts_hide_timer() {
        let (host, success, _, controller) = controller();
        controller.submit(&mut filled());
        host.advance_to(3000.0);
        controller.submit(&mut filled());
        assert_eq!(host.pending_timers(), 1);

        host.advance_to(5000.0);
        assert!(success.has_class(SHOW_CLASS));
        host.advance_to(8000.0);
        assert!(!success.has_class(SHOW_CLASS));
    }

    #[test]
    fn test_focus_blur() {
        let wrapper: SurfaceRef = RecordingSurface::new().shared();
        on_input_focus(&wrapper);
        assert!(wrapper.has_class("focused"));
        on_input_blur(&wrapper, "typed");
        assert!(wrapper.has_class("focused"));
        on_input_blur(&wrapper, "");
        assert!(!wrapper.has_class("focused"));
    }
}
