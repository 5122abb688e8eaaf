//! Contact form workflow
//!
//! A successful send clears the form at once and shows a success banner for
//! a fixed window (3 seconds by default). The banner is a deadline on the
//! tokio clock rather than a background task.

use pw_common::api::ContactMessage;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::backend::Backend;
use crate::error::{ClientError, Result};

pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 3] = [ContactField::Name, ContactField::Email, ContactField::Message];

    pub fn label(self) -> &'static str {
        match self {
            ContactField::Name => "Name",
            ContactField::Email => "Email",
            ContactField::Message => "Message",
        }
    }
}

pub struct ContactController {
    backend: Arc<dyn Backend>,
    form: ContactMessage,
    banner_duration: Duration,
    success_until: Option<Instant>,
}

impl ContactController {
    pub fn new(backend: Arc<dyn Backend>, banner_duration: Duration) -> Self {
        Self {
            backend,
            form: ContactMessage::default(),
            banner_duration,
            success_until: None,
        }
    }

    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.form.name,
            ContactField::Email => &self.form.email,
            ContactField::Message => &self.form.message,
        }
    }

    fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.form.name,
            ContactField::Email => &mut self.form.email,
            ContactField::Message => &mut self.form.message,
        }
    }

    /// Send the form
    ///
    /// Every field is required. On failure the form is left untouched so the
    /// user can resend.
    pub async fn submit(&mut self) -> Result<()> {
        if let Some(field) = ContactField::ALL
            .into_iter()
            .find(|f| self.get(*f).trim().is_empty())
        {
            let message = format!("Please fill in the {} field.", field.label());
            warn!(error = %message, "Contact form rejected");
            return Err(ClientError::Validation(message));
        }

        if let Err(e) = self.backend.send_contact(&self.form).await {
            error!(kind = e.kind(), "Contact error: {}", e);
            return Err(e);
        }

        self.form = ContactMessage::default();
        self.success_until = Some(Instant::now() + self.banner_duration);
        info!("Contact message delivered");
        Ok(())
    }

    pub fn success_visible(&self) -> bool {
        self.success_until
            .map_or(false, |deadline| Instant::now() < deadline)
    }

    /// Banner text while visible
    pub fn success_banner(&self) -> Option<&'static str> {
        self.success_visible().then_some(SUCCESS_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, Failure};

    fn filled(controller: &mut ContactController) {
        controller.set(ContactField::Name, "Ada");
        controller.set(ContactField::Email, "ada@example.com");
        controller.set(ContactField::Message, "Hello there");
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_clears_form_and_banner_hides_after_three_seconds() {
        let fake = Arc::new(FakeBackend::new());
        let mut contact = ContactController::new(fake.clone(), Duration::from_secs(3));
        filled(&mut contact);

        contact.submit().await.unwrap();

        for field in ContactField::ALL {
            assert_eq!(contact.get(field), "");
        }
        assert_eq!(contact.success_banner(), Some(SUCCESS_MESSAGE));

        tokio::time::advance(Duration::from_millis(2999)).await;
        assert!(contact.success_visible());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!contact.success_visible());
        assert!(contact.success_banner().is_none());

        let sent = fake.contacts();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].email, "ada@example.com");
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_success_restarts_banner_window() {
        let fake = Arc::new(FakeBackend::new());
        let mut contact = ContactController::new(fake, Duration::from_secs(3));

        filled(&mut contact);
        contact.submit().await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;

        filled(&mut contact);
        contact.submit().await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(contact.success_visible());
    }

    #[tokio::test]
    async fn test_failure_keeps_fields_and_no_banner() {
        let fake = Arc::new(FakeBackend::new().contact_fails(Failure::Network));
        let mut contact = ContactController::new(fake, Duration::from_secs(3));
        filled(&mut contact);

        let result = contact.submit().await;

        assert!(matches!(result, Err(ClientError::Network(_))));
        assert_eq!(contact.get(ContactField::Name), "Ada");
        assert!(!contact.success_visible());
    }

    #[tokio::test]
    async fn test_blank_field_rejected_without_request() {
        let fake = Arc::new(FakeBackend::new());
        let mut contact = ContactController::new(fake.clone(), Duration::from_secs(3));
        filled(&mut contact);
        contact.set(ContactField::Email, "  ");

        let result = contact.submit().await;

        match result {
            Err(ClientError::Validation(msg)) => assert_eq!(msg, "Please fill in the Email field."),
            other => panic!("Expected validation error, got {:?}", other),
        }
        assert!(fake.contacts().is_empty());
    }
}
