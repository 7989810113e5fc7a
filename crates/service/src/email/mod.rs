//! Notification gateway: templated outbound email.
//!
//! Callers treat delivery as fire-and-forget; errors returned here are
//! logged by the dispatcher and never fail the parent operation.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::error;

pub mod console;
pub mod smtp;

pub use console::ConsoleGateway;
pub use smtp::SmtpGateway;

/// Variables substituted into the provider-side template.
#[derive(Debug, Clone)]
pub struct TemplateVariables {
    pub name: String,
    pub email: String,
    pub code: String,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("invalid address: {0}")]
    Address(String),
    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send_email(
        &self,
        template_id: &str,
        variables: TemplateVariables,
        to: &str,
        from: &str,
        subject: &str,
    ) -> Result<(), EmailError>;
}

/// Spawn a delivery in the background. A slow or failing gateway must never
/// block or fail the calling operation; errors are logged only.
pub fn dispatch(
    gateway: Arc<dyn NotificationGateway>,
    template_id: &str,
    variables: TemplateVariables,
    to: &str,
    from: &str,
    subject: &str,
) {
    let template_id = template_id.to_string();
    let to = to.to_string();
    let from = from.to_string();
    let subject = subject.to_string();
    tokio::spawn(async move {
        if let Err(e) = gateway
            .send_email(&template_id, variables, &to, &from, &subject)
            .await
        {
            error!(error = %e, recipient = %to, template = %template_id, "email dispatch failed");
        }
    });
}

/// Test doubles: a gateway that records what it was asked to send, and one
/// that always fails.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct SentEmail {
        pub template_id: String,
        pub variables_code: String,
        pub variables_name: String,
        pub to: String,
        pub from: String,
        pub subject: String,
    }

    #[derive(Default)]
    pub struct RecordingGateway {
        pub sent: Mutex<Vec<SentEmail>>,
    }

    impl RecordingGateway {
        pub fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl NotificationGateway for RecordingGateway {
        async fn send_email(
            &self,
            template_id: &str,
            variables: TemplateVariables,
            to: &str,
            from: &str,
            subject: &str,
        ) -> Result<(), EmailError> {
            self.sent.lock().unwrap().push(SentEmail {
                template_id: template_id.to_string(),
                variables_code: variables.code,
                variables_name: variables.name,
                to: to.to_string(),
                from: from.to_string(),
                subject: subject.to_string(),
            });
            Ok(())
        }
    }

    pub struct FailingGateway;

    #[async_trait]
    impl NotificationGateway for FailingGateway {
        async fn send_email(
            &self,
            _template_id: &str,
            _variables: TemplateVariables,
            _to: &str,
            _from: &str,
            _subject: &str,
        ) -> Result<(), EmailError> {
            Err(EmailError::Transport("gateway down".into()))
        }
    }
}
