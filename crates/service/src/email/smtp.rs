use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use super::{EmailError, NotificationGateway, TemplateVariables};

/// SMTP gateway for real deliveries.
pub struct SmtpGateway {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpGateway {
    pub fn new(cfg: &configs::EmailConfig) -> Result<Self, EmailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
            .map_err(|e| EmailError::Transport(e.to_string()))?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(
                cfg.smtp_username.clone(),
                cfg.smtp_password.clone(),
            ))
            .build();
        Ok(Self { transport })
    }
}

/// Local stand-in for the provider-side templates: a short plain-text body
/// built from the template variables.
fn render_body(template_id: &str, vars: &TemplateVariables) -> String {
    if template_id.contains("reset") {
        format!(
            "Hi {},\n\nUse code {} to reset the password for {}.\n",
            vars.name, vars.code, vars.email
        )
    } else {
        format!(
            "Hi {},\n\nYour validation code is {}.\n",
            vars.name, vars.code
        )
    }
}

#[async_trait]
impl NotificationGateway for SmtpGateway {
    async fn send_email(
        &self,
        template_id: &str,
        variables: TemplateVariables,
        to: &str,
        from: &str,
        subject: &str,
    ) -> Result<(), EmailError> {
        let from = from
            .parse()
            .map_err(|e| EmailError::Address(format!("from: {e}")))?;
        let to_addr = to
            .parse()
            .map_err(|e| EmailError::Address(format!("to: {e}")))?;

        let message = Message::builder()
            .from(from)
            .to(to_addr)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(render_body(template_id, &variables))
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;
        debug!(template = %template_id, to = %to, "email handed to smtp relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_template_mentions_the_code() {
        let vars = TemplateVariables {
            name: "Ada".into(),
            email: "a@x.com".into(),
            code: "1234".into(),
        };
        let body = render_body("reset-password", &vars);
        assert!(body.contains("1234"));
        assert!(body.contains("reset"));
        let body = render_body("validation-code", &vars);
        assert!(body.contains("validation code is 1234"));
    }
}
