use async_trait::async_trait;
use tracing::info;

use super::{EmailError, NotificationGateway, TemplateVariables};

/// Log-only gateway used when SMTP is not configured (local development).
pub struct ConsoleGateway;

#[async_trait]
impl NotificationGateway for ConsoleGateway {
    async fn send_email(
        &self,
        template_id: &str,
        variables: TemplateVariables,
        to: &str,
        from: &str,
        subject: &str,
    ) -> Result<(), EmailError> {
        info!(
            template = %template_id,
            to = %to,
            from = %from,
            subject = %subject,
            code = %variables.code,
            "console gateway: email not actually sent"
        );
        Ok(())
    }
}
