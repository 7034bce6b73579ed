//! Staff notification dispatcher.
//!
//! Builds the "new volunteer" message and hands it to the configured
//! transport. An empty recipient list disables notifications entirely;
//! `fail_silently` decides whether transport failures are swallowed here or
//! surfaced to the signup service. Either way the stored submission stands.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::Volunteer;
use crate::domain::ports::{NotificationError, SignupNotifier};

use super::transport::{MailTransport, OutgoingEmail};

/// Dispatcher configuration, derived from the environment at startup.
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    /// Sender address.
    pub from: String,
    /// Staff addresses to alert; empty disables the dispatcher.
    pub recipients: Vec<String>,
    /// Swallow transport failures instead of surfacing them.
    pub fail_silently: bool,
}

/// [`SignupNotifier`] implementation emailing the configured staff list.
pub struct EmailNotifier {
    transport: Arc<dyn MailTransport>,
    settings: NotificationSettings,
}

impl EmailNotifier {
    /// Wire the dispatcher to a transport and its settings.
    pub fn new(transport: Arc<dyn MailTransport>, settings: NotificationSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }
}

fn compose(from: &str, recipients: &[String], volunteer: &Volunteer) -> OutgoingEmail {
    let subject = format!("Novo voluntário cadastrado: {}", volunteer.nome.as_str());
    let text_body = format!(
        "Um novo voluntário se cadastrou pelo site.\n\n\
         Nome: {nome}\n\
         E-mail: {email}\n\
         WhatsApp: {telefone}\n\
         Endereço: {endereco}\n\
         Cidade: {cidade}\n\
         Área: {area}\n\
         Cadastrado em: {created_at}\n",
        nome = volunteer.nome.as_str(),
        email = volunteer.email.as_str(),
        telefone = volunteer.telefone.as_str(),
        endereco = volunteer.endereco.as_str(),
        cidade = volunteer.cidade,
        area = volunteer.area,
        created_at = volunteer.created_at.format("%d/%m/%Y %H:%M UTC"),
    );
    OutgoingEmail {
        from: from.to_owned(),
        to: recipients.to_vec(),
        subject,
        text_body,
    }
}

#[async_trait]
impl SignupNotifier for EmailNotifier {
    async fn notify(&self, volunteer: &Volunteer) -> Result<(), NotificationError> {
        if self.settings.recipients.is_empty() {
            debug!("no staff recipients configured; skipping notification");
            return Ok(());
        }

        let email = compose(&self.settings.from, &self.settings.recipients, volunteer);
        match self.transport.send(&email).await {
            Ok(()) => Ok(()),
            Err(err) if self.settings.fail_silently => {
                warn!(error = %err, "staff notification failed (silenced)");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
