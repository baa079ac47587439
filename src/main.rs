use std::sync::Arc;

use anyhow::{Context, anyhow};
use secrecy::SecretString;

use outreach::automation::{LeadPhotoStore, PollClient, ReplyClient};
use outreach::backend::{AuthClient, BackendClient};
use outreach::config::{ApiConfig, BackendConfig, PollConfig};
use outreach::dispatch::BulkDispatcher;
use outreach::error::ConfigError;
use outreach::model::ContactStatus;
use outreach::settings::SettingsStore;
use outreach::store::{ApiKeyStore, ContactStore, MessageStore};

const USAGE: &str = "usage: outreach <poll | reply <phone> | messages | lead-photo [out.png] | send <hot|cold> <template...>>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("help");

    let api = ApiConfig::from_env();
    let settings_store = SettingsStore::new(SettingsStore::default_path()?);

    match command {
        // ── Automation entry points ─────────────────────────────────
        "poll" => {
            let settings = settings_store.load()?;
            let poll = PollClient::new(api, PollConfig::default());
            println!("{}", poll.poll(&settings.api_key).await);
        }

        "reply" => {
            let phone = args.get(1).context("usage: outreach reply <phone-number>")?;
            let settings = settings_store.load()?;
            ReplyClient::new(api)
                .update_contact(&settings.api_key, phone)
                .await;
        }

        "messages" => {
            let settings = settings_store.load()?;
            let poll = PollClient::new(api, PollConfig::default());
            let messages = poll.queued_messages(&settings.api_key).await;
            eprintln!("{} queued message(s)", messages.len());
            for message in messages {
                println!("{}  {}", message.phone_number, message.message);
            }
        }

        "lead-photo" => {
            let out = args
                .get(1)
                .cloned()
                .unwrap_or_else(|| "lead-photo.png".to_string());
            let settings = settings_store.load()?;
            let photos = LeadPhotoStore::new(SettingsStore::default_data_dir()?.join("photos"));
            std::fs::write(&out, photos.load(&settings.lead_photo).await)?;
            eprintln!("Wrote {out}");
        }

        // ── Interactive bulk send ───────────────────────────────────
        "send" => {
            let status: ContactStatus = args
                .get(1)
                .context(USAGE)?
                .parse()
                .map_err(|e| anyhow!("{e}"))?;
            let template = args
                .get(2..)
                .filter(|rest| !rest.is_empty())
                .map(|rest| rest.join(" "))
                .context(USAGE)?;

            let backend_config = BackendConfig::from_env()?;
            let email = std::env::var("OUTREACH_EMAIL")
                .map_err(|_| ConfigError::MissingEnvVar("OUTREACH_EMAIL".into()))?;
            let password = SecretString::from(
                std::env::var("OUTREACH_PASSWORD")
                    .map_err(|_| ConfigError::MissingEnvVar("OUTREACH_PASSWORD".into()))?,
            );

            let auth = Arc::new(AuthClient::new(backend_config.clone()));
            auth.sign_in(&email, &password).await?;
            let user_id = auth.user_id().await?;

            let backend = Arc::new(BackendClient::new(backend_config, Arc::clone(&auth)));
            let contacts = ContactStore::new(Arc::clone(&backend));
            let recipients = contacts.list_by_status(status).await?;
            eprintln!("Sending to {} {status} contact(s)", recipients.len());

            let dispatcher =
                BulkDispatcher::new(Arc::new(MessageStore::new(Arc::clone(&backend))));
            let mut outcome = dispatcher.dispatch(&recipients, &template, user_id).await;
            if outcome.sent.is_empty() && !outcome.failed.is_empty() {
                eprintln!("Batch rejected, retrying per recipient");
                outcome = dispatcher
                    .dispatch_individually(&recipients, &template, user_id)
                    .await;
            }

            for failure in &outcome.failed {
                eprintln!("  failed {}: {}", failure.recipient.phone_number, failure.reason);
            }
            eprintln!(
                "Sent {} message(s), {} failure(s)",
                outcome.sent.len(),
                outcome.failed.len()
            );

            // Defined refresh trigger for the cached automation key.
            let keys = ApiKeyStore::new(backend);
            if let Err(e) = settings_store.refresh_api_key(&keys, user_id).await {
                tracing::warn!(error = %e, "Could not refresh cached API key");
            }

            auth.sign_out().await.ok();
        }

        _ => {
            eprintln!("outreach v{}", env!("CARGO_PKG_VERSION"));
            eprintln!("{USAGE}");
        }
    }

    Ok(())
}
