use crate::{
    database::{collections, JsonStore},
    models::{ClientEmail, RecordKey},
    utils::{ids, validation, AppError},
};

pub enum LogOutcome {
    Logged(ClientEmail),
    AlreadyLogged,
}

/// Records who opened a review link. Each `(feed, email)` pair is kept once.
pub async fn log_client_email(
    store: &JsonStore,
    feed_id: Option<RecordKey>,
    email: Option<String>,
) -> Result<LogOutcome, AppError> {
    let (feed_id, email) = match (feed_id, email) {
        (Some(feed_id), Some(email)) if !feed_id.is_blank() && !email.is_empty() => (feed_id, email),
        _ => return Err(AppError::InvalidRequest("Missing feedId or email".to_string())),
    };

    if !validation::is_valid_email(&email) {
        return Err(AppError::InvalidRequest("Invalid email format".to_string()));
    }

    let outcome = store
        .update(collections::CLIENT_EMAILS, |emails: &mut Vec<ClientEmail>| {
            if emails.iter().any(|e| e.feed_id == feed_id && e.email == email) {
                return Ok(LogOutcome::AlreadyLogged);
            }

            let entry = ClientEmail {
                feed_id: feed_id.clone(),
                email: email.clone(),
                timestamp: ids::now_millis(),
            };
            emails.push(entry.clone());
            Ok(LogOutcome::Logged(entry))
        })
        .await?;

    if let LogOutcome::Logged(_) = &outcome {
        log::info!("📧 Client email logged: {} for feed {}", email, feed_id);
    }
    Ok(outcome)
}

pub async fn list_client_emails(store: &JsonStore, raw_feed_id: &str) -> Vec<ClientEmail> {
    let emails: Vec<ClientEmail> = store.read(collections::CLIENT_EMAILS).await;
    emails.into_iter().filter(|e| e.feed_id.matches(raw_feed_id)).collect()
}
