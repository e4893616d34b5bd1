use crate::{
    database::{collections, JsonStore},
    models::{Approval, ApprovalPayload, RecordKey},
    services::feedback_service,
    utils::{ids, AppError},
};

/// Freezes the client's current draft into a new approval record.
///
/// The draft itself is left as it is; later edits start a new review cycle and
/// never touch approvals already submitted.
pub async fn submit_approval(
    store: &JsonStore,
    feed_id: Option<RecordKey>,
    client_email: Option<String>,
) -> Result<Approval, AppError> {
    let (feed_id, client_email) = match (feed_id, client_email) {
        (Some(feed_id), Some(email)) if !feed_id.is_blank() && !email.is_empty() => (feed_id, email),
        _ => return Err(AppError::InvalidRequest("Missing feedId or clientEmail".to_string())),
    };

    let draft = feedback_service::find_draft(store, &feed_id, &client_email)
        .await
        .ok_or_else(|| AppError::NotFound("No feedback found to submit".to_string()))?;

    let now = ids::now_millis();
    let approval = Approval {
        approval_id: ids::next_id(),
        feed_id,
        client_email,
        payload: ApprovalPayload::snapshot(&draft),
        submitted_at: now,
    };

    let stored = approval.clone();
    store
        .update(collections::APPROVALS, move |approvals: &mut Vec<Approval>| {
            approvals.push(stored);
            Ok(())
        })
        .await?;

    log::info!(
        "✅ Approval submitted: {} by {} for feed {}",
        approval.approval_id,
        approval.client_email,
        approval.feed_id
    );
    Ok(approval)
}

pub async fn list_approvals(store: &JsonStore, raw_feed_id: &str) -> Vec<Approval> {
    let approvals: Vec<Approval> = store.read(collections::APPROVALS).await;
    approvals
        .into_iter()
        .filter(|a| a.feed_id.matches(raw_feed_id))
        .collect()
}
