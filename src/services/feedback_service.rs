//! Client review drafts.
//!
//! A draft is keyed by `(feedId, clientEmail)` and stays mutable until the
//! client submits it as an approval. Like and comment operations create the
//! draft and the per-post entry on first use.

use crate::{
    database::{collections, JsonStore},
    models::{
        AddCommentRequest, ClientFeedback, Comment, DeleteCommentRequest, LikeRequest, RecordKey,
        SaveFeedbackRequest,
    },
    utils::{ids, AppError},
};

fn missing_params() -> AppError {
    AppError::InvalidRequest("Missing required parameters".to_string())
}

fn required_key(value: Option<RecordKey>) -> Result<RecordKey, AppError> {
    value.filter(|k| !k.is_blank()).ok_or_else(missing_params)
}

fn required_text(value: Option<String>) -> Result<String, AppError> {
    value.filter(|v| !v.is_empty()).ok_or_else(missing_params)
}

fn draft_mut<'a>(
    drafts: &'a mut Vec<ClientFeedback>,
    feed_id: &RecordKey,
    client_email: &str,
    now: i64,
) -> &'a mut ClientFeedback {
    let idx = match drafts.iter().position(|d| d.belongs_to(feed_id, client_email)) {
        Some(idx) => idx,
        None => {
            drafts.push(ClientFeedback::empty(feed_id.clone(), client_email, now));
            drafts.len() - 1
        }
    };
    &mut drafts[idx]
}

/// Stored draft, or an unsaved empty one.
pub async fn get_draft(store: &JsonStore, raw_feed_id: &str, client_email: &str) -> ClientFeedback {
    let drafts: Vec<ClientFeedback> = store.read(collections::CLIENT_FEEDBACK).await;
    drafts
        .into_iter()
        .find(|d| d.feed_id.matches(raw_feed_id) && d.client_email == client_email)
        .unwrap_or_else(|| ClientFeedback::empty(RecordKey::from(raw_feed_id), client_email, ids::now_millis()))
}

pub async fn find_draft(store: &JsonStore, feed_id: &RecordKey, client_email: &str) -> Option<ClientFeedback> {
    let drafts: Vec<ClientFeedback> = store.read(collections::CLIENT_FEEDBACK).await;
    drafts.into_iter().find(|d| d.belongs_to(feed_id, client_email))
}

pub async fn save_draft(store: &JsonStore, request: SaveFeedbackRequest) -> Result<ClientFeedback, AppError> {
    let (feed_id, client_email) = match (request.feed_id, request.client_email) {
        (Some(feed_id), Some(email)) if !feed_id.is_blank() && !email.is_empty() => (feed_id, email),
        _ => return Err(AppError::InvalidRequest("Missing feedId or clientEmail".to_string())),
    };

    let draft = ClientFeedback {
        feed_id,
        client_email,
        grid_comment: request.grid_comment.unwrap_or_default(),
        posts: request.posts.unwrap_or_default(),
        last_updated: ids::now_millis(),
    };

    let stored = draft.clone();
    store
        .update(collections::CLIENT_FEEDBACK, move |drafts: &mut Vec<ClientFeedback>| {
            match drafts.iter_mut().find(|d| d.belongs_to(&stored.feed_id, &stored.client_email)) {
                Some(existing) => *existing = stored,
                None => drafts.push(stored),
            }
            Ok(())
        })
        .await?;

    log::info!("📝 Feedback updated for {} on feed {}", draft.client_email, draft.feed_id);
    Ok(draft)
}

pub async fn set_like(store: &JsonStore, request: LikeRequest) -> Result<ClientFeedback, AppError> {
    let feed_id = required_key(request.feed_id)?;
    let client_email = required_text(request.client_email)?;
    let post_id = required_text(request.post_id)?;
    let liked = request.liked.unwrap_or(false);

    let draft = store
        .update(collections::CLIENT_FEEDBACK, |drafts: &mut Vec<ClientFeedback>| {
            let now = ids::now_millis();
            let draft = draft_mut(drafts, &feed_id, &client_email, now);
            draft.post_entry(&post_id).liked = liked;
            draft.last_updated = now;
            Ok(draft.clone())
        })
        .await?;

    log::info!(
        "{} Like {} for post {} by {}",
        if liked { "❤️" } else { "🤍" },
        if liked { "added" } else { "removed" },
        post_id,
        client_email
    );
    Ok(draft)
}

pub async fn add_comment(
    store: &JsonStore,
    request: AddCommentRequest,
) -> Result<(Comment, ClientFeedback), AppError> {
    let feed_id = required_key(request.feed_id)?;
    let client_email = required_text(request.client_email)?;
    let post_id = required_text(request.post_id)?;
    let text = required_text(request.text)?;

    let result = store
        .update(collections::CLIENT_FEEDBACK, |drafts: &mut Vec<ClientFeedback>| {
            let now = ids::now_millis();
            let comment = Comment {
                id: ids::next_id().to_string(),
                text: text.clone(),
                timestamp: now,
            };

            let draft = draft_mut(drafts, &feed_id, &client_email, now);
            draft.post_entry(&post_id).comments.push(comment.clone());
            draft.last_updated = now;
            Ok((comment, draft.clone()))
        })
        .await?;

    log::info!("💬 Comment added to post {} by {}", post_id, client_email);
    Ok(result)
}

pub async fn delete_comment(store: &JsonStore, request: DeleteCommentRequest) -> Result<ClientFeedback, AppError> {
    let feed_id = required_key(request.feed_id)?;
    let client_email = required_text(request.client_email)?;
    let post_id = required_text(request.post_id)?;
    let comment_id = required_text(request.comment_id)?;

    let draft = store
        .update(collections::CLIENT_FEEDBACK, |drafts: &mut Vec<ClientFeedback>| {
            let draft = drafts
                .iter_mut()
                .find(|d| d.belongs_to(&feed_id, &client_email))
                .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;

            let post = draft
                .posts
                .iter_mut()
                .find(|p| p.post_id == post_id)
                .ok_or_else(|| AppError::NotFound("Post feedback not found".to_string()))?;

            let before = post.comments.len();
            post.comments.retain(|c| c.id != comment_id);
            if post.comments.len() == before {
                return Err(AppError::NotFound("Comment not found".to_string()));
            }

            draft.last_updated = ids::now_millis();
            Ok(draft.clone())
        })
        .await?;

    log::info!("🗑️ Comment {} deleted from post {} by {}", comment_id, post_id, client_email);
    Ok(draft)
}
