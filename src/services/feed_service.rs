use crate::{
    database::{collections, JsonStore},
    models::{CreateFeedRequest, Feed, Preset},
    utils::{ids, AppError},
};

fn find_by_id<'a>(feeds: &'a [Feed], raw_id: &str) -> Option<&'a Feed> {
    let raw_id = raw_id.trim();
    feeds.iter().find(|f| f.id.to_string() == raw_id)
}

/// Feeds owned by `user_id`, in creation order.
pub async fn list_user_feeds(store: &JsonStore, user_id: &str) -> Vec<Feed> {
    let feeds: Vec<Feed> = store.read(collections::FEEDS).await;
    feeds
        .into_iter()
        .filter(|f| f.user_id.as_deref() == Some(user_id))
        .collect()
}

/// Owner view. Feeds saved before accounts existed are readable by anyone signed in.
pub async fn get_owned_feed(store: &JsonStore, raw_id: &str, user_id: &str) -> Result<Feed, AppError> {
    let feed = get_public_feed(store, raw_id).await?;
    if feed.is_owned_by_other(user_id) {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }
    Ok(feed)
}

/// Review-link view, no ownership check.
pub async fn get_public_feed(store: &JsonStore, raw_id: &str) -> Result<Feed, AppError> {
    let feeds: Vec<Feed> = store.read(collections::FEEDS).await;
    find_by_id(&feeds, raw_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Feed not found".to_string()))
}

pub async fn create_feed(
    store: &JsonStore,
    user_id: &str,
    request: CreateFeedRequest,
) -> Result<Feed, AppError> {
    let feed = Feed {
        id: ids::next_id(),
        kind: request.kind.unwrap_or_default(),
        name: request.name.unwrap_or_default(),
        state: request.state.unwrap_or_default(),
        user_id: Some(user_id.to_string()),
        created_at: Some(ids::now_iso()),
    };

    let stored = feed.clone();
    store
        .update(collections::FEEDS, move |feeds: &mut Vec<Feed>| {
            feeds.push(stored);
            Ok(())
        })
        .await?;

    log::info!("✅ Feed {} created by {} ({} posts)", feed.id, user_id, feed.state.posts.len());
    Ok(feed)
}

pub async fn delete_feed(store: &JsonStore, raw_id: &str, user_id: &str) -> Result<(), AppError> {
    store
        .update(collections::FEEDS, |feeds: &mut Vec<Feed>| {
            let feed = find_by_id(feeds, raw_id)
                .ok_or_else(|| AppError::NotFound("Feed not found".to_string()))?;
            if feed.is_owned_by_other(user_id) {
                return Err(AppError::Forbidden("Access denied".to_string()));
            }

            let id = feed.id;
            feeds.retain(|f| f.id != id);
            log::info!("🗑️ Feed {} deleted by {}", id, user_id);
            Ok(())
        })
        .await
}

pub async fn list_presets(store: &JsonStore) -> Vec<Preset> {
    store.read(collections::PRESETS).await
}

/// Presets are saved as a whole list; the editor always sends every preset.
pub async fn replace_presets(store: &JsonStore, presets: &[Preset]) -> Result<(), AppError> {
    store.write(collections::PRESETS, &presets).await?;
    log::info!("💾 Saved {} presets", presets.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedKind, FeedState};

    fn request(name: &str) -> CreateFeedRequest {
        CreateFeedRequest {
            kind: None,
            name: Some(name.to_string()),
            state: Some(FeedState::default()),
        }
    }

    #[tokio::test]
    async fn test_feeds_are_scoped_to_owner() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let mine = create_feed(&store, "google_1", request("mine")).await.unwrap();
        create_feed(&store, "google_2", request("theirs")).await.unwrap();

        let listed = list_user_feeds(&store, "google_1").await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);
        assert_eq!(listed[0].kind, FeedKind::Grid);
        assert!(listed[0].created_at.is_some());
    }

    #[tokio::test]
    async fn test_get_owned_feed_checks_owner() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let feed = create_feed(&store, "google_1", request("mine")).await.unwrap();
        let id = feed.id.to_string();

        assert!(get_owned_feed(&store, &id, "google_1").await.is_ok());
        assert!(matches!(
            get_owned_feed(&store, &id, "google_2").await,
            Err(AppError::Forbidden(_))
        ));
        assert!(get_public_feed(&store, &id).await.is_ok());
        assert!(matches!(
            get_public_feed(&store, "123").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_feed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let feed = create_feed(&store, "google_1", request("mine")).await.unwrap();
        let id = feed.id.to_string();

        assert!(matches!(
            delete_feed(&store, &id, "google_2").await,
            Err(AppError::Forbidden(_))
        ));
        delete_feed(&store, &id, "google_1").await.unwrap();
        assert!(matches!(
            delete_feed(&store, &id, "google_1").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_presets_replace_whole_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let presets: Vec<Preset> = serde_json::from_value(serde_json::json!([
            { "name": "Brand A", "data": { "name": "brand_a", "bio": "hello" } },
            { "name": "Brand B", "data": { "name": "brand_b" } }
        ]))
        .unwrap();

        replace_presets(&store, &presets).await.unwrap();
        replace_presets(&store, &presets[..1]).await.unwrap();

        let stored = list_presets(&store).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].data.bio, "hello");
    }
}
