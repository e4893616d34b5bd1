use crate::{
    database::{collections, JsonStore},
    models::{RecordKey, ScheduledPost, SchedulerPlan, UpdateScheduledPostRequest},
    utils::{ids, validation, AppError},
};

pub async fn create_plan(
    store: &JsonStore,
    feed_id: Option<RecordKey>,
    scheduler_email: Option<String>,
) -> Result<SchedulerPlan, AppError> {
    let feed_id = feed_id
        .filter(|k| !k.is_blank())
        .ok_or_else(|| AppError::InvalidRequest("feedId required".to_string()))?;

    let now = ids::now_millis();
    let plan = SchedulerPlan {
        scheduler_id: ids::next_id(),
        feed_id,
        scheduler_email: scheduler_email.unwrap_or_default(),
        posts: Vec::new(),
        created_at: now,
        shared_at: now,
    };

    let stored = plan.clone();
    store
        .update(collections::SCHEDULERS, move |plans: &mut Vec<SchedulerPlan>| {
            plans.push(stored);
            Ok(())
        })
        .await?;

    log::info!("📅 Scheduler {} created for feed {}", plan.scheduler_id, plan.feed_id);
    Ok(plan)
}

pub async fn get_plan(store: &JsonStore, raw_scheduler_id: &str) -> Result<SchedulerPlan, AppError> {
    let plans: Vec<SchedulerPlan> = store.read(collections::SCHEDULERS).await;
    plans
        .into_iter()
        .find(|p| p.scheduler_id.to_string() == raw_scheduler_id)
        .ok_or_else(|| AppError::NotFound("Scheduler not found".to_string()))
}

pub async fn list_feed_plans(store: &JsonStore, raw_feed_id: &str) -> Vec<SchedulerPlan> {
    let plans: Vec<SchedulerPlan> = store.read(collections::SCHEDULERS).await;
    plans.into_iter().filter(|p| p.feed_id.matches(raw_feed_id)).collect()
}

/// Applies a partial update to one post entry, creating it unscheduled when
/// the post has never been touched. Blank dates and times are ignored.
pub fn apply_post_update(entry: &mut ScheduledPost, update: &UpdateScheduledPostRequest, now: i64) {
    if let Some(scheduled) = update.scheduled {
        entry.scheduled = scheduled;
    }
    if let Some(date) = validation::non_blank(&update.scheduled_date) {
        entry.scheduled_date = Some(date.to_string());
    }
    if let Some(time) = validation::non_blank(&update.scheduled_time) {
        entry.scheduled_time = Some(time.to_string());
    }
    if let Some(caption) = &update.caption {
        entry.caption = Some(caption.clone());
    }
    entry.updated_at = Some(now);
}

pub async fn update_post(
    store: &JsonStore,
    raw_scheduler_id: &str,
    post_id: &str,
    update: UpdateScheduledPostRequest,
) -> Result<SchedulerPlan, AppError> {
    let plan = store
        .update(collections::SCHEDULERS, |plans: &mut Vec<SchedulerPlan>| {
            let plan = plans
                .iter_mut()
                .find(|p| p.scheduler_id.to_string() == raw_scheduler_id)
                .ok_or_else(|| AppError::NotFound("Scheduler not found".to_string()))?;

            let idx = match plan.posts.iter().position(|p| p.post_id == post_id) {
                Some(idx) => idx,
                None => {
                    plan.posts.push(ScheduledPost {
                        post_id: post_id.to_string(),
                        scheduled: false,
                        scheduled_date: None,
                        scheduled_time: None,
                        caption: None,
                        updated_at: None,
                    });
                    plan.posts.len() - 1
                }
            };
            apply_post_update(&mut plan.posts[idx], &update, ids::now_millis());
            Ok(plan.clone())
        })
        .await?;

    log::info!("📅 Scheduler {} post {} updated", raw_scheduler_id, post_id);
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        assert!(matches!(
            create_plan(&store, None, None).await,
            Err(AppError::InvalidRequest(_))
        ));

        let plan = create_plan(&store, Some(RecordKey::from(3)), None).await.unwrap();
        assert_eq!(plan.created_at, plan.shared_at);
        assert_eq!(plan.scheduler_email, "");

        let found = get_plan(&store, &plan.scheduler_id.to_string()).await.unwrap();
        assert_eq!(found.feed_id, RecordKey::from(3));
        assert_eq!(list_feed_plans(&store, "3").await.len(), 1);
        assert!(matches!(get_plan(&store, "1").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_post_creates_then_patches() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let plan = create_plan(&store, Some(RecordKey::from(3)), Some("ops@brand.com".into()))
            .await
            .unwrap();
        let id = plan.scheduler_id.to_string();

        let plan = update_post(
            &store,
            &id,
            "p1",
            UpdateScheduledPostRequest {
                scheduled: Some(true),
                scheduled_date: Some("2024-06-01".into()),
                scheduled_time: Some("09:30".into()),
                caption: Some("Launch day".into()),
            },
        )
        .await
        .unwrap();
        assert!(plan.posts[0].scheduled);

        // Blank date is ignored, caption may be cleared.
        let plan = update_post(
            &store,
            &id,
            "p1",
            UpdateScheduledPostRequest {
                scheduled: None,
                scheduled_date: Some(String::new()),
                scheduled_time: None,
                caption: Some(String::new()),
            },
        )
        .await
        .unwrap();

        assert_eq!(plan.posts.len(), 1);
        let post = &plan.posts[0];
        assert!(post.scheduled);
        assert_eq!(post.scheduled_date.as_deref(), Some("2024-06-01"));
        assert_eq!(post.scheduled_time.as_deref(), Some("09:30"));
        assert_eq!(post.caption.as_deref(), Some(""));
        assert!(post.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_unknown_plan() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let result = update_post(&store, "404", "p1", UpdateScheduledPostRequest::default()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
