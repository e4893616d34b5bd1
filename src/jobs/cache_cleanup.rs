// ==================== CACHE CLEANUP ====================
// Removes cached media older than CACHE_MAX_AGE_DAYS, once at startup and then
// on every sweep interval.

use crate::services::cache_service::{MediaCache, SweepReport};
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Spawns the cleanup loop. Failures are logged and the loop keeps going.
pub async fn start_cache_cleanup(cache: MediaCache, every: Duration) {
    log::info!(
        "🧹 Starting cache cleanup (every {}s, max age {} days)",
        every.as_secs(),
        cache.max_age().as_secs() / 86_400
    );

    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately, so the startup sweep runs here too.
        loop {
            ticker.tick().await;
            log_report(cache.sweep_expired().await);
        }
    });

    log::info!("✅ Cache cleanup scheduled");
}

fn log_report(report: SweepReport) {
    if report.deleted > 0 || report.pruned > 0 {
        log::info!(
            "✨ Cleanup complete: {} old files removed, {} stale index entries pruned",
            report.deleted,
            report.pruned
        );
    } else {
        log::debug!("✨ Cleanup complete: nothing to remove");
    }
}
