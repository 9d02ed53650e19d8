use crate::reminder::ProcessDueRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, sleep_until, Instant};
use eventprompt_infra::EventPromptContext;
use std::time::Duration;
use tracing::info;

/// Seconds until the next interval boundary. Aligning ticks to round
/// wall-clock times keeps dispatch on the same cadence as the platform
/// cron it replaces.
pub fn secs_until_next_tick(now_ts: i64, interval_secs: u64) -> u64 {
    let interval_secs = interval_secs.max(1) as i64;
    (interval_secs - now_ts.rem_euclid(interval_secs)) as u64
}

/// A zero period would make the interval constructor panic inside the
/// spawned task and kill the job for the process lifetime
fn tick_period(interval_secs: u64) -> Duration {
    Duration::from_secs(interval_secs.max(1))
}

pub fn start_send_reminders_job(ctx: EventPromptContext) {
    actix_web::rt::spawn(async move {
        let interval_secs = ctx.config.interval_secs;
        let now_ts = ctx.sys.now().timestamp();
        let secs_to_next_run = secs_until_next_tick(now_ts, interval_secs);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run);

        sleep_until(start).await;
        let mut tick_interval = interval(tick_period(interval_secs));
        loop {
            tick_interval.tick().await;
            let context = ctx.clone();
            actix_web::rt::spawn(dispatch_batch(context));
        }
    });
}

async fn dispatch_batch(ctx: EventPromptContext) {
    let usecase = ProcessDueRemindersUseCase {
        limit: ctx.config.batch_size,
    };

    // Failures are already logged by the usecase wrapper; the job just
    // waits for the next tick
    if let Ok(processed) = execute(usecase, &ctx).await {
        if !processed.is_empty() {
            let sent = processed.iter().filter(|r| r.sent).count();
            info!(
                "Reminder batch done. Processed: {}, sent: {}",
                processed.len(),
                sent
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_alignment_works() {
        assert_eq!(secs_until_next_tick(50, 60), 10);
        assert_eq!(secs_until_next_tick(59, 60), 1);
        // On the boundary the job waits one full interval
        assert_eq!(secs_until_next_tick(60, 60), 60);
        assert_eq!(secs_until_next_tick(0, 60), 60);
        assert_eq!(secs_until_next_tick(61, 60), 59);
        assert_eq!(secs_until_next_tick(50, 30), 10);
        // Degenerate configuration still makes progress
        assert_eq!(secs_until_next_tick(17, 0), 1);
    }

    #[test]
    fn zero_interval_is_clamped_to_one_second() {
        assert_eq!(tick_period(0), Duration::from_secs(1));
        assert_eq!(tick_period(60), Duration::from_secs(60));
    }
}
