use tracing::info;

use crate::gate::session::UserSession;
use crate::premium::Plan;

/// Handles sessions that ran out of free reading time
pub struct UpsellEnforcer {
    limit_seconds: u64,
}

impl UpsellEnforcer {
    pub fn new(limit_seconds: u64) -> Self {
        Self { limit_seconds }
    }

    /// Record the block and return the message for the upsell surface
    pub fn enforce_block(&self, session: &UserSession) -> String {
        info!(
            "Blocking reader {} ({}) after {}s of free reading",
            session.name, session.user_id, session.reading_time_today
        );
        self.upsell_message()
    }

    pub fn upsell_message(&self) -> String {
        format!(
            "Reading time exhausted. Free readers are limited to {} per day. \
             Go Premium for only {} to read without limits.",
            describe_limit(self.limit_seconds),
            Plan::Monthly.price_label()
        )
    }
}

fn describe_limit(seconds: u64) -> String {
    match (seconds / 3600, (seconds % 3600) / 60, seconds % 60) {
        (0, 0, s) => format!("{} seconds", s),
        (0, m, 0) => format!("{} minutes", m),
        (h, 0, 0) => format!("{} hour{}", h, if h == 1 { "" } else { "s" }),
        _ => format!("{} seconds", seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::DAILY_FREE_LIMIT_SECONDS;

    #[test]
    fn upsell_mentions_limit_and_price() {
        let enforcer = UpsellEnforcer::new(DAILY_FREE_LIMIT_SECONDS);
        let message = enforcer.enforce_block(&UserSession::default().with_reading_time(1800));
        assert!(message.contains("30 minutes per day"));
        assert!(message.contains("2 000 FCFA / month"));
    }

    #[test]
    fn describe_limit_picks_a_readable_unit() {
        assert_eq!(describe_limit(45), "45 seconds");
        assert_eq!(describe_limit(1800), "30 minutes");
        assert_eq!(describe_limit(3600), "1 hour");
        assert_eq!(describe_limit(7200), "2 hours");
        assert_eq!(describe_limit(3660), "3660 seconds");
    }
}
