use crate::gate::session::UserSession;

/// Free-tier reading allowance per day (30 minutes)
pub const DAILY_FREE_LIMIT_SECONDS: u64 = 1800;

/// Reading time left for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// Premium sessions are never metered
    Unlimited,
    Seconds(u64),
}

impl Remaining {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Remaining::Seconds(0))
    }

    pub fn seconds(&self) -> Option<u64> {
        match self {
            Remaining::Unlimited => None,
            Remaining::Seconds(s) => Some(*s),
        }
    }
}

/// Budget arithmetic for the free tier
pub struct BudgetCalculator;

impl BudgetCalculator {
    /// Remaining time against `limit_seconds`, clamped at zero
    pub fn calculate_remaining(limit_seconds: u64, session: &UserSession) -> Remaining {
        if session.is_premium {
            return Remaining::Unlimited;
        }
        Remaining::Seconds(limit_seconds.saturating_sub(session.reading_time_today))
    }

    pub fn is_blocked(limit_seconds: u64, session: &UserSession) -> bool {
        !session.is_premium && Self::calculate_remaining(limit_seconds, session).is_exhausted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(used: u64) -> UserSession {
        UserSession::default().with_reading_time(used)
    }

    #[test]
    fn fresh_session_has_full_budget() {
        let session = session_with(0);
        assert_eq!(
            BudgetCalculator::calculate_remaining(DAILY_FREE_LIMIT_SECONDS, &session),
            Remaining::Seconds(1800)
        );
        assert!(!BudgetCalculator::is_blocked(DAILY_FREE_LIMIT_SECONDS, &session));
    }

    #[test]
    fn remaining_matches_clamped_difference() {
        for used in [0, 1, 600, 1799, 1800, 1801, 10_000] {
            let expected = 1800u64.saturating_sub(used);
            assert_eq!(
                BudgetCalculator::calculate_remaining(DAILY_FREE_LIMIT_SECONDS, &session_with(used)),
                Remaining::Seconds(expected)
            );
        }
    }

    #[test]
    fn remaining_never_increases_with_reading_time() {
        let mut previous = u64::MAX;
        for used in 0..=2000 {
            let remaining =
                BudgetCalculator::calculate_remaining(DAILY_FREE_LIMIT_SECONDS, &session_with(used))
                    .seconds()
                    .unwrap();
            assert!(remaining <= previous);
            previous = remaining;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn exhausted_session_is_blocked() {
        assert!(BudgetCalculator::is_blocked(DAILY_FREE_LIMIT_SECONDS, &session_with(1800)));
        assert!(BudgetCalculator::is_blocked(DAILY_FREE_LIMIT_SECONDS, &session_with(5000)));
    }

    #[test]
    fn premium_is_never_blocked() {
        for used in [0, 1800, 86_400] {
            let session = session_with(used).with_premium();
            assert_eq!(
                BudgetCalculator::calculate_remaining(DAILY_FREE_LIMIT_SECONDS, &session),
                Remaining::Unlimited
            );
            assert!(!BudgetCalculator::is_blocked(DAILY_FREE_LIMIT_SECONDS, &session));
        }
    }

    #[test]
    fn upgrade_unblocks_without_changing_reading_time() {
        let mut session = session_with(1800);
        assert!(BudgetCalculator::is_blocked(DAILY_FREE_LIMIT_SECONDS, &session));

        session.is_premium = true;
        assert!(!BudgetCalculator::is_blocked(DAILY_FREE_LIMIT_SECONDS, &session));
        assert_eq!(session.reading_time_today, 1800);
    }
}
