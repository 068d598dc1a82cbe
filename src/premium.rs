use serde::{Deserialize, Serialize};
use tracing::info;

use crate::gate::SharedSession;

/// Subscription plans offered on the upsell page
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    Yearly,
}

impl Plan {
    pub const ALL: [Plan; 2] = [Plan::Monthly, Plan::Yearly];

    /// Price in FCFA
    pub fn price_fcfa(&self) -> u32 {
        match self {
            Plan::Monthly => 2_000,
            Plan::Yearly => 20_000,
        }
    }

    pub fn period(&self) -> &'static str {
        match self {
            Plan::Monthly => "month",
            Plan::Yearly => "year",
        }
    }

    /// e.g. "2 000 FCFA / month"
    pub fn price_label(&self) -> String {
        format!("{} FCFA / {}", group_thousands(self.price_fcfa()), self.period())
    }

    /// Saving against twelve monthly payments, in percent
    pub fn discount_percent(&self) -> u32 {
        let yearly_at_monthly_rate = Plan::Monthly.price_fcfa() * 12;
        match self {
            Plan::Monthly => 0,
            Plan::Yearly => {
                (yearly_at_monthly_rate - self.price_fcfa()) * 100 / yearly_at_monthly_rate
            }
        }
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Mock payment flow: no money moves, the session simply becomes premium.
///
/// Returns false if the session was already premium.
pub fn upgrade(session: &SharedSession, plan: Plan) -> bool {
    info!(
        "Redirecting to payment portal (Orange Money / Moov Money / card) for {}",
        plan.price_label()
    );
    session.upgrade_to_premium()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::UserSession;

    #[test]
    fn plan_prices() {
        assert_eq!(Plan::Monthly.price_label(), "2 000 FCFA / month");
        assert_eq!(Plan::Yearly.price_label(), "20 000 FCFA / year");
    }

    #[test]
    fn yearly_plan_discount() {
        assert_eq!(Plan::Monthly.discount_percent(), 0);
        assert_eq!(Plan::Yearly.discount_percent(), 16);
    }

    #[test]
    fn group_thousands_formats_digits() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_234_567), "1 234 567");
    }

    #[test]
    fn upgrade_flips_session_once() {
        let session = SharedSession::new(UserSession::default());
        assert!(upgrade(&session, Plan::Monthly));
        assert!(session.is_premium());
        assert!(!upgrade(&session, Plan::Yearly));
    }
}
