use crate::premium::Plan;
use crate::reader::format_countdown;

/// Print the free tier and the premium plans
pub fn show_plans(limit_seconds: u64) {
    println!("\n=== Premium Library ===\n");
    println!("Free tier:");
    println!("  - {} of reading per day", format_countdown(limit_seconds));
    println!("  - premium works metered, no offline mode");
    println!();
    println!("Premium (unlimited reading):");
    for plan in Plan::ALL {
        let discount = plan.discount_percent();
        if discount > 0 {
            println!("  - {} (-{}%)", plan.price_label(), discount);
        } else {
            println!("  - {}", plan.price_label());
        }
    }
    println!();
    println!("Upgrade inside the reader by typing: upgrade");
}
