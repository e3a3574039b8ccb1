//! Reply texts for the chat commands. Every name passed in here must already be sanitized.
use std::fmt::Write;

use hugard_engine::{db_types::SettledPayment, PayableReference, PaymentHistory, ServerStats};

use crate::data_objects::Embed;

pub const NO_PAYMENTS_YET: &str = "No payments have been made yet.";

pub fn pong(latency_ms: u128) -> String {
    format!("Pong! {latency_ms}ms")
}

pub fn about() -> Embed {
    let description = format!(
        "**About Me:**\nI'm here to help members send payments to the community owner, securely and \
         anonymously!\nI work with Coinbase Commerce directly, so nobody learns anything they shouldn't about \
         you.\n\n**My Features:**\n- **Secure & Anonymous Payments:** I only remember your member id and what you \
         paid.\n- **Global Reach:** Wherever you are in the world, I've got you covered!\n- **Notifications:** The \
         owner hears about your payment as soon as it clears.\n\nVersion {}",
        env!("CARGO_PKG_VERSION")
    );
    Embed::new("Hi there, I'm Hugard", description)
}

/// The embed for a freshly issued charge. `qr_code_url` points at the rendered code for the charge.
pub fn payment_request(reference: &PayableReference, qr_code_url: &str) -> Embed {
    Embed::new("Click me or scan the QR code below!", format!("Amount due: {}!", reference.amount))
        .with_url(reference.payment_url.as_str())
        .with_image(qr_code_url)
}

fn payment_lines(payments: &[SettledPayment]) -> String {
    payments.iter().fold(String::new(), |mut acc, p| {
        let _ = writeln!(
            acc,
            "Paid {} on {} at {}",
            p.amount,
            p.created_at.format("%Y-%m-%d"),
            p.created_at.format("%H:%M:%S")
        );
        acc
    })
}

/// The caller's own history.
pub fn my_history(history: Option<&PaymentHistory>) -> Embed {
    match history {
        None => Embed::new("My Payment History", "You haven't made any payments yet."),
        Some(h) => Embed::new(
            "My Payment History",
            format!("\n{}\nTotal Paid: {}", payment_lines(&h.payments), h.total),
        ),
    }
}

/// Another member's history, for members that can view the audit log.
pub fn member_history(name: &str, history: Option<&PaymentHistory>) -> Embed {
    let title = format!("Total Paid From {name}");
    match history {
        None => Embed::new(title, format!("{name} hasn't made any payments yet.")),
        Some(h) => Embed::new(title, format!("\n{}\n= {}", payment_lines(&h.payments), h.total)),
    }
}

/// Community-wide statistics. `top_payer_name` is the display name of `stats.top_payer`.
pub fn server_stats(stats: Option<&ServerStats>, top_payer_name: &str, community_name: Option<&str>) -> Embed {
    let title = match community_name {
        Some(name) => format!("Hugard's Incredible Statistics For {name}"),
        None => "Hugard's Incredible Statistics".to_string(),
    };
    let Some(stats) = stats else {
        return Embed::new(title, NO_PAYMENTS_YET);
    };
    let description = format!(
        "\nTotal Income: {}\nAverage Income: {}\nTotal Payers: {}\nHighest Paying Member: {top_payer_name} ({})",
        stats.total_income, stats.average_income, stats.payer_count, stats.top_payer.total
    );
    Embed::new(title, description)
}
