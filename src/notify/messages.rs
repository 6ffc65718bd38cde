// Human-readable chat messages
use crate::models::Recommendation;
use chrono::{DateTime, Utc};

const DIVIDER: &str = "-------------------------";

/// Announcement sent before a cycle fans out
pub fn cycle_start(at: DateTime<Utc>, pair_count: usize) -> String {
    format!(
        "🚀 *Automated pair analysis started*\n\
         {DIVIDER}\n\
         📅 Time: {}\n\
         📊 Pairs scanned: {}\n\
         {DIVIDER}\n\
         Recommendations will be sent as soon as they are available.",
        at.format("%Y-%m-%d %H:%M:%S UTC"),
        pair_count
    )
}

/// Alert for a pair that met the buy rule
pub fn recommendation(pair: &str, quote: &str, rec: &Recommendation) -> String {
    let pair = escape_markdown(pair);
    let quote = escape_markdown(quote);
    format!(
        "📊 *Pair analysis: {pair}/{quote}*\n\
         {DIVIDER}\n\
         💧 *Liquidity (window):* {} {quote}\n\
         📈 *Price change:* {:.2}%\n\
         💵 *Last price:* {:.2} {quote}\n\
         🎯 *Target:* {:.2} {quote}\n\
         🛑 *Stop loss:* {:.2} {quote}\n\
         {DIVIDER}\n\
         💡 *Recommendation:* {}",
        format_thousands(rec.liquidity),
        rec.price_change_pct,
        rec.last_price,
        rec.target_price,
        rec.stop_loss,
        rec.action
    )
}

/// Escape characters that legacy Telegram Markdown treats as entity markers
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Failure report for a single pair
pub fn pair_error(pair: &str, error: &dyn std::fmt::Display) -> String {
    format!("An error occurred while analyzing pair {pair}: {error}")
}

/// Format with comma thousands separators and two decimals, e.g. `60,000.00`
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Action;
    use chrono::TimeZone;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0.00");
        assert_eq!(format_thousands(999.5), "999.50");
        assert_eq!(format_thousands(60000.0), "60,000.00");
        assert_eq!(format_thousands(1234567.891), "1,234,567.89");
        assert_eq!(format_thousands(-1500.0), "-1,500.00");
    }

    #[test]
    fn test_cycle_start_message() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let text = cycle_start(at, 7);

        assert!(text.contains("2024-05-01 12:30:00 UTC"));
        assert!(text.contains("Pairs scanned: 7"));
    }

    #[test]
    fn test_recommendation_message() {
        let rec = Recommendation {
            action: Action::Buy,
            liquidity: 60000.0,
            price_change_pct: 3.0,
            last_price: 103.0,
            target_price: 108.15,
            stop_loss: 97.85,
        };
        let text = recommendation("BTC", "USDT", &rec);

        assert!(text.contains("BTC/USDT"));
        assert!(text.contains("60,000.00 USDT"));
        assert!(text.contains("3.00%"));
        assert!(text.contains("Target:* 108.15 USDT"));
        assert!(text.contains("Stop loss:* 97.85 USDT"));
        assert!(text.contains("BUY"));
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("BTC"), "BTC");
        assert_eq!(escape_markdown("SHIB_2"), "SHIB\\_2");
        assert_eq!(escape_markdown("*[x]`"), "\\*\\[x]\\`");
    }

    #[test]
    fn test_recommendation_escapes_symbols() {
        let rec = Recommendation {
            action: Action::Buy,
            liquidity: 60000.0,
            price_change_pct: 3.0,
            last_price: 103.0,
            target_price: 108.15,
            stop_loss: 97.85,
        };
        let text = recommendation("MY_TOKEN", "USDT", &rec);

        assert!(text.contains("MY\\_TOKEN/USDT"));
        assert!(!text.contains("MY_TOKEN"));
    }

    #[test]
    fn test_pair_error_message() {
        let text = pair_error("ETH", &"connection reset");
        assert_eq!(
            text,
            "An error occurred while analyzing pair ETH: connection reset"
        );
    }
}
