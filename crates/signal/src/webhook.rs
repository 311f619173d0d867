use common::OrderSide;

/// Parses the free-form webhook body into a side.
///
/// Case-insensitive match on two consecutive tokens: `Accepted Entry` → BUY,
/// `Accepted Exit` → SELL. Whitespace between the two words (including
/// newlines) is insignificant; anything else is rejected. Implemented as
/// manual tokenization rather than a regex — the match is exactly two
/// adjacent words, which `split_whitespace` + a sliding pair already gives us.
pub fn parse_webhook_text(text: &str) -> Option<OrderSide> {
    let tokens: Vec<String> = text.split_whitespace().map(|t| t.to_lowercase()).collect();

    tokens.windows(2).find_map(|pair| match (pair[0].as_str(), pair[1].as_str()) {
        ("accepted", "entry") => Some(OrderSide::Buy),
        ("accepted", "exit") => Some(OrderSide::Sell),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_entry_parses_as_buy() {
        assert_eq!(parse_webhook_text("Accepted Entry on BTCUSDT"), Some(OrderSide::Buy));
    }

    #[test]
    fn accepted_exit_parses_as_sell() {
        assert_eq!(parse_webhook_text("accepted   exit"), Some(OrderSide::Sell));
    }

    #[test]
    fn case_insensitive_and_whitespace_tolerant() {
        assert_eq!(parse_webhook_text("ACCEPTED\nENTRY"), Some(OrderSide::Buy));
    }

    #[test]
    fn unrelated_text_rejected() {
        assert_eq!(parse_webhook_text("hello world"), None);
    }

    #[test]
    fn accepted_alone_rejected() {
        assert_eq!(parse_webhook_text("Accepted"), None);
    }
}
