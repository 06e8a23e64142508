use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize, Debug)]
struct DerivApiTickMessage {
    tick: DerivApiTick,
}

#[derive(Deserialize, Debug)]
struct DerivApiTick {
    symbol: String,
    // the API sends a number, older clients and replays may send a string
    quote: Value,
}

#[derive(Deserialize, Debug)]
struct DerivApiError {
    code: String,
    message: String,
}

#[derive(Deserialize, Debug)]
struct DerivApiErrorMessage {
    error: DerivApiError,
    msg_type: Option<String>,
}

/// Last digit of one tick, ready to be pushed into a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickDigit {
    pub symbol: String,
    pub digit: u8,
}

/// What an inbound text frame turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Tick(TickDigit),
    ApiError {
        code: String,
        message: String,
        msg_type: Option<String>,
    },
    Ignored,
}

pub fn parse_frame(data: &[u8]) -> InboundFrame {
    if let Ok(message) = serde_json::from_slice::<DerivApiTickMessage>(data) {
        return match last_digit(&message.tick.quote) {
            Some(digit) => InboundFrame::Tick(TickDigit {
                symbol: message.tick.symbol,
                digit,
            }),
            None => InboundFrame::Ignored,
        };
    }

    match serde_json::from_slice::<DerivApiErrorMessage>(data) {
        Ok(error_message) => InboundFrame::ApiError {
            code: error_message.error.code,
            message: error_message.error.message,
            msg_type: error_message.msg_type,
        },
        Err(_) => InboundFrame::Ignored,
    }
}

/// Final character of the quote as written, read as a decimal digit.
///
/// Deliberately textual: "123.40" yields 0, while the number 123.40 is rendered by
/// serde_json as "123.4" and yields 4.
pub fn last_digit(quote: &Value) -> Option<u8> {
    let text = match quote {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };

    text.chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|digit| digit as u8)
}
