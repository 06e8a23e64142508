mod digit_window;
mod store;

pub(crate) use digit_window::DigitWindow;
pub use store::{FeedCounters, FeedStatus, WindowStore};
