//! Conversion of panic payloads raised inside an execution engine.

use std::any::Any;

/// Extract a readable message from a `panic!` payload.
///
/// `String` and `&'static str` payloads are returned as-is; anything else is
/// reported as an opaque payload.
///
/// ```
/// use featurerun::panic::panic_message;
/// assert_eq!(panic_message(Box::new("boom")), "boom");
/// assert_eq!(panic_message(Box::new(String::from("boom"))), "boom");
/// assert_eq!(panic_message(Box::new(5_u32)), "non-string panic payload");
/// ```
#[must_use]
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&'static str>()
            .map_or_else(|| "non-string panic payload".to_owned(), |s| (*s).to_owned()),
    }
}
