/* ************************************************************************ **
** This file is part of relax, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

/// Does `::serde_json::from_value(json!($($arg)*)).unwrap()`
///
/// Why? Because if you're writing a json literal, then you're probably
/// already quite certain that it is valid!
///
/// The invoking crate must depend on `serde_json`.
#[macro_export]
macro_rules! from_json {
    ($($arg:tt)*) => { ::serde_json::from_value(::serde_json::json!($($arg)*)).unwrap() };
}

/// Like `from_json!`, but for a literal that is expected to be rejected.
/// Yields the `serde_json::Error`.
#[macro_export]
macro_rules! from_json_err {
    ($T:ty, $($arg:tt)*) => {
        match ::serde_json::from_value::<$T>(::serde_json::json!($($arg)*)) {
            Ok(_) => panic!("unexpectedly deserialized a {}", stringify!($T)),
            Err(e) => e,
        }
    };
}
