//! # CSV Helpers
//!
//! The comma-joined text format used to keep index history in a settings store.

use crate::config::CSV_DELIMITER;
use std::fmt::{Display, Write};

/// Joins the items with commas.
///
/// # Examples
///
/// ```
/// use kitbag::to_csv;
///
/// assert_eq!(to_csv(&[3, 1, 4]), "3,1,4");
/// assert_eq!(to_csv::<u32>(&[]), "");
/// ```
pub fn to_csv<T: Display>(items: &[T]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(CSV_DELIMITER);
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{}", item);
    }
    out
}

/// Parses a comma-joined integer list.
///
/// An empty string gives an empty list. Tokens are trimmed, and anything
/// that is not an integer becomes `0` rather than an error.
///
/// # Examples
///
/// ```
/// use kitbag::int_list_from_csv;
///
/// assert_eq!(int_list_from_csv("1,x,3"), vec![1, 0, 3]);
/// assert!(int_list_from_csv("").is_empty());
/// ```
pub fn int_list_from_csv(text: &str) -> Vec<i32> {
    if text.is_empty() {
        return Vec::new();
    }

    text.split(CSV_DELIMITER)
        .map(|token| {
            let token = token.trim();
            token.parse::<i32>().unwrap_or_else(|_| {
                log::warn!("Coercing non-numeric csv token {:?} to 0", token);
                0
            })
        })
        .collect()
}
