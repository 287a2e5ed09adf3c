use chrono::NaiveDateTime;
use std::ffi::{OsStr, OsString};

/// Name of the dated bucket a file processed at `now` goes into.
pub fn get_bucket_name(now: &NaiveDateTime) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Prefixes the original name with the `HHMMSS` time of `now`.
pub fn get_new_file_name(now: &NaiveDateTime, file_name: &OsStr) -> OsString {
    let mut name = OsString::from(now.format("%H%M%S_").to_string());
    name.push(file_name);
    name
}
