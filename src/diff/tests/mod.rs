#![allow(clippy::unwrap_used)]

mod tests_apply;
mod tests_diff;
