#[cfg(test)]
pub mod error_test;
