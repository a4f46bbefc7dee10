// Compiled-once regular expressions, available crate wide as regex!()

#[macro_use]
mod cache;
