//! Lexer fuzz target: recognized tokens must tile the input prefix they cover.
//! Build with: cargo fuzz run lexer_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let recognition = httpidl::standard_lexer().recognize(s);
    let mut end = 0;
    for token in &recognition.tokens {
        assert_eq!(token.span.start, end);
        end = token.span.end;
    }
    match recognition.error {
        Some(err) => assert!(err.offset() >= end && err.offset() < s.len().max(1)),
        None => assert_eq!(end, s.len()),
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run lexer_fuzz");
}
