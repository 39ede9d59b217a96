//! Parser fuzz target: feed arbitrary UTF-8 to the whole front end.
//! Neither the lexer nor the parser may panic; every input yields a document or an error,
//! and an accepted document must re-parse from its reconstructed text.
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let Ok(tokens) = httpidl::tokenize(s) else {
        return;
    };
    if let Ok(entry) = httpidl::parse(&tokens) {
        use httpidl::Context;
        assert_eq!(entry.text(), s);
        assert!(httpidl::parse_source(&entry.text()).is_ok());
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}
