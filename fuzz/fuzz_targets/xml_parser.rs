#![no_main]
use libfuzzer_sys::fuzz_target;
use zxml::{Config, Parser};

fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::with_config(data, Config::unlimited());
    let _ = parser.parse();
});
