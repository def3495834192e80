#![no_main]

use libfuzzer_sys::fuzz_target;

use tokenledger_types::{format_units, parse_units};

// Parsing arbitrary text must never panic; whatever parses must format back
// to a string that parses to the same amount. Formatting must accept any
// precision, including ones no u128 can scale to.
fuzz_target!(|input: (u8, u128, &str)| {
    let (decimals, raw, text) = input;
    let _ = format_units(raw, decimals);
    let _ = parse_units(text, decimals);

    let decimals = decimals % 19;
    if let Ok(raw) = parse_units(text, decimals) {
        let formatted = format_units(raw, decimals);
        assert_eq!(parse_units(&formatted, decimals).ok(), Some(raw));
    }
});
