#![no_main]

use libfuzzer_sys::fuzz_target;
use most_odata::QueryBuilder;

// Each line is one call: the first char picks the operation, the rest is
// its argument. Any sequence must serialize or report an error, never panic.
fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let mut builder = QueryBuilder::new();
    for line in s.lines().take(64) {
        let mut chars = line.chars();
        let Some(op) = chars.next() else {
            continue;
        };
        let arg = chars.as_str();
        let n = arg.parse::<i64>().unwrap_or_default();
        builder = match u32::from(op) % 24 {
            0 => builder.where_field(arg),
            1 => builder.also(arg),
            2 => builder.either(arg),
            3 => builder.and_also(arg),
            4 => builder.or_else(arg),
            5 => builder.prepare(),
            6 => builder.equal(arg),
            7 => builder.not_equal(n),
            8 => builder.greater_than(n),
            9 => builder.lower_or_equal(arg),
            10 => builder.contains(arg),
            11 => builder.between(arg, n, n.saturating_add(1)),
            12 => builder.to_lower_case(),
            13 => builder.trim(),
            14 => builder.get_year(),
            15 => builder.starts_with(arg),
            16 => builder.index_of(arg),
            17 => builder.substring(n, n),
            18 => builder.select(arg.split(',')),
            19 => builder.order_by(arg),
            20 => builder.then_by_descending(arg),
            21 => builder.top(n),
            22 => builder.skip(n.unsigned_abs()),
            _ => builder.take(n.unsigned_abs()),
        };
    }

    if let Ok(query) = builder.to_query_string() {
        assert!(query.is_empty() || query.starts_with("?$"));
    }
    if let Ok(encoded) = builder.to_encoded_query_string() {
        assert!(!encoded.contains('#') && !encoded.contains('+'));
    }
});
