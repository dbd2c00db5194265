#![no_main]

use libfuzzer_sys::fuzz_target;
use most_odata::{IntoODataValue, RawFilter, Value, escape};

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 {
        return;
    }
    if let Ok(s) = std::str::from_utf8(data) {
        let quoted = escape(&Value::String(s.to_owned()));
        assert_eq!(quoted.len(), s.len() + 2);

        let raw = escape(&Value::Raw(RawFilter::new(s)));
        assert_eq!(raw, s);

        let list = Value::Array(s.split(',').map(IntoODataValue::into_odata_value).collect());
        let rendered = escape(&list);
        assert!(rendered.starts_with('[') && rendered.ends_with(']'));
    }
});
