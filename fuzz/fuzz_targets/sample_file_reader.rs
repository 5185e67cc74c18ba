#![no_main]

use libfuzzer_sys::fuzz_target;
use perflogic::sample_file::SampleFileReader;

fuzz_target!(|data: &[u8]| {
    // Any byte stream must decode or fail with an error, never panic
    if let Ok(mut reader) = SampleFileReader::new(data) {
        let _ = reader.properties();
        let _ = reader.read_all(1.5);
        let _ = reader.has_next();
    }
});
