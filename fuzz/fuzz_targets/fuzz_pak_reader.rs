#![no_main]

use binpak::codec::{PakReader, PakWriter};
use binpak::session::{Session, SessionConfig};
use binpak::transform::Identity;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode to a summary or a PakError, never a panic
    if let Ok(reader) = PakReader::new(data) {
        let _ = reader.summarize();
    }

    // Whatever decodes must re-encode to the exact same bytes
    let Ok(reader) = PakReader::new(data) else {
        return;
    };
    let session = Session::new(
        reader,
        PakWriter::new(Vec::new()),
        SessionConfig::default().allow_multi_row(),
    );
    if let Ok((stats, output)) = session.execute(&Identity) {
        assert_eq!(output.as_slice(), &data[..stats.bytes_written as usize]);
    }
});
