pub mod checksums;

use std::fmt::Write;

/// Formats a labeled hex dump of a header or payload, 16 bytes per row.
/// Meant to be fed to `log::debug!` while a frame walks the pipeline.
pub fn hex_dump(label: &str, data: &[u8]) -> String {
    let mut dump = String::new();
    for (i, byte) in data.iter().enumerate() {
        if i % 16 == 0 {
            if i > 0 {
                dump.push('\n');
            }
            let _ = write!(dump, "{label}  ");
        }
        let _ = write!(dump, "{byte:02x} ");
    }
    dump
}
