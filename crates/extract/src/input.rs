// ABOUTME: Input stage: reads the whole HTML document from a reader in one blocking call.
// ABOUTME: Decodes as UTF-8, replacing invalid sequences rather than failing.

use std::io::Read;

use log::debug;

use crate::error::ExtractError;

/// Read everything from `reader` and decode it as UTF-8.
///
/// Invalid byte sequences become U+FFFD. Empty input is returned as an empty
/// string; only an I/O failure is an error.
pub fn read_input<R: Read>(mut reader: R) -> Result<String, ExtractError> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| ExtractError::input("ReadInput", Some(anyhow::Error::new(e))))?;

    debug!("read {} bytes of input", buf.len());

    Ok(match String::from_utf8(buf) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
