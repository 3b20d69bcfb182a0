pub mod hrm;
pub mod text;

use crate::series::RRi;
use anyhow::Result;
use std::path::Path;

/// Pick a reader from the file extension; anything but `.hrm` is text.
pub fn read_rri(path: &Path) -> Result<RRi> {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("hrm") => hrm::read_from_hrm(path),
        _ => text::read_from_text(path),
    }
}
