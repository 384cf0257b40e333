use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub fn load<T: for<'de> Deserialize<'de>>(file_path: &Path) -> Result<T, std::io::Error> {
    let file = File::open(file_path)?;
    let mut de = serde_json::Deserializer::from_reader(file);
    let t = T::deserialize(&mut de)?;
    Ok(t)
}

/// Writes pretty JSON, indented with 4 spaces and terminated by a newline.
pub fn save<T: Serialize>(t: &T, file_path: &Path) -> Result<(), std::io::Error> {
    let file = File::create(file_path)?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(file, formatter);
    t.serialize(&mut ser)?;

    let mut file = ser.into_inner();
    file.write_all(b"\n")?;

    Ok(())
}
