//! Minimal self-describing binary container format.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! magic "STPC" | u8 version | u32 variable count
//! per variable:
//!   u32 name length | name bytes (utf-8)
//!   u8 dtype | u32 rank | u64 extent per axis | u32 step count
//!   step_count * product(extents) f64 values
//! ```
//!
//! The payload is stored widened to f64 regardless of the declared element
//! type, matching what fetches hand to the renderer.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use thiserror::Error;
use tracing::debug;

use ndarray::{ArrayD, IxDyn};

use super::mem::MemContainer;
use super::{ContainerRead, DataType};

pub const MAGIC: [u8; 4] = *b"STPC";
pub const VERSION: u8 = 1;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("IO error {0}")]
    Io(#[from] io::Error),
    #[error("UTF-8 error in variable name: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Not a container file (bad magic {0:?})")]
    BadMagic([u8; 4]),
    #[error("Unsupported container version {0}")]
    UnsupportedVersion(u8),
    #[error("Unknown data type tag {0}")]
    BadDataType(u8),
    #[error("Variable '{name}' is too large to load")]
    TooLarge { name: String },
    #[error("Declared shape is inconsistent: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

trait ReadExt {
    fn read_string(&mut self) -> Result<String, ReadError>;
}

impl<T: Read> ReadExt for T {
    fn read_string(&mut self) -> Result<String, ReadError> {
        let len = self.read_u32::<LittleEndian>()? as usize;
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

fn dtype_from_tag(tag: u8) -> Result<DataType, ReadError> {
    match tag {
        0 => Ok(DataType::Float32),
        1 => Ok(DataType::Float64),
        2 => Ok(DataType::Int32),
        3 => Ok(DataType::Int64),
        other => Err(ReadError::BadDataType(other)),
    }
}

fn dtype_tag(dtype: DataType) -> u8 {
    match dtype {
        DataType::Float32 => 0,
        DataType::Float64 => 1,
        DataType::Int32 => 2,
        DataType::Int64 => 3,
    }
}

pub fn read_container(mut reader: impl Read) -> Result<MemContainer, ReadError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(ReadError::BadMagic(magic));
    }
    let version = reader.read_u8()?;
    if version != VERSION {
        return Err(ReadError::UnsupportedVersion(version));
    }

    let var_count = reader.read_u32::<LittleEndian>()? as usize;
    let mut container = MemContainer::new();

    for _ in 0..var_count {
        let name = reader.read_string()?;
        let dtype = dtype_from_tag(reader.read_u8()?)?;

        let rank = reader.read_u32::<LittleEndian>()? as usize;
        let mut shape = Vec::with_capacity(rank);
        for _ in 0..rank {
            shape.push(reader.read_u64::<LittleEndian>()? as usize);
        }
        let step_count = reader.read_u32::<LittleEndian>()? as usize;

        let frame_len = shape
            .iter()
            .try_fold(1usize, |acc, &e| acc.checked_mul(e))
            .ok_or_else(|| ReadError::TooLarge { name: name.clone() })?;
        let total = frame_len
            .checked_mul(step_count)
            .ok_or_else(|| ReadError::TooLarge { name: name.clone() })?;

        debug!(%name, ?dtype, ?shape, step_count, "reading variable");

        let mut values = vec![0f64; total];
        reader.read_f64_into::<LittleEndian>(&mut values)?;

        let mut dims = Vec::with_capacity(rank + 1);
        dims.push(step_count);
        dims.extend_from_slice(&shape);
        let data = ArrayD::from_shape_vec(IxDyn(&dims), values)?;

        container.push(name, dtype, data);
    }

    Ok(container)
}

pub fn write_container(mut writer: impl Write, container: &MemContainer) -> io::Result<()> {
    writer.write_all(&MAGIC)?;
    writer.write_u8(VERSION)?;
    writer.write_u32::<LittleEndian>(container.variables().len() as u32)?;

    for (meta, data) in container.iter() {
        writer.write_u32::<LittleEndian>(meta.name.len() as u32)?;
        writer.write_all(meta.name.as_bytes())?;
        writer.write_u8(dtype_tag(meta.dtype))?;
        writer.write_u32::<LittleEndian>(meta.rank() as u32)?;
        for &extent in &meta.shape {
            writer.write_u64::<LittleEndian>(extent as u64)?;
        }
        writer.write_u32::<LittleEndian>(meta.step_count as u32)?;
        for &value in data.iter() {
            writer.write_f64::<LittleEndian>(value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ndarray::Array;

    use crate::select::Selection;

    use super::*;

    #[test]
    fn read_string_length_prefixed() {
        let bytes = [3, 0, 0, 0, b'a', b'b', b'c'];
        let mut rdr = &bytes[..];
        assert_eq!(rdr.read_string().unwrap(), "abc");
    }

    #[test]
    fn rejects_bad_magic() {
        let err = read_container(&b"NOPE\x01\x00\x00\x00\x00"[..]).unwrap_err();
        assert!(matches!(err, ReadError::BadMagic(_)));
    }

    #[test]
    fn rejects_unknown_version() {
        let err = read_container(&b"STPC\x02\x00\x00\x00\x00"[..]).unwrap_err();
        assert!(matches!(err, ReadError::UnsupportedVersion(2)));
    }

    #[test]
    fn round_trip() {
        let mut container = MemContainer::new();
        let data = Array::from_shape_fn((2, 3), |(s, i)| (s * 10 + i) as f64).into_dyn();
        container.push("wave", DataType::Float64, data);

        let mut bytes = Vec::new();
        write_container(&mut bytes, &container).unwrap();
        let loaded = read_container(&bytes[..]).unwrap();

        let meta = loaded.describe("wave").unwrap();
        assert_eq!(meta.shape, [3]);
        assert_eq!(meta.step_count, 2);

        let out = loaded
            .fetch("wave", 1, &Selection::new(vec![0], vec![3]))
            .unwrap();
        assert_eq!(out.iter().copied().collect::<Vec<_>>(), [10.0, 11.0, 12.0]);
    }
}
