use std::path::Path;

use hdf5::Dataset;

use crate::datatype::{Shape, TypeCode};
use crate::error::{Error, Result};
use crate::{store, strings};

///////////////////////////////////////////////////////////////////////////////
/// Type definitions
///////////////////////////////////////////////////////////////////////////////

/// A dataset's logical type and extents, resolved without reading data.
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    pub type_code: TypeCode,
    pub shape: Shape,
}

/// A string collection packed into one contiguous buffer with a parallel
/// length array, so elements re-split without embedded delimiters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringPayload {
    buffer: Vec<u8>,
    lengths: Vec<usize>,
}

impl StringPayload {
    pub(crate) fn new(buffer: Vec<u8>, lengths: Vec<usize>) -> Self {
        Self { buffer, lengths }
    }

    /// Number of string elements.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// All elements concatenated without separators.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Per-element byte lengths, parallel to [`Self::buffer`].
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Re-split the packed buffer into per-element byte slices.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.lengths.iter().scan(0usize, |offset, &len| {
            let bytes = &self.buffer[*offset..*offset + len];
            *offset += len;
            Some(bytes)
        })
    }
}

/// The materialized contents of one dataset: exactly one numeric buffer
/// matching the logical type, or a packed string collection.
///
/// 64-bit integer datasets are carried as [`DatasetPayload::F64`]; values
/// beyond f64's exact-integer range (±2^53) do not round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetPayload {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Strings(StringPayload),
}

impl DatasetPayload {
    /// Number of elements, equal to the product of the dataset's extents.
    pub fn len(&self) -> usize {
        match self {
            DatasetPayload::U8(v) => v.len(),
            DatasetPayload::I8(v) => v.len(),
            DatasetPayload::U16(v) => v.len(),
            DatasetPayload::I16(v) => v.len(),
            DatasetPayload::U32(v) => v.len(),
            DatasetPayload::I32(v) => v.len(),
            DatasetPayload::F32(v) => v.len(),
            DatasetPayload::F64(v) => v.len(),
            DatasetPayload::Strings(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A fully materialized dataset.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub type_code: TypeCode,
    pub shape: Shape,
    pub payload: DatasetPayload,
}

///////////////////////////////////////////////////////////////////////////////
/// Operations
///////////////////////////////////////////////////////////////////////////////

/// Resolve a dataset's logical type and shape without touching its data.
///
/// Succeeds for any stored type, including zero-length extents and types
/// that resolve to [`TypeCode::Other`].
pub fn describe_dataset<P: AsRef<Path>>(path: P, name: &str) -> Result<DatasetInfo> {
    let file = store::open_read(path.as_ref())?;
    let dset = store::open_dataset(&file, name)?;
    describe(&dset)
}

/// Materialize a dataset's full contents into the buffer matching its
/// logical type.
pub fn load_dataset<P: AsRef<Path>>(path: P, name: &str) -> Result<LoadedDataset> {
    let file = store::open_read(path.as_ref())?;
    let dset = store::open_dataset(&file, name)?;
    let info = describe(&dset)?;

    let payload = match info.type_code {
        TypeCode::U8 => DatasetPayload::U8(dset.read_raw()?),
        TypeCode::I8 => DatasetPayload::I8(dset.read_raw()?),
        TypeCode::U16 => DatasetPayload::U16(dset.read_raw()?),
        TypeCode::I16 => DatasetPayload::I16(dset.read_raw()?),
        TypeCode::U32 => DatasetPayload::U32(dset.read_raw()?),
        TypeCode::I32 => DatasetPayload::I32(dset.read_raw()?),
        TypeCode::F32 => DatasetPayload::F32(dset.read_raw()?),
        TypeCode::F64 => DatasetPayload::F64(dset.read_raw()?),
        // The engine converts 64-bit integers to f64 on the way out;
        // magnitudes beyond ±2^53 lose precision.
        TypeCode::U64 | TypeCode::I64 => DatasetPayload::F64(dset.read_raw()?),
        TypeCode::String => {
            let (buffer, lengths) = strings::read_packed(&dset, info.shape.size())?;
            DatasetPayload::Strings(StringPayload::new(buffer, lengths))
        }
        TypeCode::Other => {
            return Err(Error::Unsupported(format!(
                "cannot load dataset '{}' of type 'other'",
                name
            )))
        }
    };

    Ok(LoadedDataset {
        type_code: info.type_code,
        shape: info.shape,
        payload,
    })
}

fn describe(dset: &Dataset) -> Result<DatasetInfo> {
    Ok(DatasetInfo {
        type_code: TypeCode::of(&dset.dtype()?),
        shape: dset.shape().into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_payload_resplit() {
        let payload = StringPayload::new(b"abbccc".to_vec(), vec![1, 2, 0, 3]);
        assert_eq!(payload.len(), 4);
        let elems: Vec<_> = payload.iter().collect();
        assert_eq!(elems, vec![&b"a"[..], b"bb", b"", b"ccc"]);
    }

    #[test]
    fn payload_lengths() {
        let numeric = DatasetPayload::I32(vec![1, 2, 3]);
        assert_eq!(numeric.len(), 3);

        let strings = DatasetPayload::Strings(StringPayload::new(b"xy".to_vec(), vec![1, 1]));
        assert_eq!(strings.len(), 2);
        assert!(!strings.is_empty());
    }
}
