use std::path::Path;

use hdf5::types::TypeDescriptor;
use hdf5::{File, SimpleExtents};
use log::debug;
use ndarray::{ArrayViewD, IxDyn};

use crate::datatype::{NumericData, Shape, TypeCode};
use crate::error::{Error, Result};
use crate::{store, strings};

/// Layout options for [`create_dataset`].
#[derive(Debug, Clone)]
pub struct CreateConfig {
    /// Deflate level; `None` disables compression and chunking.
    pub compression: Option<u8>,
    /// Chunk extents. When compression is requested without an explicit
    /// chunk shape, the full dataset shape is used.
    pub chunk: Option<Shape>,
    /// Slot width for fixed-width string datasets, clamped to at least 1.
    pub max_str_len: usize,
}

impl Default for CreateConfig {
    fn default() -> Self {
        Self {
            compression: None,
            chunk: None,
            max_str_len: 0,
        }
    }
}

/// Create an empty file at `path`, truncating any existing one.
pub fn create_file<P: AsRef<Path>>(path: P) -> Result<()> {
    File::create(path.as_ref())?;
    Ok(())
}

/// Create a group inside an existing file.
pub fn create_group<P: AsRef<Path>>(path: P, name: &str) -> Result<()> {
    let file = store::open_rw(path.as_ref())?;
    file.create_group(name)?;
    Ok(())
}

/// Create a dataset with the given logical type and extents.
///
/// An empty shape creates a scalar dataset, to which no chunking applies.
/// Any zero extent also disables chunking and compression even when
/// requested, since the engine cannot chunk a degenerate extent. String
/// datasets store a fixed-width type of width `max(1, max_str_len)`.
pub fn create_dataset<P: AsRef<Path>>(
    path: P,
    name: &str,
    type_code: TypeCode,
    shape: &Shape,
    config: &CreateConfig,
) -> Result<()> {
    let file = store::open_rw(path.as_ref())?;

    let builder = match type_code {
        TypeCode::U8 => file.new_dataset::<u8>(),
        TypeCode::I8 => file.new_dataset::<i8>(),
        TypeCode::U16 => file.new_dataset::<u16>(),
        TypeCode::I16 => file.new_dataset::<i16>(),
        TypeCode::U32 => file.new_dataset::<u32>(),
        TypeCode::I32 => file.new_dataset::<i32>(),
        TypeCode::U64 => file.new_dataset::<u64>(),
        TypeCode::I64 => file.new_dataset::<i64>(),
        TypeCode::F32 => file.new_dataset::<f32>(),
        TypeCode::F64 => file.new_dataset::<f64>(),
        TypeCode::String => file
            .new_dataset_builder()
            .empty_as(&TypeDescriptor::FixedAscii(config.max_str_len.max(1))),
        TypeCode::Other => {
            return Err(Error::Unsupported(
                "cannot create a dataset of type 'other'".into(),
            ))
        }
    };

    if shape.ndim() == 0 {
        builder.create(name)?;
        return Ok(());
    }

    let builder = if config.compression.is_some() && shape.as_ref().contains(&0) {
        debug!(
            "dataset '{}' has a zero extent, skipping chunking and compression",
            name
        );
        builder
    } else if let Some(level) = config.compression {
        let chunk = config.chunk.clone().unwrap_or_else(|| shape.clone());
        if chunk.ndim() != shape.ndim() {
            return Err(Error::DimensionMismatch(format!(
                "chunk shape {} does not match dataset rank {}",
                chunk,
                shape.ndim()
            )));
        }
        builder.deflate(level).chunk(chunk.as_ref())
    } else {
        builder
    };

    builder
        .shape(SimpleExtents::new(shape.as_ref()))
        .create(name)?;
    Ok(())
}

/// Write a full numeric buffer into an existing dataset.
///
/// The buffer is handed to the engine with the memory type matching `T`,
/// including the native 64-bit types; the engine converts to the stored
/// type. The buffer must hold exactly as many elements as the dataset.
pub fn write_numeric_dataset<T: NumericData, P: AsRef<Path>>(
    path: P,
    name: &str,
    data: &[T],
) -> Result<()> {
    let file = store::open_rw(path.as_ref())?;
    let dset = store::open_dataset(&file, name)?;

    match TypeCode::of(&dset.dtype()?) {
        TypeCode::String => {
            return Err(Error::TypeMismatch(format!(
                "cannot write {} data to string dataset '{}'",
                T::TYPE,
                name
            )))
        }
        TypeCode::Other => {
            return Err(Error::Unsupported(format!(
                "cannot write to dataset '{}' of type 'other'",
                name
            )))
        }
        _ => {}
    }

    let shape: Shape = dset.shape().into();
    if data.len() != shape.size() {
        return Err(Error::DimensionMismatch(format!(
            "buffer of {} elements does not fill dataset '{}' with shape {} ({} elements)",
            data.len(),
            name,
            shape,
            shape.size()
        )));
    }

    let view = ArrayViewD::from_shape(IxDyn(shape.as_ref()), data)
        .map_err(|err| Error::DimensionMismatch(err.to_string()))?;
    dset.write(view)?;
    Ok(())
}

/// Write a packed string payload into an existing fixed-width string
/// dataset.
///
/// Each element is truncated to the stored slot width if necessary and
/// the remainder of its slot is zero-padded; the source cursor advances
/// by the declared length, so oversized elements do not corrupt the
/// offsets of later ones.
pub fn write_string_dataset<P: AsRef<Path>>(
    path: P,
    name: &str,
    lengths: &[usize],
    packed: &[u8],
) -> Result<()> {
    let file = store::open_rw(path.as_ref())?;
    let dset = store::open_dataset(&file, name)?;

    let stored = TypeCode::of(&dset.dtype()?);
    if stored != TypeCode::String {
        return Err(Error::TypeMismatch(format!(
            "cannot write string data to dataset '{}' of type '{}'",
            name, stored
        )));
    }

    let shape: Shape = dset.shape().into();
    if lengths.len() != shape.size() {
        return Err(Error::DimensionMismatch(format!(
            "{} strings do not fill dataset '{}' with shape {} ({} elements)",
            lengths.len(),
            name,
            shape,
            shape.size()
        )));
    }
    let total: usize = lengths.iter().sum();
    if total != packed.len() {
        return Err(Error::DimensionMismatch(format!(
            "packed buffer holds {} bytes but the declared lengths sum to {}",
            packed.len(),
            total
        )));
    }

    strings::write_packed(&dset, lengths, packed)
}
