//! Transport between packed string payloads and stored string datasets.
//!
//! Variable-length data goes through the engine's owned string values;
//! fixed-width data goes through one raw block read/write using a copy of
//! the stored datatype as the memory type, with host-side packing and
//! splitting around it.

use hdf5::types::VarLenUnicode;
use hdf5::Dataset;
use hdf5_sys::h5d::{H5Dread, H5Dwrite};
use hdf5_sys::h5p::H5P_DEFAULT;
use hdf5_sys::h5s::H5S_ALL;
use hdf5_sys::h5t::{H5Tclose, H5Tcopy, H5Tget_size, H5Tis_variable_str};
use log::debug;

use crate::error::{Error, Result};

/// Whether the dataset's stored string type is variable-length.
pub(crate) fn is_variable(dset: &Dataset) -> Result<bool> {
    let dtype = dset.dtype()?;
    let tri = unsafe { H5Tis_variable_str(dtype.id()) };
    if tri < 0 {
        return Err(Error::Engine("failed to inspect string datatype".into()));
    }
    Ok(tri > 0)
}

/// Slot width in bytes of a fixed-width string dataset.
pub(crate) fn fixed_width(dset: &Dataset) -> Result<usize> {
    let dtype = dset.dtype()?;
    Ok(unsafe { H5Tget_size(dtype.id()) })
}

/// Materialize all `count` string elements into a packed buffer with a
/// parallel length array.
pub(crate) fn read_packed(dset: &Dataset, count: usize) -> Result<(Vec<u8>, Vec<usize>)> {
    if count == 0 {
        return Ok((Vec::new(), Vec::new()));
    }

    if is_variable(dset)? {
        // Each value owns its engine-allocated string and releases it on
        // drop, after it has been copied into the packed buffer.
        let values = dset.read_raw::<VarLenUnicode>()?;
        let mut buffer = Vec::new();
        let mut lengths = Vec::with_capacity(values.len());
        for value in &values {
            let bytes = value.as_bytes();
            lengths.push(bytes.len());
            buffer.extend_from_slice(bytes);
        }
        Ok((buffer, lengths))
    } else {
        let width = fixed_width(dset)?;
        let block = read_fixed_block(dset, width, count)?;
        Ok(split_fixed(&block, width, count))
    }
}

/// Write a packed string payload into a fixed-width dataset.
///
/// Elements longer than the stored width are silently truncated to it;
/// the source cursor still advances by the declared length so later
/// elements stay aligned. Variable-length targets are refused.
pub(crate) fn write_packed(dset: &Dataset, lengths: &[usize], packed: &[u8]) -> Result<()> {
    if is_variable(dset)? {
        return Err(Error::Unsupported(
            "writing variable-length string datasets is not supported".into(),
        ));
    }
    if lengths.is_empty() {
        return Ok(());
    }

    let width = fixed_width(dset)?;
    let truncated = lengths.iter().filter(|&&len| len > width).count();
    if truncated > 0 {
        debug!(
            "truncating {} of {} strings to the stored width {}",
            truncated,
            lengths.len(),
            width
        );
    }

    let block = pack_fixed(lengths, packed, width);
    let dtype = dset.dtype()?;
    unsafe {
        let mem_type = H5Tcopy(dtype.id());
        if mem_type < 0 {
            return Err(Error::Engine("failed to copy string datatype".into()));
        }
        let status = H5Dwrite(
            dset.id(),
            mem_type,
            H5S_ALL,
            H5S_ALL,
            H5P_DEFAULT,
            block.as_ptr().cast(),
        );
        H5Tclose(mem_type);
        if status < 0 {
            return Err(Error::Engine(
                "failed to write fixed-width string data".into(),
            ));
        }
    }
    Ok(())
}

/// Read the raw `count * width` block of a fixed-width string dataset,
/// using a copy of the stored type so no conversion applies.
fn read_fixed_block(dset: &Dataset, width: usize, count: usize) -> Result<Vec<u8>> {
    let dtype = dset.dtype()?;
    let mut block = vec![0u8; width * count];
    unsafe {
        let mem_type = H5Tcopy(dtype.id());
        if mem_type < 0 {
            return Err(Error::Engine("failed to copy string datatype".into()));
        }
        let status = H5Dread(
            dset.id(),
            mem_type,
            H5S_ALL,
            H5S_ALL,
            H5P_DEFAULT,
            block.as_mut_ptr().cast(),
        );
        H5Tclose(mem_type);
        if status < 0 {
            return Err(Error::Engine(
                "failed to read fixed-width string data".into(),
            ));
        }
    }
    Ok(block)
}

/// Split a fixed-width block into trimmed elements. Each element's true
/// length runs up to the first NUL byte in its slot, or the full width.
fn split_fixed(block: &[u8], width: usize, count: usize) -> (Vec<u8>, Vec<usize>) {
    let mut buffer = Vec::new();
    let mut lengths = Vec::with_capacity(count);
    for i in 0..count {
        let slot = &block[i * width..(i + 1) * width];
        let len = slot.iter().position(|&b| b == 0).unwrap_or(width);
        buffer.extend_from_slice(&slot[..len]);
        lengths.push(len);
    }
    (buffer, lengths)
}

/// Pack declared-length elements into fixed-width, zero-padded slots.
fn pack_fixed(lengths: &[usize], packed: &[u8], width: usize) -> Vec<u8> {
    let mut block = vec![0u8; lengths.len() * width];
    let mut cursor = 0;
    for (slot, &len) in block.chunks_exact_mut(width).zip(lengths) {
        let take = len.min(width);
        slot[..take].copy_from_slice(&packed[cursor..cursor + take]);
        cursor += len;
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_trims_padding() {
        // Three slots of width 4: "ab\0\0", "cdef", "\0\0\0\0".
        let block = b"ab\0\0cdef\0\0\0\0";
        let (buffer, lengths) = split_fixed(block, 4, 3);
        assert_eq!(buffer, b"abcdef");
        assert_eq!(lengths, vec![2, 4, 0]);
    }

    #[test]
    fn pack_pads_and_truncates() {
        // "xy" fits with padding, "longer" truncates to 4 bytes.
        let block = pack_fixed(&[2, 6], b"xylonger", 4);
        assert_eq!(block, b"xy\0\0long");
    }

    #[test]
    fn oversized_element_does_not_shift_successors() {
        // The cursor advances by the declared length, so "beta" starts at
        // the right offset even though "alphabet" was cut to the width.
        let block = pack_fixed(&[8, 4], b"alphabetbeta", 5);
        assert_eq!(block, b"alphabeta\0");
    }

    #[test]
    fn pack_empty_payload() {
        assert!(pack_fixed(&[], b"", 7).is_empty());
    }
}
