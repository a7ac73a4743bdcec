use core::fmt::{Display, Formatter};
use std::ops::Index;

use hdf5::H5Type;
use hdf5_sys::h5t::{H5T_class_t, H5T_sign_t, H5Tget_class, H5Tget_sign, H5Tget_size};
use itertools::Itertools;
use smallvec::SmallVec;

/// The closed set of host-visible element types.
///
/// Every native HDF5 element type maps to exactly one of these; anything
/// outside the integer/float/string classes maps to [`TypeCode::Other`],
/// which is reported by the metadata queries but never materialized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TypeCode {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    String,
    Other,
}

impl TypeCode {
    /// Resolve an integer type from its stored byte width and sign flag.
    ///
    /// Widths are bucketed upwards to the next representable width so a
    /// narrower host type never truncates: a 3-byte integer resolves to
    /// 32 bits, never 16.
    pub fn integer(size: usize, signed: bool) -> Self {
        match (size, signed) {
            (0..=1, false) => TypeCode::U8,
            (0..=1, true) => TypeCode::I8,
            (2, false) => TypeCode::U16,
            (2, true) => TypeCode::I16,
            (3..=4, false) => TypeCode::U32,
            (3..=4, true) => TypeCode::I32,
            (_, false) => TypeCode::U64,
            (_, true) => TypeCode::I64,
        }
    }

    /// Resolve a float type from its stored byte width.
    pub fn float(size: usize) -> Self {
        if size <= 4 {
            TypeCode::F32
        } else {
            TypeCode::F64
        }
    }

    /// Resolve the logical type of a stored datatype.
    ///
    /// Goes through the native class/size/sign queries rather than the
    /// typed descriptor so the resolution stays total: types the wrapper
    /// cannot describe (compound, enum, opaque, ...) resolve to `Other`
    /// instead of failing.
    pub(crate) fn of(dtype: &hdf5::Datatype) -> Self {
        let id = dtype.id();
        unsafe {
            match H5Tget_class(id) {
                H5T_class_t::H5T_INTEGER => {
                    let signed = H5Tget_sign(id) != H5T_sign_t::H5T_SGN_NONE;
                    TypeCode::integer(H5Tget_size(id), signed)
                }
                H5T_class_t::H5T_FLOAT => TypeCode::float(H5Tget_size(id)),
                H5T_class_t::H5T_STRING => TypeCode::String,
                _ => TypeCode::Other,
            }
        }
    }
}

impl Display for TypeCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeCode::U8 => write!(f, "u8"),
            TypeCode::I8 => write!(f, "i8"),
            TypeCode::U16 => write!(f, "u16"),
            TypeCode::I16 => write!(f, "i16"),
            TypeCode::U32 => write!(f, "u32"),
            TypeCode::I32 => write!(f, "i32"),
            TypeCode::U64 => write!(f, "u64"),
            TypeCode::I64 => write!(f, "i64"),
            TypeCode::F32 => write!(f, "f32"),
            TypeCode::F64 => write!(f, "f64"),
            TypeCode::String => write!(f, "string"),
            TypeCode::Other => write!(f, "other"),
        }
    }
}

/// Native numeric element types that can be written through the engine.
///
/// Each implementor carries the logical type it writes as, mirroring the
/// stored-type dispatch on the read side.
pub trait NumericData: H5Type + Copy + Send + Sync + 'static {
    const TYPE: TypeCode;
}

impl NumericData for u8 {
    const TYPE: TypeCode = TypeCode::U8;
}

impl NumericData for i8 {
    const TYPE: TypeCode = TypeCode::I8;
}

impl NumericData for u16 {
    const TYPE: TypeCode = TypeCode::U16;
}

impl NumericData for i16 {
    const TYPE: TypeCode = TypeCode::I16;
}

impl NumericData for u32 {
    const TYPE: TypeCode = TypeCode::U32;
}

impl NumericData for i32 {
    const TYPE: TypeCode = TypeCode::I32;
}

impl NumericData for u64 {
    const TYPE: TypeCode = TypeCode::U64;
}

impl NumericData for i64 {
    const TYPE: TypeCode = TypeCode::I64;
}

impl NumericData for f32 {
    const TYPE: TypeCode = TypeCode::F32;
}

impl NumericData for f64 {
    const TYPE: TypeCode = TypeCode::F64;
}

/// Ordered dimension extents of a dataset. An empty shape is a scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape(SmallVec<[usize; 3]>);

impl Shape {
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Number of elements in the flattened data: the product of all
    /// extents, which is 1 for a scalar.
    pub fn size(&self) -> usize {
        self.0.iter().product()
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().map(|x| x.to_string()).join(" x "))
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl Index<usize> for Shape {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<usize>> for Shape {
    fn from(shape: Vec<usize>) -> Self {
        Self(SmallVec::from_vec(shape))
    }
}

impl From<&[usize]> for Shape {
    fn from(shape: &[usize]) -> Self {
        Self(SmallVec::from_slice(shape))
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(SmallVec::from_iter(iter))
    }
}

/// Classification of a group's immediate child.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum ChildKind {
    Group = 0,
    Dataset = 1,
    Other = 2,
}

impl ChildKind {
    /// Numeric tag for flat transfer alongside the packed name buffer.
    pub fn code(self) -> u8 {
        self as u8
    }
}
