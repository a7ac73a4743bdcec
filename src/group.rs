use std::path::Path;

use hdf5::{Group, LocationType};

use crate::datatype::ChildKind;
use crate::error::Result;
use crate::store;

/// The immediate children of one group, packed for flat transfer.
///
/// Child names are concatenated into one buffer with no separators; the
/// parallel length array re-splits it, so names may contain arbitrary
/// bytes. The parallel kind array classifies each child. All three arrays
/// preserve the engine's enumeration order.
#[derive(Debug, Default, Clone)]
pub struct GroupListing {
    names: Vec<u8>,
    lengths: Vec<usize>,
    kinds: Vec<ChildKind>,
}

impl GroupListing {
    pub(crate) fn push(&mut self, name: &[u8], kind: ChildKind) {
        self.names.extend_from_slice(name);
        self.lengths.push(name.len());
        self.kinds.push(kind);
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// All child names concatenated without separators.
    pub fn name_buffer(&self) -> &[u8] {
        &self.names
    }

    /// Per-name byte lengths, parallel to [`Self::name_buffer`].
    pub fn name_lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Per-child classification, parallel to [`Self::name_lengths`].
    pub fn kinds(&self) -> &[ChildKind] {
        &self.kinds
    }

    /// Re-split the packed buffer into per-child `(name, kind)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], ChildKind)> + '_ {
        self.lengths
            .iter()
            .zip(&self.kinds)
            .scan(0usize, |offset, (&len, &kind)| {
                let name = &self.names[*offset..*offset + len];
                *offset += len;
                Some((name, kind))
            })
    }
}

/// List the immediate children of `group` inside the file at `path`.
///
/// Either every child is listed or the operation fails; there is no
/// partial result. A child that is neither a group nor a dataset — or
/// whose object info cannot be resolved, such as a dangling soft link —
/// is classified as [`ChildKind::Other`].
pub fn list_group_children<P: AsRef<Path>>(path: P, group: &str) -> Result<GroupListing> {
    let file = store::open_read(path.as_ref())?;
    let group = store::open_group(&file, group)?;

    let mut listing = GroupListing::default();
    for name in group.member_names()? {
        let kind = classify(&group, &name);
        listing.push(name.as_bytes(), kind);
    }
    Ok(listing)
}

fn classify(group: &Group, name: &str) -> ChildKind {
    match group.loc_type_by_name(name) {
        Ok(LocationType::Group) => ChildKind::Group,
        Ok(LocationType::Dataset) => ChildKind::Dataset,
        _ => ChildKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_names_resplit() {
        let mut listing = GroupListing::default();
        listing.push(b"a", ChildKind::Dataset);
        listing.push(b"bb", ChildKind::Group);
        listing.push(b"ccc", ChildKind::Other);

        assert_eq!(listing.len(), 3);
        assert_eq!(listing.name_buffer(), b"abbccc");
        assert_eq!(listing.name_lengths(), &[1, 2, 3]);
        assert_eq!(
            listing.kinds().iter().map(|k| k.code()).collect::<Vec<_>>(),
            vec![1, 0, 2]
        );

        let entries: Vec<_> = listing.iter().collect();
        assert_eq!(entries[0], (&b"a"[..], ChildKind::Dataset));
        assert_eq!(entries[1], (&b"bb"[..], ChildKind::Group));
        assert_eq!(entries[2], (&b"ccc"[..], ChildKind::Other));
    }

    #[test]
    fn names_with_arbitrary_bytes() {
        let mut listing = GroupListing::default();
        listing.push(b"\x00\xff", ChildKind::Dataset);
        listing.push(b"", ChildKind::Group);

        let entries: Vec<_> = listing.iter().collect();
        assert_eq!(entries[0].0, b"\x00\xff");
        assert_eq!(entries[1].0, b"");
    }
}
