//! Location tracking for validation errors.
//!
//! A `Path` is a borrowed linked list that grows one segment per level of
//! descent. It costs nothing on the success path and is only materialized
//! into owned strings when an error is built.

use std::fmt;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Root,
    Name(&'a str),
    Index(usize),
}

/// Where in a value tree validation currently is.
#[derive(Debug, Clone, Copy)]
pub struct Path<'a> {
    parent: Option<&'a Path<'a>>,
    segment: Segment<'a>,
}

impl Path<'static> {
    pub const ROOT: Path<'static> = Path {
        parent: None,
        segment: Segment::Root,
    };

    pub fn root() -> Self {
        Self::ROOT
    }
}

impl<'a> Path<'a> {
    /// Descend into a struct field or enum variant.
    pub fn field<'b>(&'b self, name: &'b str) -> Path<'b>
    where
        'a: 'b,
    {
        Path {
            parent: Some(self),
            segment: Segment::Name(name),
        }
    }

    /// Descend into an array element, map entry, or tuple position.
    pub fn index<'b>(&'b self, index: usize) -> Path<'b>
    where
        'a: 'b,
    {
        Path {
            parent: Some(self),
            segment: Segment::Index(index),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Segments from the root down, e.g. `["items", "3", "StructBased", "name"]`.
    pub fn segments(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut cursor = Some(self);
        while let Some(path) = cursor {
            match path.segment {
                Segment::Root => {}
                Segment::Name(name) => out.push(name.to_string()),
                Segment::Index(i) => out.push(i.to_string()),
            }
            cursor = path.parent;
        }
        out.reverse();
        out
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<root>");
        }
        f.write_str(&self.segments().join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_ordered_root_first() {
        let root = Path::root();
        let items = root.field("items");
        let third = items.index(3);
        let variant = third.field("StructBased");
        let name = variant.field("name");
        assert_eq!(name.segments(), vec!["items", "3", "StructBased", "name"]);
        assert_eq!(name.to_string(), "items.3.StructBased.name");
    }

    #[test]
    fn root_has_no_segments() {
        assert!(Path::root().segments().is_empty());
        assert_eq!(Path::root().to_string(), "<root>");
    }
}
