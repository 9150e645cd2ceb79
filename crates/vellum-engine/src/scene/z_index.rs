/// Draw and update priority of an entity.
///
/// Higher values tick later and render on top.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct ZIndex(pub i32);

impl ZIndex {
    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

impl From<i32> for ZIndex {
    fn from(v: i32) -> Self {
        Self(v)
    }
}
