/// Which child slot of a parent a node occupies. Also used as a rotation direction: rotating a
/// node towards [`Side::Left`] moves it down into its own right child's left slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    /// The smaller-keys slot.
    Left,
    /// The larger-keys slot.
    Right,
}

impl Side {
    /// The opposite slot.
    pub(crate) fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_an_involution() {
        assert_eq!(Side::Left.flip(), Side::Right);
        assert_eq!(Side::Right.flip(), Side::Left);
        assert_eq!(Side::Left.flip().flip(), Side::Left);
    }
}
