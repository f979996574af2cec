use crate::error::RoiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// One of the three scanned faces of the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Top,
    Right,
}

impl Side {
    pub const ALL: [Side; 3] = [Side::Left, Side::Top, Side::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Top => "top",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = RoiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Side::ALL
            .into_iter()
            .find(|side| side.as_str() == value)
            .ok_or_else(|| RoiError::InvalidSide(value.to_owned()))
    }
}

/// Fixed-size map with exactly one value per side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SideMap<T> {
    pub left: T,
    pub top: T,
    pub right: T,
}

impl<T> SideMap<T> {
    pub fn from_fn(mut make: impl FnMut(Side) -> T) -> Self {
        Self { left: make(Side::Left), top: make(Side::Top), right: make(Side::Right) }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Top => &self.top,
            Side::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().map(move |side| (side, self.get(side)))
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_names_round_trip_through_from_str() {
        for side in Side::ALL {
            assert_eq!(side.as_str().parse::<Side>().expect("known side"), side);
        }
    }

    #[test]
    fn unknown_side_is_rejected() {
        let error = "bottom".parse::<Side>().expect_err("bottom is not a side");
        assert!(matches!(error, RoiError::InvalidSide(name) if name == "bottom"));
    }

    #[test]
    fn side_map_indexes_by_side() {
        let mut map = SideMap::from_fn(|side| side.as_str().len());
        assert_eq!(map[Side::Left], 4);
        assert_eq!(map[Side::Top], 3);
        map[Side::Right] = 0;
        assert_eq!(map.right, 0);
    }
}
