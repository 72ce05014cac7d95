use crate::models::Region;

impl Region {
    /// Regions considered nearby for recommendations
    ///
    /// The table is hand-authored and not symmetric: south lists mount_lebanon,
    /// mount_lebanon does not list south.
    pub fn neighbours(self) -> &'static [Region] {
        use Region::*;

        match self {
            Beirut => &[MountLebanon],
            MountLebanon => &[Beirut, North, Bekaa],
            North => &[MountLebanon, Bekaa],
            South => &[MountLebanon, Nabatieh],
            Bekaa => &[MountLebanon, North, Nabatieh],
            Nabatieh => &[South, Bekaa],
        }
    }

    #[inline]
    pub fn has_neighbours(self) -> bool {
        !self.neighbours().is_empty()
    }
}
