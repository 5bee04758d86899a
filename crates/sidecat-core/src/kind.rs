//! Media kinds and kind sets.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// Coarse classification of a media file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
pub enum MediaKind {
    Video,
    Audio,
    Image,
    Unknown,
}

impl MediaKind {
    /// Every kind in enumeration order.
    pub const ALL: [MediaKind; 4] = [
        MediaKind::Video,
        MediaKind::Audio,
        MediaKind::Image,
        MediaKind::Unknown,
    ];

    /// Kinds that take part in indexing and rendering, in rendering order.
    pub const INDEXABLE: [MediaKind; 3] = [MediaKind::Video, MediaKind::Audio, MediaKind::Image];

    /// Stable internal (English) name.
    pub fn name(self) -> &'static str {
        match self {
            MediaKind::Video => "Video",
            MediaKind::Audio => "Audio",
            MediaKind::Image => "Image",
            MediaKind::Unknown => "Unknown",
        }
    }

    /// Name shown to users for this kind's folder.
    pub fn display_name(self) -> &'static str {
        match self {
            MediaKind::Video => "Videos",
            MediaKind::Audio => "Music",
            MediaKind::Image => "Photos",
            MediaKind::Unknown => "?",
        }
    }

    /// Whether this kind is indexed at all.
    pub fn is_indexable(self) -> bool {
        self != MediaKind::Unknown
    }

    /// Check a filter token against the internal or display name, ignoring case.
    pub fn matches_token(self, token: &str) -> bool {
        let token = token.trim();
        eq_ignore_case(self.name(), token) || eq_ignore_case(self.display_name(), token)
    }

    /// Find the kind named by a filter token, if any.
    pub fn from_token(token: &str) -> Option<MediaKind> {
        MediaKind::iter().find(|kind| kind.matches_token(token))
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// A set of media kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KindSet(u8);

impl KindSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every kind, including `Unknown`.
    pub fn all() -> Self {
        MediaKind::iter().collect()
    }

    /// Add a kind. Returns true if it was not already present.
    pub fn insert(&mut self, kind: MediaKind) -> bool {
        let added = !self.contains(kind);
        self.0 |= kind.bit();
        added
    }

    pub fn contains(&self, kind: MediaKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(self, other: KindSet) -> KindSet {
        KindSet(self.0 | other.0)
    }

    pub fn intersection(self, other: KindSet) -> KindSet {
        KindSet(self.0 & other.0)
    }

    /// Iterate members in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = MediaKind> + '_ {
        MediaKind::iter().filter(|kind| self.contains(*kind))
    }
}

impl FromIterator<MediaKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = MediaKind>>(iter: I) -> Self {
        let mut set = KindSet::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl Extend<MediaKind> for KindSet {
    fn extend<I: IntoIterator<Item = MediaKind>>(&mut self, iter: I) {
        for kind in iter {
            self.insert(kind);
        }
    }
}

impl Serialize for KindSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for KindSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let kinds = Vec::<MediaKind>::deserialize(deserializer)?;
        Ok(kinds.into_iter().collect())
    }
}
