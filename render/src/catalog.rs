//! Decoration style catalog: every style the engine paints with.
//!
//! All styles are created in one step when the view starts and disposed in
//! one step when it shuts down. Painting never allocates styles.

use std::array;
use std::path::Path;

use veriscope_types::LineStatus;

use crate::surface::{EditorSurface, OutlineStroke, StyleHandle, StyleSpec};

const RELATED_COLOR: &str = "#fe536aa0";
const RELATED_ACTIVE_COLOR: &str = "#fe536a";
const OUTLINE_WIDTH_PX: u8 = 2;

/// Gutter icon for one status: a single image, or two frames that alternate
/// while the line is being verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GutterIcon {
    Static(StyleHandle),
    Animated([StyleHandle; 2]),
}

/// Icon per status. `Unknown` lines have no icon.
#[derive(Debug)]
pub struct IconSet {
    icons: [Option<GutterIcon>; LineStatus::COUNT],
}

impl IconSet {
    fn acquire<S: EditorSurface + ?Sized>(
        surface: &mut S,
        icon_dir: &Path,
        names: fn(LineStatus) -> &'static [&'static str],
    ) -> Self {
        let mut create = |name: &'static str| {
            surface.create_style(&StyleSpec::GutterIcon {
                name,
                path: icon_dir.join(format!("{name}.png")),
            })
        };
        let icons = array::from_fn(|index| match names(LineStatus::ALL[index]) {
            [] => None,
            [single] => Some(GutterIcon::Static(create(single))),
            [first, second, ..] => Some(GutterIcon::Animated([create(first), create(second)])),
        });
        Self { icons }
    }

    #[must_use]
    pub fn get(&self, status: LineStatus) -> Option<GutterIcon> {
        self.icons[status.index()]
    }

    fn handles(&self) -> impl Iterator<Item = StyleHandle> + '_ {
        self.icons.iter().flatten().flat_map(|icon| match *icon {
            GutterIcon::Static(handle) => vec![handle],
            GutterIcon::Animated(frames) => frames.to_vec(),
        })
    }
}

/// Outline styles for related-range highlighting.
#[derive(Debug, Clone, Copy)]
pub struct RelationStyles {
    /// Simple error: solid outline.
    pub simple: StyleHandle,
    /// Part of a compound error that is not the one under the cursor.
    pub partial: StyleHandle,
    /// The compound error closest to the cursor, with everything it relates to.
    pub partial_active: StyleHandle,
}

impl RelationStyles {
    fn acquire<S: EditorSurface + ?Sized>(surface: &mut S) -> Self {
        let mut outline = |color, stroke| {
            surface.create_style(&StyleSpec::Outline {
                color,
                width_px: OUTLINE_WIDTH_PX,
                stroke,
            })
        };
        Self {
            simple: outline(RELATED_COLOR, OutlineStroke::Solid),
            partial: outline(RELATED_COLOR, OutlineStroke::Dashed),
            partial_active: outline(RELATED_ACTIVE_COLOR, OutlineStroke::Dashed),
        }
    }

    #[must_use]
    pub fn all(&self) -> [StyleHandle; 3] {
        [self.simple, self.partial, self.partial_active]
    }
}

/// Normal icons, grayed icons (shown while resolution fails) and relation outlines.
#[derive(Debug)]
pub struct DecorationCatalog {
    normal: IconSet,
    grayed: IconSet,
    relations: RelationStyles,
}

impl DecorationCatalog {
    /// Create every style on `surface`. Icons are `<icon_dir>/<name>.png`.
    pub fn acquire<S: EditorSurface + ?Sized>(surface: &mut S, icon_dir: &Path) -> Self {
        let catalog = Self {
            normal: IconSet::acquire(surface, icon_dir, normal_icon_names),
            grayed: IconSet::acquire(surface, icon_dir, grayed_icon_names),
            relations: RelationStyles::acquire(surface),
        };
        tracing::debug!(
            styles = catalog.handles().count(),
            icon_dir = %icon_dir.display(),
            "Decoration styles created"
        );
        catalog
    }

    #[must_use]
    pub fn normal(&self) -> &IconSet {
        &self.normal
    }

    #[must_use]
    pub fn grayed(&self) -> &IconSet {
        &self.grayed
    }

    #[must_use]
    pub fn relations(&self) -> &RelationStyles {
        &self.relations
    }

    fn handles(&self) -> impl Iterator<Item = StyleHandle> + '_ {
        self.normal
            .handles()
            .chain(self.grayed.handles())
            .chain(self.relations.all())
    }

    /// Dispose every style. Consumes the catalog so nothing can paint afterwards.
    pub fn release<S: EditorSurface + ?Sized>(self, surface: &mut S) {
        for handle in self.handles() {
            surface.dispose_style(handle);
        }
    }
}

fn normal_icon_names(status: LineStatus) -> &'static [&'static str] {
    match status {
        LineStatus::Unknown => &[],
        LineStatus::Scheduled => &["scheduled"],
        LineStatus::Verifying => &["verifying", "verifying-2"],
        LineStatus::VerifiedObsolete => &["verified-obsolete"],
        LineStatus::VerifiedVerifying => &["verified-verifying", "verified-verifying-2"],
        LineStatus::Verified => &["verified"],
        LineStatus::ErrorRangeObsolete => &["error-range-obsolete"],
        LineStatus::ErrorRangeVerifying => &["error-range-verifying", "error-range-verifying-2"],
        LineStatus::ErrorRange => &["error-range"],
        LineStatus::ErrorObsolete => &["error-obsolete"],
        LineStatus::ErrorVerifying => &["error-verifying", "error-verifying-2"],
        LineStatus::Error => &["error"],
        LineStatus::ResolutionError => &["resolution-error"],
        LineStatus::ErrorRangeStartObsolete => &["error-range-start-obsolete"],
        LineStatus::ErrorRangeStartVerifying => {
            &["error-range-start-verifying", "error-range-start-verifying-2"]
        }
        LineStatus::ErrorRangeStart => &["error-range-start"],
        LineStatus::ErrorRangeEndObsolete => &["error-range-end-obsolete"],
        LineStatus::ErrorRangeEndVerifying => {
            &["error-range-end-verifying", "error-range-end-verifying-2"]
        }
        LineStatus::ErrorRangeEnd => &["error-range-end"],
    }
}

/// Desaturated icons. Nothing animates here, and resolution errors keep
/// their normal icon.
fn grayed_icon_names(status: LineStatus) -> &'static [&'static str] {
    match status {
        LineStatus::Unknown => &[],
        LineStatus::Scheduled => &["scheduled"],
        LineStatus::Verifying
        | LineStatus::VerifiedObsolete
        | LineStatus::VerifiedVerifying
        | LineStatus::Verified => &["verified_gray"],
        LineStatus::ErrorRangeObsolete => &["error-range-obsolete_gray"],
        LineStatus::ErrorRangeVerifying => &["error-range-verifying_gray"],
        LineStatus::ErrorRange => &["error-range_gray"],
        LineStatus::ErrorObsolete => &["error-obsolete_gray"],
        LineStatus::ErrorVerifying => &["error-verifying_gray"],
        LineStatus::Error => &["error_gray"],
        LineStatus::ResolutionError => &["resolution-error"],
        LineStatus::ErrorRangeStartObsolete
        | LineStatus::ErrorRangeStartVerifying
        | LineStatus::ErrorRangeStart => &["error-range-start_gray"],
        LineStatus::ErrorRangeEndObsolete
        | LineStatus::ErrorRangeEndVerifying
        | LineStatus::ErrorRangeEnd => &["error-range-end_gray"],
    }
}
