use crate::error::LayoutError;
use crate::pagesize::{self, PageSize};
use crate::units::Mm;
use serde::{Deserialize, Serialize};

/// Margins bound the content area of every page. The page-flow controller
/// breaks to a new page whenever content would cross the bottom margin;
/// header and footer decorations live in the top and bottom margins.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: Mm,
    pub right: Mm,
    pub bottom: Mm,
    pub left: Mm,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Mm, right: Mm, bottom: Mm, left: Mm) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Mm>>(value: D) -> Margins {
        let value: Mm = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Mm, horizontal: Mm) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

/// The physical page and its margins, fixed for the lifetime of one render.
///
/// Coordinates handed out by the engine have their origin at the top-left
/// corner of the page with y growing downwards.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: Mm,
    pub height: Mm,
    pub margins: Margins,
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::a4()
    }
}

impl PageGeometry {
    /// Create a validated geometry from a page size and margins
    pub fn new(size: PageSize, margins: Margins) -> Result<PageGeometry, LayoutError> {
        let geometry = PageGeometry {
            width: size.0,
            height: size.1,
            margins,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// A4 portrait with 20mm margins all around
    pub fn a4() -> PageGeometry {
        PageGeometry {
            width: pagesize::A4.0,
            height: pagesize::A4.1,
            margins: Margins::all(Mm(20.0)),
        }
    }

    /// Checks that at least some content area remains inside the margins.
    /// Geometry deserialized from configuration bypasses [PageGeometry::new],
    /// so rendering calls this again before any placement happens.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let Margins {
            top,
            right,
            bottom,
            left,
        } = self.margins;

        if !(self.width.0.is_finite() && self.width.0 > 0.0)
            || !(self.height.0.is_finite() && self.height.0 > 0.0)
        {
            return Err(LayoutError::InvalidGeometry(format!(
                "page size {} x {} must be positive",
                self.width, self.height
            )));
        }
        if [top, right, bottom, left]
            .iter()
            .any(|m| !m.0.is_finite() || m.0 < 0.0)
        {
            return Err(LayoutError::InvalidGeometry(
                "margins must be finite and non-negative".into(),
            ));
        }
        if top + bottom >= self.height {
            return Err(LayoutError::InvalidGeometry(format!(
                "vertical margins {} + {} leave no room on a {} tall page",
                top, bottom, self.height
            )));
        }
        if left + right >= self.width {
            return Err(LayoutError::InvalidGeometry(format!(
                "horizontal margins {} + {} leave no room on a {} wide page",
                left, right, self.width
            )));
        }
        Ok(())
    }

    /// The y coordinate where content starts on every page
    pub fn content_top(&self) -> Mm {
        self.margins.top
    }

    /// The y coordinate content may not cross
    pub fn content_bottom(&self) -> Mm {
        self.height - self.margins.bottom
    }

    pub fn content_left(&self) -> Mm {
        self.margins.left
    }

    pub fn content_width(&self) -> Mm {
        self.width - self.margins.left - self.margins.right
    }

    pub fn content_height(&self) -> Mm {
        self.height - self.margins.top - self.margins.bottom
    }

    /// The geometric centre of the page (not of the content area)
    pub fn center(&self) -> (Mm, Mm) {
        (self.width / 2.0, self.height / 2.0)
    }
}
