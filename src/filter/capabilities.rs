//! Presentation capabilities a filter component can opt into.
//!
//! Each trait covers one concern and is implemented per component type, so a
//! component only carries the capabilities it actually supports.

use serde::{Deserialize, Serialize};

/// Where a component's caption is placed relative to its value editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionPosition {
    #[default]
    Top,
    Left,
}

pub trait HasCaption {
    fn caption(&self) -> Option<&str>;

    fn set_caption(&mut self, caption: Option<String>);

    /// Caption to display, falling back to `fallback` when none is set
    fn caption_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.caption().unwrap_or(fallback)
    }
}

pub trait SupportsCaptionPosition {
    fn caption_position(&self) -> CaptionPosition;

    fn set_caption_position(&mut self, position: CaptionPosition);
}

pub trait Collapsible {
    fn is_collapsible(&self) -> bool;

    fn set_collapsible(&mut self, collapsible: bool);

    fn is_expanded(&self) -> bool;

    /// Ignored while the component is not collapsible
    fn set_expanded(&mut self, expanded: bool);

    fn toggle_expanded(&mut self) {
        let expanded = self.is_expanded();
        self.set_expanded(!expanded);
    }
}

pub trait SupportsColumnsCount {
    fn columns_count(&self) -> u16;

    /// Values below one are clamped to one
    fn set_columns_count(&mut self, columns: u16);
}
