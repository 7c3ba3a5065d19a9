use tracing::debug;

use crate::app::domain::datasets::{PICKER_SHAPES, picker_shape};
use crate::app::domain::region::PickerShape;
use crate::app::services::styling::{ShapeStyle, picker_style};

/// Called with the display name of a newly selected shape.
pub type SelectionNotifier = Box<dyn FnMut(&str)>;

/// What the info panel shows for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoPanel {
    pub name: &'static str,
    pub swatch: &'static str,
}

/// Hover and selection of the region picker diagram.
pub struct RegionPickerState {
    shapes: &'static [PickerShape],
    hovered: Option<String>,
    selected: Option<String>,
    notifier: Option<SelectionNotifier>,
}

impl RegionPickerState {
    pub fn new(notifier: Option<SelectionNotifier>) -> Self {
        Self {
            shapes: &PICKER_SHAPES,
            hovered: None,
            selected: None,
            notifier,
        }
    }

    pub fn shapes(&self) -> &'static [PickerShape] {
        self.shapes
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hover(&mut self, id: &str) {
        self.hovered = Some(id.to_string());
    }

    pub fn unhover(&mut self) {
        self.hovered = None;
    }

    /// Overwrite the selection. There is no way to clear it.
    ///
    /// A click lands on the shape under the pointer, so the hover moves to
    /// `id` as well.
    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
        self.hovered = Some(id.to_string());
        let Some(shape) = picker_shape(id) else {
            debug!(id, "selected id is not a known shape");
            return;
        };
        debug!(id, "picker region selected");
        if let Some(notify) = self.notifier.as_mut() {
            notify(shape.name);
        }
    }

    pub fn style_for(&self, shape: &PickerShape) -> ShapeStyle {
        picker_style(
            shape,
            self.selected.as_deref() == Some(shape.id),
            self.hovered.as_deref() == Some(shape.id),
        )
    }

    /// Style of the shape with `id`, if it exists.
    pub fn style_of(&self, id: &str) -> Option<ShapeStyle> {
        picker_shape(id).map(|shape| self.style_for(shape))
    }

    pub fn info_panel(&self) -> Option<InfoPanel> {
        let shape = picker_shape(self.selected.as_deref()?)?;
        Some(InfoPanel {
            name: shape.name,
            swatch: shape.color,
        })
    }
}

impl Default for RegionPickerState {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn strokes(style: ShapeStyle) -> (&'static str, i32, f32) {
        (style.stroke, style.stroke_width, style.opacity)
    }

    #[test]
    fn test_hover_then_select_other_shape() {
        let mut picker = RegionPickerState::default();
        picker.hover("moscow");
        assert_eq!(strokes(picker.style_of("moscow").unwrap()), ("#666", 2, 0.8));

        picker.select("spb");

        assert_eq!(strokes(picker.style_of("spb").unwrap()), ("#FF0000", 3, 0.9));
        assert_eq!(strokes(picker.style_of("moscow").unwrap()), ("#333", 1, 0.7));
    }

    #[test]
    fn test_select_is_idempotent() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        let mut picker = RegionPickerState::new(Some(Box::new(move |name: &str| {
            sink.borrow_mut().push(name.to_string());
        })));

        picker.select("krasnodar");
        let style = picker.style_of("krasnodar");
        let panel = picker.info_panel();
        picker.select("krasnodar");

        assert_eq!(picker.selected(), Some("krasnodar"));
        assert_eq!(picker.style_of("krasnodar"), style);
        assert_eq!(picker.info_panel(), panel);
        assert_eq!(*calls.borrow(), vec!["Краснодарский край", "Краснодарский край"]);
    }

    #[test]
    fn test_unhover_restores_default() {
        let mut picker = RegionPickerState::default();
        picker.hover("omsk");
        picker.unhover();
        assert!(picker.hovered().is_none());
        assert_eq!(strokes(picker.style_of("omsk").unwrap()), ("#333", 1, 0.7));
    }

    #[test]
    fn test_selection_wins_over_hover() {
        let mut picker = RegionPickerState::default();
        picker.select("tomsk");
        picker.hover("tomsk");
        assert_eq!(strokes(picker.style_of("tomsk").unwrap()), ("#FF0000", 3, 0.9));
    }

    #[test]
    fn test_info_panel_follows_selection() {
        let mut picker = RegionPickerState::default();
        assert!(picker.info_panel().is_none());
        picker.select("spb");
        assert_eq!(
            picker.info_panel(),
            Some(InfoPanel {
                name: "Санкт-Петербург",
                swatch: "#4ECDC4",
            })
        );
        picker.select("crimea");
        assert_eq!(picker.info_panel().map(|p| p.name), Some("Крым"));
    }

    #[test]
    fn test_unknown_ids_degrade_quietly() {
        let called = Rc::new(RefCell::new(false));
        let flag = called.clone();
        let mut picker = RegionPickerState::new(Some(Box::new(move |_: &str| {
            *flag.borrow_mut() = true;
        })));
        picker.hover("atlantis");
        picker.select("atlantis");
        assert!(picker.info_panel().is_none());
        assert!(picker.style_of("atlantis").is_none());
        assert!(!*called.borrow());
        for shape in picker.shapes() {
            assert_eq!(strokes(picker.style_for(shape)), ("#333", 1, 0.7));
        }
    }

    #[test]
    fn test_missing_notifier_is_noop() {
        let mut picker = RegionPickerState::new(None);
        picker.select("yakutia");
        assert_eq!(picker.selected(), Some("yakutia"));
    }
}
