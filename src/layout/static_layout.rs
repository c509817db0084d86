use std::collections::BTreeMap;
use std::path::Path;

use crate::foundation::core::{Rect, Vec2, Viewport};
use crate::foundation::error::{NeonError, NeonResult};
use crate::layout::resolver::{ElementId, LayoutSource};

/// Element box in CSS pixels, viewport space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Fixed page geometry, loaded from JSON or built in code. Stands in for a live page when the
/// engine runs headless.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StaticLayout {
    pub viewport: Viewport,
    #[serde(default)]
    pub elements: BTreeMap<ElementId, ElementBox>,
}

impl StaticLayout {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            elements: BTreeMap::new(),
        }
    }

    pub fn from_json_str(s: &str) -> NeonResult<Self> {
        let layout: Self = serde_json::from_str(s)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_path(path: impl AsRef<Path>) -> NeonResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            NeonError::layout(format!("failed to read layout '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> NeonResult<()> {
        Viewport::new(self.viewport.width, self.viewport.height)
            .map_err(|e| NeonError::layout(e.to_string()))?;
        for (id, b) in &self.elements {
            let ok = [b.x, b.y, b.width, b.height].iter().all(|v| v.is_finite())
                && b.width >= 0.0
                && b.height >= 0.0;
            if !ok {
                return Err(NeonError::layout(format!("element '{id}' has an invalid box")));
            }
        }
        Ok(())
    }

    pub fn with_element(mut self, id: &str, b: ElementBox) -> Self {
        self.set_element(id, b);
        self
    }

    pub fn set_element(&mut self, id: &str, b: ElementBox) {
        self.elements.insert(ElementId::new(id), b);
    }

    pub fn remove_element(&mut self, id: &str) -> Option<ElementBox> {
        self.elements.remove(&ElementId::new(id))
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Scrolling the page by `dy` moves every element by `-dy` in viewport space.
    pub fn scroll_by(&mut self, dy: f64) {
        let shift = Vec2::new(0.0, -dy);
        for b in self.elements.values_mut() {
            b.x += shift.x;
            b.y += shift.y;
        }
    }
}

impl LayoutSource for StaticLayout {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn element_bounds(&self, id: &ElementId) -> Option<Rect> {
        self.elements.get(id).map(|b| b.to_rect())
    }
}
