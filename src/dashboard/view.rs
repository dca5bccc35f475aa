//! Renderer sink
//!
//! Display values are pushed per logical element. The terminal UI reads
//! them back from [`ViewModel`]; tests inspect it directly.

use std::collections::HashMap;

use crate::cooldowns::CooldownCategory;
use crate::regen::ResourceKind;

/// Logical display elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    EnergyBar,
    EnergyText,
    EnergyTimer,
    EnergyClock,
    NerveBar,
    NerveText,
    NerveTimer,
    NerveClock,
    Drug,
    Medical,
    Booster,
    Racing,
}

impl ElementId {
    /// Stable identifier, e.g. `"energy-bar"`
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::EnergyBar => "energy-bar",
            ElementId::EnergyText => "energy-text",
            ElementId::EnergyTimer => "energy-timer",
            ElementId::EnergyClock => "energy-clock",
            ElementId::NerveBar => "nerve-bar",
            ElementId::NerveText => "nerve-text",
            ElementId::NerveTimer => "nerve-timer",
            ElementId::NerveClock => "nerve-clock",
            ElementId::Drug => "drug",
            ElementId::Medical => "medical",
            ElementId::Booster => "booster",
            ElementId::Racing => "racing",
        }
    }

    pub fn bar(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Energy => ElementId::EnergyBar,
            ResourceKind::Nerve => ElementId::NerveBar,
        }
    }

    pub fn text(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Energy => ElementId::EnergyText,
            ResourceKind::Nerve => ElementId::NerveText,
        }
    }

    pub fn timer(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Energy => ElementId::EnergyTimer,
            ResourceKind::Nerve => ElementId::NerveTimer,
        }
    }

    pub fn clock(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Energy => ElementId::EnergyClock,
            ResourceKind::Nerve => ElementId::NerveClock,
        }
    }

    pub fn cooldown(category: CooldownCategory) -> Self {
        match category {
            CooldownCategory::Drug => ElementId::Drug,
            CooldownCategory::Medical => ElementId::Medical,
            CooldownCategory::Booster => ElementId::Booster,
        }
    }
}

/// What an element currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementView {
    /// Bar width, 0..=100
    Percent(u8),
    Text(String),
    /// Call-to-action pointing at an external page
    Action { label: String, url: String },
}

/// Per-element update operations
pub trait Renderer {
    fn set_percent(&mut self, id: ElementId, percent: u8);
    fn set_text(&mut self, id: ElementId, text: String);
    fn set_action(&mut self, id: ElementId, label: &str, url: &str);
}

/// Latest value pushed to each element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewModel {
    elements: HashMap<ElementId, ElementView>,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementView> {
        self.elements.get(&id)
    }

    /// Text of an element, if it currently shows text
    pub fn text(&self, id: ElementId) -> Option<&str> {
        match self.elements.get(&id) {
            Some(ElementView::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Percentage of a bar element, 0 if not drawn yet
    pub fn percent(&self, id: ElementId) -> u8 {
        match self.elements.get(&id) {
            Some(ElementView::Percent(pct)) => *pct,
            _ => 0,
        }
    }

    pub fn is_action(&self, id: ElementId) -> bool {
        matches!(self.elements.get(&id), Some(ElementView::Action { .. }))
    }
}

impl Renderer for ViewModel {
    fn set_percent(&mut self, id: ElementId, percent: u8) {
        self.elements.insert(id, ElementView::Percent(percent.min(100)));
    }

    fn set_text(&mut self, id: ElementId, text: String) {
        self.elements.insert(id, ElementView::Text(text));
    }

    fn set_action(&mut self, id: ElementId, label: &str, url: &str) {
        self.elements.insert(
            id,
            ElementView::Action {
                label: label.to_string(),
                url: url.to_string(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids() {
        assert_eq!(ElementId::bar(ResourceKind::Energy).as_str(), "energy-bar");
        assert_eq!(ElementId::clock(ResourceKind::Nerve).as_str(), "nerve-clock");
        assert_eq!(ElementId::cooldown(CooldownCategory::Booster).as_str(), "booster");
        assert_eq!(ElementId::Racing.as_str(), "racing");
    }

    #[test]
    fn test_view_model_replaces_values() {
        let mut view = ViewModel::new();
        view.set_text(ElementId::Drug, "⏳ 5s".to_string());
        assert_eq!(view.text(ElementId::Drug), Some("⏳ 5s"));

        view.set_action(ElementId::Drug, "Use now", "https://example.com");
        assert!(view.is_action(ElementId::Drug));
        assert_eq!(view.text(ElementId::Drug), None);

        view.set_percent(ElementId::EnergyBar, 140);
        assert_eq!(view.percent(ElementId::EnergyBar), 100);
    }
}
