//! Pointer interaction state for the map tooltip.
//!
//! State changes only through [`InteractionState::reduce`], which returns a
//! new record and leaves the previous one untouched.

use serde::Serialize;

/// Pointer events delivered by the map surface and its regions
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved over the map surface (client coordinates)
    Move { x: f64, y: f64 },
    /// Pointer entered the map surface
    EnterMap,
    /// Pointer left the map surface
    LeaveMap,
    /// Pointer entered one region
    EnterRegion { name: String, value: Option<f64> },
}

/// Tooltip position, activity and hover target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionState {
    pub position: [f64; 2],
    pub active: bool,
    pub region_name: String,
    pub region_value: Option<f64>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            active: true,
            region_name: "default".to_string(),
            region_value: None,
        }
    }
}

impl InteractionState {
    pub fn reduce(&self, event: &PointerEvent) -> InteractionState {
        match event {
            PointerEvent::Move { x, y } => InteractionState {
                position: [*x, *y],
                active: true,
                ..self.clone()
            },
            PointerEvent::EnterMap => InteractionState {
                active: true,
                ..self.clone()
            },
            PointerEvent::LeaveMap => InteractionState {
                active: false,
                ..self.clone()
            },
            // Hovering a region never toggles the tooltip by itself
            PointerEvent::EnterRegion { name, value } => InteractionState {
                region_name: name.clone(),
                region_value: *value,
                ..self.clone()
            },
        }
    }
}
