//! Transform gizmo binding state
//!
//! The gizmo is bound to at most one target. Orbit camera input and gizmo drags
//! are mutually exclusive: [`TransformController::orbit_enabled`] is false for
//! exactly the duration of a drag.

use crate::settings::AffineMode;

/// Interaction mode of an attached gizmo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoMode {
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    pub fn from_affine(mode: AffineMode) -> Option<Self> {
        match mode {
            AffineMode::None => None,
            AffineMode::Translate => Some(Self::Translate),
            AffineMode::Rotate => Some(Self::Rotate),
            AffineMode::Scale => Some(Self::Scale),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding<H> {
    Detached,
    Attached { target: H, mode: GizmoMode },
}

#[derive(Debug, Clone)]
pub struct TransformController<H> {
    binding: Binding<H>,
    dragging: bool,
}

impl<H> Default for TransformController<H> {
    fn default() -> Self {
        Self {
            binding: Binding::Detached,
            dragging: false,
        }
    }
}

impl<H: Copy + PartialEq> TransformController<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding(&self) -> Binding<H> {
        self.binding
    }

    pub fn target(&self) -> Option<H> {
        match self.binding {
            Binding::Attached { target, .. } => Some(target),
            Binding::Detached => None,
        }
    }

    pub fn mode(&self) -> Option<GizmoMode> {
        match self.binding {
            Binding::Attached { mode, .. } => Some(mode),
            Binding::Detached => None,
        }
    }

    /// Apply a panel mode selection. `none` detaches regardless of prior state;
    /// any other mode attaches to `current`, or detaches if there is no object.
    pub fn set_mode(&mut self, mode: AffineMode, current: Option<H>) {
        match (GizmoMode::from_affine(mode), current) {
            (Some(mode), Some(target)) => {
                if self.target() != Some(target) {
                    self.dragging = false;
                }
                self.binding = Binding::Attached { target, mode };
            }
            _ => self.detach(),
        }
    }

    pub fn detach(&mut self) {
        self.binding = Binding::Detached;
        self.dragging = false;
    }

    /// Start a drag; only possible while attached
    pub fn begin_drag(&mut self) -> bool {
        if matches!(self.binding, Binding::Attached { .. }) {
            self.dragging = true;
        }
        self.dragging
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn orbit_enabled(&self) -> bool {
        !self.dragging
    }
}
