use crate::style::Color;
use crate::ui::{Rect, Signal};
use bitflags::bitflags;

use super::ElementId;

bitflags! {
    /// Raw element flags. The layout bits only mean something on frames; when several are
    /// set, grid wins over horizontal and horizontal over vertical.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ElementFlags: u32 {
        const HIDDEN = 1;
        const PASSWORD = 1 << 1;
        const DRAGGABLE = 1 << 2;
        const CLIP = 1 << 3;
        const LAYOUT_HORIZONTAL = 1 << 4;
        const LAYOUT_GRID = 1 << 5;
        const SCROLLABLE = 1 << 6;
        const LAYOUT_VERTICAL = 1 << 7;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub position: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(position: f32, color: Color) -> Self {
        Self { position, color }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub stops: Vec<GradientStop>,
    /// Degrees. Angles closer to vertical than horizontal paint row by row.
    pub angle: f32,
}

impl Gradient {
    /// Color at `t` in `[0, 1]`. Falls back to the first stop when `t` lies outside every
    /// stop interval.
    pub fn sample(&self, t: f32) -> Option<Color> {
        let first = self.stops.first()?;
        for pair in self.stops.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if t >= from.position && t <= to.position {
                let span = to.position - from.position;
                if span <= f32::EPSILON {
                    return Some(from.color);
                }
                return Some(from.color.lerp(to.color, (t - from.position) / span));
            }
        }
        Some(first.color)
    }

    pub fn is_vertical(&self) -> bool {
        let radians = self.angle.to_radians();
        radians.sin().abs() > radians.cos().abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub width: i32,
    pub color: Color,
    pub alpha: u8,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub gradient: Option<Gradient>,
    pub outline: Option<Outline>,
    pub rounded: Option<i32>,
}

/// Geometry, ordering, presentation and hover state shared by every element kind.
#[derive(Debug)]
pub struct ElementCore {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub z_index: i32,
    /// Tree-wide insertion sequence, used to break z-index ties.
    pub creation: u64,
    pub flags: ElementFlags,
    pub transparency: f32,
    pub custom_color: Option<Color>,
    pub effects: Effects,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    pub hovered_prev: bool,
    pub on_hover_enter: Signal<()>,
    pub on_hover_leave: Signal<()>,
}

impl ElementCore {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            z_index: 0,
            creation: 0,
            flags: ElementFlags::empty(),
            transparency: 1.0,
            custom_color: None,
            effects: Effects::default(),
            parent: None,
            children: Vec::new(),
            hovered_prev: false,
            on_hover_enter: Signal::new(),
            on_hover_leave: Signal::new(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(ElementFlags::HIDDEN)
    }

    pub fn bounds_at(&self, wx: i32, wy: i32) -> Rect {
        Rect::new(wx, wy, self.w, self.h)
    }

    pub fn set_transparency(&mut self, alpha: f32) {
        self.transparency = alpha.clamp(0.0, 1.0);
    }

    /// Copies everything but identity, tree links, hover state and subscriptions.
    pub fn duplicate(&self) -> Self {
        let mut copy = Self::new(self.x, self.y, self.w, self.h);
        copy.z_index = self.z_index;
        copy.flags = self.flags;
        copy.transparency = self.transparency;
        copy.custom_color = self.custom_color;
        copy.effects = self.effects.clone();
        copy
    }
}
