use crate::style::{Color, Theme};
use crate::ui::{Rect, TextService};
use crate::view::base_component::{ElementCore, ElementFlags, ElementId, ElementKind, FrameState};
use crate::view::element_tree::ElementTree;
use crate::view::render_pass::{
    BlitPass, ClearPass, ClipPass, DrawRectPass, GradientPass, OutlinePass, PassList,
};

const SCROLLBAR_COLOR: Color = Color::rgb(150, 150, 150);
const SCROLLBAR_ALPHA: f32 = 200.0;
const SCROLLBAR_MARGIN: i32 = 2;

/// Everything a variant needs to turn itself into passes.
pub(crate) struct PaintContext<'a> {
    pub theme: &'a Theme,
    pub text: &'a mut dyn TextService,
    pub passes: &'a mut PassList,
    pub pointer: (i32, i32),
    pub now_ms: u64,
}

/// Per-element facts resolved before painting.
pub(crate) struct PaintTarget {
    pub bounds: Rect,
    pub hovered: bool,
    pub focused: bool,
    pub transparency: f32,
    pub custom_color: Option<Color>,
    /// Already faded by the element's transparency.
    pub text_color: Color,
}

impl PaintContext<'_> {
    pub fn fill(&mut self, rect: Rect, color: Color) {
        self.passes.push(DrawRectPass::new(rect, color));
    }

    /// Background then outline. A gradient replaces the rounded or flat fill.
    pub fn paint_base(&mut self, core: &ElementCore, bounds: Rect, color: Color) {
        let effects = &core.effects;
        let fill = color.fade(core.transparency);
        if let Some(gradient) = &effects.gradient {
            self.passes.push(GradientPass::new(
                bounds,
                gradient.clone(),
                core.transparency,
            ));
        } else if let Some(radius) = effects.rounded {
            self.passes.push(DrawRectPass::rounded(bounds, fill, radius));
        } else {
            self.fill(bounds, fill);
        }

        if let Some(outline) = &effects.outline {
            let alpha = (outline.alpha as f32 / 255.0) * core.transparency * 255.0;
            let color = outline.color.with_alpha(alpha as u8);
            self.passes
                .push(OutlinePass::new(bounds, outline.width, color));
        }
    }
}

/// Passes for one frame plus the hover transitions observed while building them.
pub struct FramePlan {
    pub passes: PassList,
    pub hover_changes: Vec<(ElementId, bool)>,
}

/// Walks the tree back to front and records what to draw. Hover state is updated in place;
/// the caller fires the matching callbacks once the passes have run.
pub(crate) fn build_frame(
    tree: &mut ElementTree,
    theme: &Theme,
    text: &mut dyn TextService,
    pointer: (i32, i32),
    focused: Option<ElementId>,
    now_ms: u64,
) -> FramePlan {
    let mut passes = PassList::new();
    passes.push(ClearPass::new(theme.background));
    let mut hover_changes = Vec::new();
    {
        let mut ctx = PaintContext {
            theme,
            text,
            passes: &mut passes,
            pointer,
            now_ms,
        };
        let roots = tree.roots().to_vec();
        paint_level(tree, &roots, (0, 0), focused, &mut ctx, &mut hover_changes);
    }
    FramePlan {
        passes,
        hover_changes,
    }
}

struct NestedFrame {
    children: Vec<ElementId>,
    bounds: Rect,
    origin: (i32, i32),
    clip: bool,
    scrollbar: Option<(Rect, Color)>,
}

fn paint_level(
    tree: &mut ElementTree,
    ids: &[ElementId],
    parent_origin: (i32, i32),
    focused: Option<ElementId>,
    ctx: &mut PaintContext<'_>,
    hover_changes: &mut Vec<(ElementId, bool)>,
) {
    for id in tree.paint_order(ids) {
        let Some(element) = tree.get_mut(id) else {
            continue;
        };
        let core = &mut element.core;
        let (wx, wy) = (parent_origin.0 + core.x, parent_origin.1 + core.y);
        let bounds = core.bounds_at(wx, wy);
        let hovered = bounds.contains_inclusive(ctx.pointer.0, ctx.pointer.1);
        if hovered != core.hovered_prev {
            core.hovered_prev = hovered;
            hover_changes.push((id, hovered));
        }

        let target = PaintTarget {
            bounds,
            hovered,
            focused: focused == Some(id),
            transparency: core.transparency,
            custom_color: core.custom_color,
            text_color: core
                .custom_color
                .map_or(ctx.theme.on_surface, Color::on_color)
                .fade(core.transparency),
        };

        let core = &element.core;
        let nested = match &mut element.kind {
            ElementKind::Frame(frame) => {
                let color = target.custom_color.unwrap_or(ctx.theme.surface);
                ctx.paint_base(core, bounds, color);
                Some(NestedFrame {
                    children: core.children.clone(),
                    bounds,
                    origin: (wx, wy - frame.scroll_y),
                    clip: core.flags.contains(ElementFlags::CLIP),
                    scrollbar: scrollbar_thumb(frame, bounds, core.transparency, ctx.now_ms),
                })
            }
            ElementKind::Button(button) => {
                button.paint(core, &target, ctx);
                None
            }
            ElementKind::Label(label) => {
                label.paint(&target, ctx);
                None
            }
            ElementKind::TextInput(input) => {
                input.paint(core, &target, ctx);
                None
            }
            ElementKind::Checkbox(checkbox) => {
                checkbox.paint(&target, ctx);
                None
            }
            ElementKind::Slider(slider) => {
                slider.paint(&target, ctx);
                None
            }
            ElementKind::Dropdown(dropdown) => {
                dropdown.paint(core, &target, ctx);
                None
            }
            ElementKind::Canvas(canvas) => {
                let alpha = (255.0 * core.transparency) as u8;
                ctx.passes
                    .push(BlitPass::new(canvas.texture(), bounds, alpha));
                None
            }
        };

        let Some(nested) = nested else {
            continue;
        };
        if nested.clip {
            ctx.passes.push(ClipPass::Push(nested.bounds));
        }
        paint_level(
            tree,
            &nested.children,
            nested.origin,
            focused,
            ctx,
            hover_changes,
        );
        if nested.clip {
            ctx.passes.push(ClipPass::Pop);
        }
        if let Some((thumb, color)) = nested.scrollbar {
            ctx.fill(thumb, color);
        }
    }
}

/// Thumb rect and color while the fade after the last scroll is running and the content
/// overflows the frame.
fn scrollbar_thumb(
    frame: &FrameState,
    bounds: Rect,
    transparency: f32,
    now_ms: u64,
) -> Option<(Rect, Color)> {
    if frame.content_height <= bounds.h {
        return None;
    }
    let fade = frame.scrollbar_fade(now_ms)?;
    let content = frame.content_height as f32;
    let alpha = (SCROLLBAR_ALPHA * fade * transparency) as u8;
    let thumb_h = (bounds.h as f32 / content * bounds.h as f32) as i32;
    let thumb_y = bounds.y + (frame.scroll_y as f32 / content * bounds.h as f32) as i32;
    let thumb = Rect::new(
        bounds.x + bounds.w - frame.scrollbar_width - SCROLLBAR_MARGIN,
        thumb_y,
        frame.scrollbar_width,
        thumb_h,
    );
    Some((thumb, SCROLLBAR_COLOR.with_alpha(alpha)))
}
