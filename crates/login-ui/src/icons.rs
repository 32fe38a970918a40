//! Vector icons built from scene primitives, drawn on a 24×24 grid scaled to
//! the icon's layout rect.

use login_core::*;
use std::f32::consts::FRAC_PI_4;

/// Icon view; size it with `Modifier::size`. An empty `description` marks
/// the icon decorative and leaves it out of the semantics tree.
pub fn Icon(
    icon: IconKind,
    description: impl Into<String>,
    tint: Color,
    modifier: Modifier,
) -> View {
    let description = description.into();
    let v = View::new(0, ViewKind::Icon { icon, tint }).modifier(modifier);
    if description.is_empty() {
        v
    } else {
        v.semantics(Semantics::new(Role::Image).label(description))
    }
}

struct Grid {
    origin: Vec2,
    unit: f32,
}

impl Grid {
    fn new(rect: Rect) -> Self {
        let side = rect.w.min(rect.h);
        Self {
            origin: Vec2 {
                x: rect.x + (rect.w - side) * 0.5,
                y: rect.y + (rect.h - side) * 0.5,
            },
            unit: side / 24.0,
        }
    }

    /// Rect centered on grid point (cx, cy).
    fn centered(&self, cx: f32, cy: f32, w: f32, h: f32) -> Rect {
        Rect {
            x: self.origin.x + (cx - w * 0.5) * self.unit,
            y: self.origin.y + (cy - h * 0.5) * self.unit,
            w: w * self.unit,
            h: h * self.unit,
        }
    }
}

pub fn paint_icon(scene: &mut Scene, icon: IconKind, rect: Rect, tint: Color) {
    let g = Grid::new(rect);
    match icon {
        IconKind::Visibility => eye(scene, &g, tint),
        IconKind::VisibilityOff => {
            eye(scene, &g, tint);
            scene.nodes.push(SceneNode::Bar {
                rect: g.centered(12.0, 12.0, 26.0, 2.0),
                color: tint,
                angle: FRAC_PI_4,
            });
        }
        IconKind::Facebook => {
            let disc = g.centered(12.0, 12.0, 20.0, 20.0);
            scene.nodes.push(SceneNode::Rect {
                rect: disc,
                color: tint,
                radius: disc.w * 0.5,
            });
            let size = 15.0 * g.unit;
            scene.nodes.push(SceneNode::Text {
                rect: g.centered(13.0, 13.0, 7.0, 15.0 * 1.3),
                text: "f".into(),
                color: Color::WHITE,
                size,
                weight: FontWeight::BOLD,
            });
        }
    }
}

fn eye(scene: &mut Scene, g: &Grid, tint: Color) {
    let outline = g.centered(12.0, 12.0, 22.0, 14.0);
    scene.nodes.push(SceneNode::Border {
        rect: outline,
        color: tint,
        width: 2.0 * g.unit,
        radius: outline.h * 0.5,
    });
    let pupil = g.centered(12.0, 12.0, 8.0, 8.0);
    scene.nodes.push(SceneNode::Rect {
        rect: pupil,
        color: tint,
        radius: pupil.w * 0.5,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f32) -> Rect {
        Rect {
            x: 10.0,
            y: 20.0,
            w: side,
            h: side,
        }
    }

    #[test]
    fn visibility_off_adds_slash() {
        let mut on = Scene::default();
        let mut off = Scene::default();
        paint_icon(&mut on, IconKind::Visibility, square(24.0), Color::BLACK);
        paint_icon(&mut off, IconKind::VisibilityOff, square(24.0), Color::BLACK);
        assert_eq!(off.nodes.len(), on.nodes.len() + 1);
        assert!(matches!(off.nodes.last(), Some(SceneNode::Bar { .. })));
    }

    #[test]
    fn icon_scales_with_rect_and_stays_inside() {
        let mut s = Scene::default();
        let r = square(48.0);
        paint_icon(&mut s, IconKind::Visibility, r, Color::WHITE);
        for n in &s.nodes {
            if let SceneNode::Border { rect, .. } | SceneNode::Rect { rect, .. } = n {
                assert!(rect.x >= r.x && rect.x + rect.w <= r.x + r.w);
                assert!(rect.y >= r.y && rect.y + rect.h <= r.y + r.h);
            }
        }
        let Some(SceneNode::Border { width, .. }) = s.nodes.first() else {
            panic!("eye outline missing");
        };
        assert_eq!(*width, 4.0);
    }
}
