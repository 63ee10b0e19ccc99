use crate::store::ClusterStore;
use egui::{Color32, Pos2, Sense, Shape, Stroke, Vec2};
use std::f32::consts::TAU;

/// Maps a template color tag such as `orange-500` to a fill. Only the hue
/// part is read; unknown hues are gray.
pub fn tag_color(tag: &str) -> Color32 {
    let hue = tag.split('-').next().unwrap_or("").to_ascii_lowercase();
    match hue.as_str() {
        "blue" => Color32::from_rgb(59, 130, 246),
        "green" => Color32::from_rgb(34, 197, 94),
        "orange" => Color32::from_rgb(249, 115, 22),
        "purple" => Color32::from_rgb(168, 85, 247),
        "pink" => Color32::from_rgb(236, 72, 153),
        "red" => Color32::from_rgb(239, 68, 68),
        "yellow" => Color32::from_rgb(234, 179, 8),
        "teal" => Color32::from_rgb(20, 184, 166),
        "indigo" => Color32::from_rgb(99, 102, 241),
        _ => Color32::from_rgb(107, 114, 128),
    }
}

pub fn draw_donut(ui: &mut egui::Ui, store: &ClusterStore) {
    let available = ui.available_size();
    let size = available.x.min(available.y).min(300.0);
    let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
    let rect = response.rect;
    let center = rect.center();
    let outer_r = size * 0.45;
    let inner_r = size * 0.25;

    let slices: Vec<(&str, usize, Color32)> = store
        .clusters()
        .iter()
        .map(|c| (c.name.as_str(), store.active_count(c.id), tag_color(&c.color)))
        .filter(|(_, count, _)| *count > 0)
        .collect();
    let total: usize = slices.iter().map(|(_, count, _)| count).sum();
    if total == 0 {
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            "Inbox zero",
            egui::FontId::proportional(14.0),
            Color32::GRAY,
        );
        return;
    }

    let mouse_pos = response.hover_pos();
    let mut start_angle: f32 = -TAU / 4.0;
    let mut hovered: Option<(&str, usize)> = None;

    for (name, count, color) in &slices {
        let sweep = *count as f32 / total as f32 * TAU;

        let segments = (sweep / 0.05).max(2.0) as usize;
        let mut points = Vec::with_capacity(segments * 2 + 2);
        for j in 0..=segments {
            let angle = start_angle + sweep * (j as f32 / segments as f32);
            points.push(Pos2::new(
                center.x + outer_r * angle.cos(),
                center.y + outer_r * angle.sin(),
            ));
        }
        for j in (0..=segments).rev() {
            let angle = start_angle + sweep * (j as f32 / segments as f32);
            points.push(Pos2::new(
                center.x + inner_r * angle.cos(),
                center.y + inner_r * angle.sin(),
            ));
        }

        let is_hovered = mouse_pos.is_some_and(|mp| {
            let offset = mp - center;
            let dist = offset.length();
            if dist < inner_r || dist > outer_r {
                return false;
            }
            let mut angle = offset.y.atan2(offset.x);
            if angle < start_angle {
                angle += TAU;
            }
            angle >= start_angle && angle <= start_angle + sweep
        });
        if is_hovered {
            hovered = Some((*name, *count));
        }

        let fill = if is_hovered {
            Color32::from_rgb(
                color.r().saturating_add(40),
                color.g().saturating_add(40),
                color.b().saturating_add(40),
            )
        } else {
            *color
        };

        // Single-slice donuts are a full ring; skip the seam stroke.
        let stroke = if slices.len() > 1 {
            Stroke::new(1.0, Color32::from_gray(30))
        } else {
            Stroke::NONE
        };
        painter.add(Shape::convex_polygon(points, fill, stroke));

        start_angle += sweep;
    }

    if let Some((name, count)) = hovered {
        painter.text(
            center + Vec2::new(0.0, -8.0),
            egui::Align2::CENTER_CENTER,
            name,
            egui::FontId::proportional(11.0),
            Color32::WHITE,
        );
        painter.text(
            center + Vec2::new(0.0, 8.0),
            egui::Align2::CENTER_CENTER,
            format!("{count} emails"),
            egui::FontId::proportional(11.0),
            Color32::LIGHT_GRAY,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_map_to_distinct_colors() {
        assert_ne!(tag_color("blue-500"), tag_color("orange-500"));
        assert_eq!(tag_color("Blue-300"), tag_color("blue-500"));
    }

    #[test]
    fn unknown_tag_is_gray() {
        assert_eq!(tag_color("chartreuse-500"), tag_color(""));
    }
}
