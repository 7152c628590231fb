use ratatui::{prelude::*, widgets::*};

use crate::constants::SKELETON_ROWS;
use crate::messages::render::RowView;
use crate::models::ResourceKind;

/// Renders the resource tabs, marking the ones with work in flight
pub fn render_tabs(active: ResourceKind, busy: &[ResourceKind]) -> Tabs<'static> {
    let titles: Vec<Line> = ResourceKind::ALL
        .iter()
        .map(|kind| {
            let marker = if busy.contains(kind) { " *" } else { "" };
            Line::from(format!(" {}:{}{} ", kind.index() + 1, kind.title(), marker))
        })
        .collect();

    Tabs::new(titles)
        .select(active.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
        .divider("|")
}

/// Placeholder rows drawn instead of the list while loading
pub fn skeleton_rows(width: u16) -> Vec<ListItem<'static>> {
    let bar = "░".repeat(width.saturating_sub(4).max(1) as usize);
    let short = "░".repeat((width / 2).max(1) as usize);
    (0..SKELETON_ROWS)
        .map(|_| {
            ListItem::new(vec![Line::from(bar.clone()), Line::from(short.clone())])
                .style(Style::default().fg(Color::DarkGray))
        })
        .collect()
}

/// One list row; completed todos are dimmed and struck through
pub fn row_item(row: &RowView) -> ListItem<'_> {
    let mut title = Vec::new();
    if let Some(done) = row.flag {
        title.push(Span::styled(
            if done { "[x] " } else { "[ ] " },
            Style::default().fg(if done { Color::Green } else { Color::Yellow }),
        ));
    }
    title.push(Span::raw(row.title.as_str()).bold());

    let mut lines = vec![Line::from(title)];
    if !row.detail.is_empty() {
        lines.push(Line::from(Span::styled(
            row.detail.as_str(),
            Style::default().fg(Color::Gray),
        )));
    }

    let item = ListItem::new(lines);
    if row.flag == Some(true) {
        item.style(
            Style::default()
                .add_modifier(Modifier::DIM)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        item
    }
}

/// Centered sub-rectangle taking the given share of `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_has_fixed_row_count() {
        assert_eq!(skeleton_rows(40).len(), SKELETON_ROWS);
        assert_eq!(skeleton_rows(0).len(), SKELETON_ROWS);
    }

    #[test]
    fn test_centered_rect_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 20, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 10);
        assert!(popup.x >= 20 && popup.y >= 20);
    }
}
