use ratatui::layout::{Constraint, Layout, Rect};

/// Screen regions shared by update (hit testing) and view (drawing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub tabs: Rect,
    pub body: Rect,
    /// Primary and secondary button.
    pub buttons: [Rect; 2],
    pub status: Rect,
}

impl ScreenLayout {
    pub fn compute(area: Rect) -> Self {
        let [tabs, body, button_row, status] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);
        let [primary, _, secondary, _] = Layout::horizontal([
            Constraint::Length(22),
            Constraint::Length(2),
            Constraint::Length(22),
            Constraint::Min(0),
        ])
        .areas(button_row);
        Self {
            tabs,
            body,
            buttons: [primary, secondary],
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_stack_top_to_bottom() {
        let layout = ScreenLayout::compute(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.tabs, Rect::new(0, 0, 100, 2));
        assert_eq!(layout.body, Rect::new(0, 2, 100, 34));
        assert_eq!(layout.buttons[0], Rect::new(0, 36, 22, 3));
        assert_eq!(layout.buttons[1], Rect::new(24, 36, 22, 3));
        assert_eq!(layout.status, Rect::new(0, 39, 100, 1));
    }
}
