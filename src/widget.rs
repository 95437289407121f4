//! Text rendering of the rota card.

use crate::rota::RotaDay;

pub const DEFAULT_WIDTH: usize = 32;
const INVALID_PARAMETER_MARK: &str = "⚠️";
const UPDATE_MARK: &str = "⬇️";

#[derive(Debug, Clone)]
pub struct WidgetView {
    pub day: RotaDay,
    /// Where tapping the card leads (the dialer).
    pub tap_url: Option<String>,
    pub invalid_parameter: bool,
    pub update_available: bool,
}

impl WidgetView {
    pub fn new(day: RotaDay) -> Self {
        Self { day, tap_url: None, invalid_parameter: false, update_available: false }
    }

    pub fn render(&self, width: usize) -> String {
        let mut lines = vec![center(&self.day.date, width), String::new()];

        for entry in &self.day.entries {
            lines.push(center(&entry.role, width));
            lines.push(center(&entry.name, width));
            lines.push(String::new());
        }

        if let Some(marker) = self.marker_line(width) {
            lines.push(marker);
        }
        if let Some(url) = &self.tap_url {
            lines.push(format!("Open: {}", url));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Warning mark on the left, update mark on the right.
    fn marker_line(&self, width: usize) -> Option<String> {
        let left = if self.invalid_parameter {
            INVALID_PARAMETER_MARK
        } else {
            ""
        };
        let right = if self.update_available {
            UPDATE_MARK
        } else {
            ""
        };
        if left.is_empty() && right.is_empty() {
            return None;
        }
        let used = display_width(left) + display_width(right);
        let gap = width.saturating_sub(used).max(1);
        Some(format!("{}{}{}", left, " ".repeat(gap), right).trim_end().to_string())
    }
}

// Emoji with variation selectors count as one column here.
fn display_width(text: &str) -> usize {
    text.chars().filter(|c| !matches!(c, '\u{fe00}'..='\u{fe0f}')).count()
}

fn center(text: &str, width: usize) -> String {
    let len = display_width(text);
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}
