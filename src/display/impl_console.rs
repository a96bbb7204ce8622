use crate::detection::format::ConfidenceTier;
use crate::display::interface::ViewDisplay;
use crate::leaf_identifier::core::NotificationLevel;
use crate::leaf_identifier::render::{Panel, View};
use std::error::Error;
use std::io::Write;

const WIDTH: usize = 44;

/// Prints the view as a box of text.
pub struct ViewDisplayConsole<W: Write> {
    out: W,
}

impl ViewDisplayConsole<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ViewDisplayConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> std::io::Result<()> {
        let text: String = text.chars().take(WIDTH).collect();
        let padding = WIDTH - text.chars().count();
        writeln!(self.out, "│ {}{} │", text, " ".repeat(padding))
    }

    fn border(&mut self, left: char, right: char) -> std::io::Result<()> {
        writeln!(self.out, "{}{}{}", left, "─".repeat(WIDTH + 2), right)
    }
}

fn tier_marker(tier: ConfidenceTier) -> &'static str {
    match tier {
        ConfidenceTier::High => "+",
        ConfidenceTier::Medium => "~",
        ConfidenceTier::Low => "-",
    }
}

impl<W: Write> ViewDisplay for ViewDisplayConsole<W> {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.border('┌', '┐')?;

        match &view.panel {
            Panel::Empty { title, hint } => {
                self.line(title)?;
                self.line(hint)?;
            }
            Panel::Loading => {
                self.line("Analyzing plant...")?;
            }
            Panel::Error { title, message } => {
                self.line(title)?;
                self.line(message)?;
            }
            Panel::Results { rows, toggle } => {
                self.line("Plant Identification Result")?;
                self.border('├', '┤')?;
                for row in rows {
                    let label = if row.best_match {
                        format!("✓ {} (Best Match)", row.name)
                    } else {
                        format!("  {}", row.name)
                    };
                    let percent = format!("{} {:>3}%", tier_marker(row.tier), row.percent);
                    let gap = WIDTH.saturating_sub(label.chars().count() + percent.len()).max(1);
                    self.line(&format!("{}{}{}", label, " ".repeat(gap), percent))?;
                }
                if let Some(toggle) = toggle {
                    self.line(&format!("  ({}: --all)", toggle))?;
                }
            }
            Panel::Details(details) => {
                self.line(&details.name)?;
                self.line(&format!("{}% Match", details.percent))?;
                self.border('├', '┤')?;
                let mut line = String::new();
                for word in details.description.split_whitespace() {
                    if !line.is_empty() && line.chars().count() + word.chars().count() + 1 > WIDTH {
                        self.line(&line)?;
                        line.clear();
                    }
                    if !line.is_empty() {
                        line.push(' ');
                    }
                    line.push_str(word);
                }
                if !line.is_empty() {
                    self.line(&line)?;
                }
                self.line(&details.search_url)?;
            }
        }

        if view.image_size.is_some() || view.recent_count > 0 {
            self.border('├', '┤')?;
        }
        if let Some(size) = view.image_size {
            self.line(&format!("Image: {}x{}", size.width, size.height))?;
        }
        if view.recent_count > 0 {
            self.line(&format!(
                "Recent images: {} (--recent 0..{})",
                view.recent_count,
                view.recent_count - 1
            ))?;
        }

        self.border('└', '┘')?;

        if let Some(notification) = &view.notification {
            let marker = match notification.level {
                NotificationLevel::Success => "✓",
                NotificationLevel::Error => "✗",
            };
            writeln!(
                self.out,
                "{} {}: {}",
                marker, notification.title, notification.description
            )?;
        }

        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf_identifier::render::ResultRow;

    #[test]
    fn test_render_results() {
        let view = View {
            panel: Panel::Results {
                rows: vec![
                    ResultRow {
                        index: 0,
                        name: "Aloe Vera".to_string(),
                        percent: 92,
                        tier: ConfidenceTier::High,
                        best_match: true,
                    },
                    ResultRow {
                        index: 1,
                        name: "Tulsi".to_string(),
                        percent: 5,
                        tier: ConfidenceTier::Low,
                        best_match: false,
                    },
                ],
                toggle: Some("Show 2 More".to_string()),
            },
            has_preview: true,
            image_size: None,
            recent_count: 1,
            can_clear: true,
            uploads_enabled: true,
            notification: None,
        };

        let mut display = ViewDisplayConsole::new(Vec::new());
        display.render(&view).unwrap();
        let out = String::from_utf8(display.into_inner()).unwrap();

        assert!(out.contains("✓ Aloe Vera (Best Match)"));
        assert!(out.contains("+  92%"));
        assert!(out.contains("Tulsi"));
        assert!(out.contains("Show 2 More"));
        assert!(out.contains("Recent images: 1 (--recent 0..0)"));
        assert!(out.lines().all(|line| line.chars().count() == WIDTH + 4));
    }
}
