pub mod display;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Points},
        Block, Borders, Paragraph, Widget, Wrap,
    },
};

use crate::app::{App, Focus};
use crate::timer::{EditField, TimerStatus};
use display::{format_clock, progress_fraction, ring_points, visible_tail};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const RING_RADIUS: f64 = 40.0;
const RING_STEPS: usize = 240;
const TASK_PLACEHOLDER: &str = "What are you working on?";

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let timer = &self.timer;
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let accent_style = Style::default().fg(Color::Green);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Min(5),    // progress ring
                Constraint::Length(1), // controls legend
                Constraint::Length(3), // task label
                Constraint::Length(1), // sessions
                Constraint::Length(2), // quote
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "Pomodoro Timer",
            bold_style.add_modifier(Modifier::UNDERLINED),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        // the ring is drawn in a square-ish box; terminal cells are about twice as tall as wide
        let ring_area = centered(chunks[1], chunks[1].height.saturating_mul(2), chunks[1].height);
        let arc = ring_points(
            progress_fraction(timer.remaining_secs(), timer.default_secs()),
            RING_RADIUS,
            RING_STEPS,
        );
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-50.0, 50.0])
            .y_bounds([-50.0, 50.0])
            .paint(|ctx| {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: RING_RADIUS,
                    color: Color::DarkGray,
                });
                ctx.layer();
                ctx.draw(&Points {
                    coords: &arc,
                    color: Color::Green,
                });
            })
            .render(ring_area, buf);

        let center = centered(ring_area, ring_area.width, 1);
        let clock = if timer.status() == TimerStatus::Editing {
            let field_style = |field: EditField| {
                if self.focus == Focus::Edit(field) {
                    bold_style.fg(Color::Black).bg(Color::Green)
                } else {
                    bold_style.fg(Color::Green)
                }
            };
            Line::from(vec![
                Span::styled(
                    format!("[{}]", timer.edit_buffer(EditField::Minutes)),
                    field_style(EditField::Minutes),
                ),
                Span::styled(":", bold_style),
                Span::styled(
                    format!("[{}]", timer.edit_buffer(EditField::Seconds)),
                    field_style(EditField::Seconds),
                ),
            ])
        } else {
            Line::from(Span::styled(format_clock(timer.remaining_secs()), bold_style))
        };
        Paragraph::new(clock)
            .alignment(Alignment::Center)
            .render(center, buf);

        let legend = match (self.focus, timer.is_running()) {
            (Focus::Edit(_), _) => "(enter) save   (esc) cancel   (tab) switch field",
            (Focus::TaskLabel, _) => "(enter) done",
            (Focus::Controls, true) => "(space) pause   (r)eset   (e)dit   (t)ask   (q)uit",
            (Focus::Controls, false) => "(space) start   (r)eset   (e)dit   (t)ask   (q)uit",
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let task_focused = self.focus == Focus::TaskLabel;
        let task_block = Block::default()
            .borders(Borders::ALL)
            .border_style(if task_focused { accent_style } else { dim_style })
            .title("Task");
        let inner_width = task_block.inner(chunks[3]).width as usize;
        let task_line = if timer.task_label().is_empty() && !task_focused {
            Line::from(Span::styled(TASK_PLACEHOLDER, dim_style))
        } else if task_focused {
            // leave a column for the cursor marker
            let shown = visible_tail(timer.task_label(), inner_width.saturating_sub(1));
            Line::from(vec![Span::raw(shown), Span::styled("▏", accent_style)])
        } else {
            Line::from(visible_tail(timer.task_label(), inner_width))
        };
        Paragraph::new(task_line)
            .block(task_block)
            .render(chunks[3], buf);

        Paragraph::new(Span::styled(
            format!("Sessions completed: {}", timer.sessions_completed()),
            bold_style.fg(Color::Gray),
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

        if let Some(quote) = &self.quote {
            Paragraph::new(Span::styled(quote.to_string(), italic_style))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(chunks[5], buf);
        }
    }
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
