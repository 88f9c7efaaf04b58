//! UI rendering for the terminal interface.
//!
//! Pure presentation: everything here reads controller/catalog/sampler
//! state and draws widgets; no state is mutated.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph,
        canvas::{Canvas, Line as CanvasLine, Rectangle},
    },
};

use crate::app::App;
use crate::config::Settings;
use crate::library::display_from_fields;
use crate::player::{Player, RepeatMode, Transport};
use crate::viz::{Shape, VizSampler, render};

const ACCENT: Color = Color::Rgb(0, 234, 255);

/// Virtual canvas space the render modes draw into; the widget scales it to
/// the actual pane.
const VIZ_W: f64 = 200.0;
const VIZ_H: f64 = 100.0;

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn draw(f: &mut Frame, app: &App, player: &Player, viz: &VizSampler, settings: &Settings) {
    if app.compact {
        draw_compact(f, app, player, viz);
        return;
    }

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(8),    // list + side panel
            Constraint::Length(3), // progress
            Constraint::Length(1), // status
            Constraint::Length(1), // controls / filter
        ])
        .split(f.area());

    draw_header(f, outer[0], &settings.ui.header_text);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(outer[1]);

    draw_track_list(f, middle[0], app, player, settings);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if app.show_viz {
            [Constraint::Length(9), Constraint::Min(4)]
        } else {
            [Constraint::Min(4), Constraint::Length(0)]
        })
        .split(middle[1]);

    draw_now_playing(f, side[0], app, player);
    if app.show_viz {
        draw_visualizer(f, side[1], viz);
    }

    draw_progress(f, outer[2], player);
    draw_status(f, outer[3], app, player, viz);

    if app.filter_mode {
        draw_filter_line(f, outer[4], app);
    } else {
        draw_controls(f, outer[4], settings.controls.scrub_seconds);
    }
}

/// Mini player layout: now playing, progress and the visualizer only.
fn draw_compact(f: &mut Frame, app: &App, player: &Player, viz: &VizSampler) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_now_playing(f, rows[0], app, player);
    draw_progress(f, rows[1], player);
    if app.show_viz {
        draw_visualizer(f, rows[2], viz);
    }
    draw_status(f, rows[3], app, player, viz);
}

fn draw_header(f: &mut Frame, area: Rect, text: &str) {
    let header = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_track_list(f: &mut Frame, area: Rect, app: &App, player: &Player, settings: &Settings) {
    let visible = app.catalog.visible();

    let items: Vec<ListItem> = visible
        .iter()
        .filter_map(|&i| app.catalog.get(i).map(|t| (i, t)))
        .map(|(i, track)| {
            let row = display_from_fields(
                track,
                &settings.library.display_fields,
                &settings.library.display_separator,
            );

            let is_active = player.current() == Some(i);
            let marker = if is_active { "▶ " } else { "  " };
            let style = if is_active {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!("{marker}{row}")).style(style)
        })
        .collect();

    let count = visible.len();
    let title = match app.current_dir.as_deref() {
        Some(dir) => format!(" {dir} ({count}) "),
        None => format!(" library ({count}) "),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(visible.iter().position(|&i| i == app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_now_playing(f: &mut Frame, area: Rect, app: &App, player: &Player) {
    let mut lines: Vec<Line> = Vec::new();

    match player.current().and_then(|i| app.catalog.get(i)) {
        Some(track) => {
            lines.push(Line::from(Span::styled(
                track.title().to_string(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("artist  {}", track.artist())));
            lines.push(Line::from(format!("album   {}", track.album())));
            if !track.genre().is_empty() {
                lines.push(Line::from(format!("genre   {}", track.genre())));
            }
            if !track.year().is_empty() {
                lines.push(Line::from(format!("year    {}", track.year())));
            }
            if track.cover().is_some() {
                lines.push(Line::from("cover   embedded".dim()));
            }
        }
        None => lines.push(Line::from("nothing playing".dim())),
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" now playing ")
            .padding(Padding::horizontal(1)),
    );
    f.render_widget(panel, area);
}

fn draw_progress(f: &mut Frame, area: Rect, player: &Player) {
    let position = player.position();
    let (ratio, label) = match player.duration() {
        Some(total) if !total.is_zero() => {
            let ratio = (position.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0);
            (
                ratio,
                format!("{} / {}", format_mmss(position), format_mmss(total)),
            )
        }
        _ => (0.0, format!("{} / --:--", format_mmss(position))),
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(ACCENT))
        .ratio(ratio)
        .label(label);
    f.render_widget(gauge, area);
}

fn draw_visualizer(f: &mut Frame, area: Rect, viz: &VizSampler) {
    let shapes = render(viz.mode(), viz.levels(), VIZ_W, VIZ_H);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" viz: {} ", viz.mode().label())),
        )
        .x_bounds([0.0, VIZ_W])
        .y_bounds([0.0, VIZ_H])
        .paint(move |ctx| {
            for shape in &shapes {
                paint_shape(ctx, shape);
            }
        });
    f.render_widget(canvas, area);
}

fn paint_shape(ctx: &mut ratatui::widgets::canvas::Context, shape: &Shape) {
    match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            color,
        } => {
            ctx.draw(&Rectangle {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
                color: *color,
            });
        }
        Shape::Segment {
            x1,
            y1,
            x2,
            y2,
            color,
        } => {
            ctx.draw(&CanvasLine {
                x1: *x1,
                y1: *y1,
                x2: *x2,
                y2: *y2,
                color: *color,
            });
        }
        Shape::Polyline { points, color } => {
            for pair in points.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].0,
                    y1: pair[0].1,
                    x2: pair[1].0,
                    y2: pair[1].1,
                    color: *color,
                });
            }
        }
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App, player: &Player, viz: &VizSampler) {
    let transport = match player.transport() {
        Transport::Stopped => "stopped",
        Transport::Playing => "playing",
        Transport::Paused => "paused",
    };
    let repeat = match player.repeat() {
        RepeatMode::None => "off",
        RepeatMode::All => "all",
        RepeatMode::One => "one",
    };

    let mut spans = vec![Span::raw(format!(
        "[{transport}] shuffle {} | repeat {repeat} | vol {:3.0}% | viz {}",
        if player.shuffle() { "on" } else { "off" },
        player.volume() * 100.0,
        viz.mode().label(),
    ))];

    if let Some(err) = player.last_error() {
        spans.push(Span::styled(
            format!("  error: {err}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    } else if let Some(msg) = app.status_message.as_deref() {
        spans.push(Span::styled(
            format!("  {msg}"),
            Style::default().fg(ACCENT),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_filter_line(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled("filter: ", Style::default().fg(ACCENT)),
        Span::raw(app.catalog.filter().to_string()),
        Span::styled("█", Style::default().fg(ACCENT)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_controls(f: &mut Frame, area: Rect, scrub_seconds: u64) {
    let text = format!(
        "[space] play/pause [x] stop [n/p] next/prev [H/L] scrub -/+{scrub_seconds}s \
         [s] shuffle [r] repeat [v] viz [m] mini [/] filter [w] save [q] quit"
    );
    f.render_widget(Paragraph::new(text.dim()), area);
}
