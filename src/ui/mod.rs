//! Terminal renderer for the counting screen.
//!
//! Draws a `GameView` snapshot; never mutates game state. Input is mapped
//! back to kernel events in [`input`].

pub mod input;
pub mod layout;
pub mod theme;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
    Frame,
};

use crate::kernel::state::GameView;
use crate::outputs::confetti::Particle;
use layout::ScreenLayout;
use theme::{glyph_for, key_label, Palette};

/// Render one frame. Returns the geometry used, for hit testing.
pub fn draw(frame: &mut Frame, view: &GameView, particles: &[Particle], palette: &Palette) -> ScreenLayout {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(palette.bg)), area);

    let layout = ScreenLayout::compute(area, view.max_level);

    draw_title(frame, layout.title, palette);
    draw_numeral(frame, layout.numeral, view, palette);
    draw_prompt(frame, layout.prompt, view, palette);
    draw_tiles(frame, &layout, view, palette);
    draw_progress(frame, layout.progress, view, palette);
    draw_start_over(frame, layout.start_over, palette);
    draw_footer(frame, layout.footer, palette);
    draw_confetti(frame.buffer_mut(), area, particles, palette);

    layout
}

fn draw_title(frame: &mut Frame, area: Rect, palette: &Palette) {
    let title = Paragraph::new(Line::from(Span::styled("Let's Count!", palette.title_style())))
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::top(1)));
    frame.render_widget(title, area);
}

fn draw_numeral(frame: &mut Frame, area: Rect, view: &GameView, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.numeral))
        .style(Style::default().bg(palette.numeral_bg));

    let numeral = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            view.level.to_string(),
            Style::default().fg(palette.numeral).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(numeral, area);
}

pub fn prompt_text(view: &GameView) -> String {
    if view.celebrating {
        "Great Job!".to_string()
    } else {
        format!("Tap {}!", view.theme.counted(view.level))
    }
}

fn draw_prompt(frame: &mut Frame, area: Rect, view: &GameView, palette: &Palette) {
    let style = if view.celebrating {
        Style::default()
            .fg(palette.banner)
            .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK)
    } else {
        Style::default().fg(palette.prompt).bg(palette.panel).add_modifier(Modifier::BOLD)
    };
    let prompt = Paragraph::new(Line::from(Span::styled(prompt_text(view), style)))
        .alignment(Alignment::Center);
    frame.render_widget(prompt, area);
}

fn draw_tiles(frame: &mut Frame, layout: &ScreenLayout, view: &GameView, palette: &Palette) {
    let glyph = glyph_for(view.theme.icon);
    let icon_style = Style::default().fg(palette.icon_color(view.theme.color));

    for (index, rect) in layout.tiles(view.level).into_iter().enumerate() {
        if rect.width == 0 || rect.height == 0 {
            continue;
        }
        let tapped = view.is_tapped(index);
        let (bg, border) = if tapped {
            (palette.tile_tapped, palette.dot_done)
        } else {
            (palette.tile, palette.muted)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if tapped { BorderType::Double } else { BorderType::Rounded })
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(bg));

        let marker = if tapped {
            Span::styled("✔", Style::default().fg(palette.dot_done).add_modifier(Modifier::BOLD))
        } else {
            let label = key_label(index).map(|k| format!("[{k}]")).unwrap_or_default();
            Span::styled(label, Style::default().fg(palette.muted))
        };

        let tile = Paragraph::new(vec![
            Line::from(Span::styled(glyph, icon_style)),
            Line::from(""),
            Line::from(marker),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(tile, rect);
    }
}

/// Progress glyph for level `x`: done, current or pending.
pub fn progress_glyph(x: usize, current: usize) -> &'static str {
    match x.cmp(&current) {
        std::cmp::Ordering::Less => "●",
        std::cmp::Ordering::Equal => "◉",
        std::cmp::Ordering::Greater => "○",
    }
}

fn draw_progress(frame: &mut Frame, area: Rect, view: &GameView, palette: &Palette) {
    let mut spans = Vec::with_capacity(view.max_level * 2);
    for x in 1..=view.max_level {
        let style = match x.cmp(&view.level) {
            std::cmp::Ordering::Less => Style::default().fg(palette.dot_done),
            std::cmp::Ordering::Equal => Style::default()
                .fg(palette.dot_current)
                .add_modifier(Modifier::BOLD),
            std::cmp::Ordering::Greater => Style::default().fg(palette.dot_pending),
        };
        if x > 1 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(progress_glyph(x, view.level), style));
    }
    let progress = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(progress, area);
}

fn draw_start_over(frame: &mut Frame, area: Rect, palette: &Palette) {
    let button = Paragraph::new(Line::from(Span::styled(
        "Start Over (r)",
        Style::default().fg(palette.button).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.button)),
    );
    frame.render_widget(button, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, palette: &Palette) {
    let footer = Paragraph::new(Line::from(Span::styled(
        "1-0 tap · space next · r start over · q quit",
        Style::default().fg(palette.muted),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

fn draw_confetti(buf: &mut Buffer, area: Rect, particles: &[Particle], palette: &Palette) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    for p in particles {
        if !(0.0..1.0).contains(&p.x) || !(0.0..1.0).contains(&p.y) {
            continue;
        }
        let x = area.x + (p.x * f32::from(area.width)) as u16;
        let y = area.y + (p.y * f32::from(area.height)) as u16;
        if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
            cell.set_char(p.glyph).set_fg(palette.confetti_color(p.color));
        }
    }
}
