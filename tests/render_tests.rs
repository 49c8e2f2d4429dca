use countup::config::{GameConfig, Variant};
use countup::kernel::event::InputEvent;
use countup::kernel::reactor::Reactor;
use countup::kernel::state::GameView;
use countup::kernel::time::ticks_for;
use countup::ui::input::{map_event, UiAction};
use countup::ui::layout::{Hit, ScreenLayout};
use countup::ui::theme::palette;
use countup::ui::{draw, progress_glyph, prompt_text};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tokio::sync::mpsc;

const WIDTH: u16 = 80;
const HEIGHT: u16 = 40;

fn reactor(variant: Variant) -> Reactor {
    let (_tx, rx) = mpsc::channel(16);
    let config = GameConfig {
        variant,
        ..GameConfig::default()
    };
    let mut r = Reactor::new(rx, &config);
    r.run_idle(1);
    r
}

fn advance(r: &mut Reactor) {
    for i in 0..r.state().level() {
        r.tick_step(vec![InputEvent::tap("test", i).into()]);
    }
    r.run_idle(ticks_for(GameConfig::default().timings.celebration_ms));
}

fn render(view: &GameView) -> (String, ScreenLayout) {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).expect("test terminal");
    let mut layout = ScreenLayout::default();
    terminal
        .draw(|frame| {
            layout = draw(frame, view, &[], &palette(false));
        })
        .expect("draw");

    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    (text, layout)
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn click(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn test_renders_exactly_level_targets() {
    let mut r = reactor(Variant::Full);
    for level in 1..=10 {
        let view = r.view();
        assert_eq!(view.level, level);

        let (_, layout) = render(&view);
        let tiles = layout.tiles(view.level);
        assert_eq!(tiles.len(), level, "Level {level} shows {level} targets");
        assert!(
            tiles.iter().all(|t| t.width > 0 && t.height > 0),
            "Every target at level {level} is visible on an {WIDTH}x{HEIGHT} screen"
        );
        for (i, a) in tiles.iter().enumerate() {
            for b in &tiles[i + 1..] {
                assert!(!a.intersects(*b), "Targets must not overlap");
            }
        }

        if level < 10 {
            advance(&mut r);
        }
    }
    println!("Target Count Passed");
}

#[test]
fn test_prompt_and_banner() {
    let mut r = reactor(Variant::Basic);
    advance(&mut r);
    advance(&mut r);
    let view = r.view();
    assert_eq!(prompt_text(&view), "Tap 3 circles!");
    let (screen, _) = render(&view);
    assert!(screen.contains("Tap 3 circles!"));
    assert!(screen.contains("Let's Count!"));
    assert!(screen.contains("Start Over"));

    for i in 0..3 {
        r.tick_step(vec![InputEvent::tap("test", i).into()]);
    }
    let view = r.view();
    assert_eq!(prompt_text(&view), "Great Job!");
    let (screen, _) = render(&view);
    assert!(screen.contains("Great Job!"));
    assert!(!screen.contains("Tap 3"));
}

#[test]
fn test_tapped_targets_marked() {
    let mut r = reactor(Variant::Full);
    advance(&mut r);
    advance(&mut r);
    r.tick_step(vec![InputEvent::tap("test", 1).into()]);

    let (screen, _) = render(&r.view());
    assert_eq!(screen.matches('✔').count(), 1, "One tapped target");
    assert!(screen.contains("[1]") && screen.contains("[3]"));
    assert!(!screen.contains("[2]"), "Tapped target shows a check instead of its key");
}

#[test]
fn test_progress_glyphs() {
    assert_eq!(progress_glyph(1, 3), "●");
    assert_eq!(progress_glyph(3, 3), "◉");
    assert_eq!(progress_glyph(4, 3), "○");

    let mut r = reactor(Variant::Basic);
    advance(&mut r);
    advance(&mut r);
    let (screen, _) = render(&r.view());
    assert_eq!(screen.matches('●').count(), 2);
    assert_eq!(screen.matches('◉').count(), 1);
    assert_eq!(screen.matches('○').count(), 2);
}

#[test]
fn test_numeral_shows_level() {
    let mut r = reactor(Variant::Basic);
    advance(&mut r);
    advance(&mut r);
    advance(&mut r);
    let (screen, layout) = render(&r.view());
    let numeral_row: String = screen
        .lines()
        .skip(layout.numeral.y as usize)
        .take(layout.numeral.height as usize)
        .collect();
    assert!(numeral_row.contains('4'));
}

#[test]
fn test_click_hits_drawn_targets() {
    let mut r = reactor(Variant::Basic);
    advance(&mut r);
    let view = r.view();
    let (_, layout) = render(&view);

    for (index, tile) in layout.tiles(view.level).iter().enumerate() {
        let center = (tile.x + tile.width / 2, tile.y + tile.height / 2);
        assert_eq!(layout.hit_test(view.level, center.0, center.1), Some(Hit::Tile(index)));
        assert_eq!(
            map_event(&click(center.0, center.1), &view, &layout),
            Some(UiAction::Input(InputEvent::tap("mouse", index)))
        );
    }

    let so = layout.start_over;
    assert_eq!(layout.hit_test(view.level, so.x + 1, so.y + 1), Some(Hit::StartOver));
    assert_eq!(
        map_event(&click(so.x + 1, so.y + 1), &view, &layout),
        Some(UiAction::Input(InputEvent::reset("mouse")))
    );
    assert_eq!(map_event(&click(0, 0), &view, &layout), None, "Title is not tappable");
}

#[test]
fn test_keys_map_to_visible_targets_only() {
    let mut r = reactor(Variant::Basic);
    advance(&mut r);
    advance(&mut r);
    let view = r.view();
    let layout = ScreenLayout::compute(Rect::new(0, 0, WIDTH, HEIGHT), view.max_level);

    assert_eq!(
        map_event(&key(KeyCode::Char('1')), &view, &layout),
        Some(UiAction::Input(InputEvent::tap("keyboard", 0)))
    );
    assert_eq!(
        map_event(&key(KeyCode::Char('3')), &view, &layout),
        Some(UiAction::Input(InputEvent::tap("keyboard", 2)))
    );
    assert_eq!(map_event(&key(KeyCode::Char('4')), &view, &layout), None, "Only 3 targets");
    assert_eq!(map_event(&key(KeyCode::Char('0')), &view, &layout), None);
    assert_eq!(
        map_event(&key(KeyCode::Char('r')), &view, &layout),
        Some(UiAction::Input(InputEvent::reset("keyboard")))
    );
    assert_eq!(map_event(&key(KeyCode::Char('q')), &view, &layout), Some(UiAction::Quit));
    assert_eq!(map_event(&key(KeyCode::Esc), &view, &layout), Some(UiAction::Quit));
    assert_eq!(
        map_event(
            &Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            &view,
            &layout
        ),
        Some(UiAction::Quit)
    );
}

#[test]
fn test_space_taps_next_untapped() {
    let mut r = reactor(Variant::Basic);
    advance(&mut r);
    advance(&mut r);
    r.tick_step(vec![InputEvent::tap("test", 0).into()]);
    let view = r.view();
    let layout = ScreenLayout::compute(Rect::new(0, 0, WIDTH, HEIGHT), view.max_level);

    assert_eq!(
        map_event(&key(KeyCode::Char(' ')), &view, &layout),
        Some(UiAction::Input(InputEvent::tap("keyboard", 1)))
    );
}

#[test]
fn test_high_contrast_renders() {
    let r = reactor(Variant::Full);
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).expect("test terminal");
    terminal
        .draw(|frame| {
            draw(frame, &r.view(), &[], &palette(true));
        })
        .expect("draw");
    assert!(palette(true).high_contrast);
}

#[test]
fn test_tiny_terminal_does_not_panic() {
    let r = reactor(Variant::Full);
    let mut terminal = Terminal::new(TestBackend::new(12, 6)).expect("test terminal");
    terminal
        .draw(|frame| {
            draw(frame, &r.view(), &[], &palette(false));
        })
        .expect("draw");
}
