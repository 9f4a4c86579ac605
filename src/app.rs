use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::cursor;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};
use tracing::{info, warn};

use crate::buffer::{InputState, Segment};
use crate::console::{Console, ConsoleAction};
use crate::i18n::{
    KEY_HINT, KEY_LOCALE, KEY_NO_HISTORY, KEY_PLACEHOLDER, KEY_SHOW_HISTORY, KEY_SHOW_MESSAGES,
    Translator,
};
use crate::messages::{LogKind, LogLine};
use crate::popup::PopupMode;
use crate::theme::{self, Theme};

const BAR_HEIGHT: u16 = 3;
const LIST_ROWS: u16 = 10;
const MESSAGE_ROWS: u16 = 15;

type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

pub fn run_tui(console: &mut Console, translator: Arc<Translator>) -> Result<()> {
    let mut terminal = init_terminal()?;

    match run_loop(&mut terminal, console, &translator) {
        Ok(()) => restore_terminal(&mut terminal),
        Err(err) => {
            let _ = restore_terminal(&mut terminal);
            Err(err)
        }
    }
}

fn init_terminal() -> Result<TuiTerminal> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("failed to create terminal")
}

fn restore_terminal(terminal: &mut TuiTerminal) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
        cursor::Show
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")
}

fn run_loop(
    terminal: &mut TuiTerminal,
    console: &mut Console,
    translator: &Translator,
) -> Result<()> {
    let size = terminal.size().context("failed to read terminal size")?;
    console.on_resize(size.width);

    loop {
        console.poll_locale();
        terminal.draw(|frame| draw_ui(frame, console))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::F(4) {
                    switch_locale(console, translator);
                    continue;
                }
                if console.on_key(key) == ConsoleAction::Quit {
                    break;
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size().context("failed to read terminal size")?;
                on_mouse(console, Rect::new(0, 0, size.width, size.height), mouse);
            }
            Event::Resize(width, _) => console.on_resize(width),
            _ => {}
        }
    }

    Ok(())
}

fn switch_locale(console: &mut Console, translator: &Translator) {
    match translator.cycle_locale() {
        Ok(locale) => {
            info!(%locale, "locale switched from keyboard");
            console.poll_locale();
            console.print_message(KEY_LOCALE, Some(&locale));
        }
        Err(err) => {
            warn!("locale switch failed: {err:#}");
            console.print_error(format!("{err:#}"));
        }
    }
}

fn on_mouse(console: &mut Console, area: Rect, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let layout = layout(area, console);
            match hit_test(&layout, console, mouse.column, mouse.row) {
                Hit::HistoryButton => console.toggle_history(),
                Hit::MessagesButton => console.toggle_messages(),
                Hit::Chip(index) => console.activate_chip(index),
                Hit::Input => console.focus_input(),
                Hit::PopupRow(index) => console.select_row(index),
                Hit::Popup | Hit::Bar => {}
                Hit::Outside => console.click_outside(),
            }
        }
        MouseEventKind::ScrollUp if console.popup_mode() == PopupMode::Messages => {
            console.scroll_messages(1)
        }
        MouseEventKind::ScrollDown if console.popup_mode() == PopupMode::Messages => {
            console.scroll_messages(-1)
        }
        _ => {}
    }
}

/// Screen placement of every console part for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLayout {
    pub canvas: Rect,
    pub bar: Rect,
    pub glyph: Rect,
    pub history_button: Rect,
    pub input: Rect,
    pub messages_button: Rect,
    pub popup: Option<Rect>,
    pub hint: Rect,
}

/// Bottom-anchored, horizontally centered bar with the popup stacked above it.
pub fn layout(area: Rect, console: &Console) -> ConsoleLayout {
    let hint_height = area.height.min(1);
    let hint = Rect::new(
        area.x,
        area.bottom().saturating_sub(hint_height),
        area.width,
        hint_height,
    );

    let bar_width = console.bar_width().min(area.width);
    let bar_height = BAR_HEIGHT.min(area.height.saturating_sub(hint_height));
    let bar = Rect::new(
        area.x + (area.width - bar_width) / 2,
        hint.y.saturating_sub(bar_height),
        bar_width,
        bar_height,
    );

    let inner = Rect::new(
        bar.x.saturating_add(1),
        bar.y.saturating_add(1),
        bar.width.saturating_sub(2),
        bar.height.saturating_sub(2),
    );
    let cell = |offset: u16, width: u16| {
        Rect::new(inner.x.saturating_add(offset), inner.y, width, inner.height).intersection(inner)
    };
    let glyph = cell(0, 1);
    let history_button = cell(2, 1);
    let input = cell(4, inner.width.saturating_sub(6));
    let messages_button = cell(inner.width.saturating_sub(1), 1);

    let canvas = Rect::new(area.x, area.y, area.width, bar.y.saturating_sub(area.y));
    let popup = popup_rect(console, bar, canvas);

    ConsoleLayout {
        canvas,
        bar,
        glyph,
        history_button,
        input,
        messages_button,
        popup,
        hint,
    }
}

fn popup_rect(console: &Console, bar: Rect, canvas: Rect) -> Option<Rect> {
    let (rows, cap) = match console.popup_mode() {
        PopupMode::Closed => return None,
        PopupMode::Autocomplete => (console.candidates().len(), LIST_ROWS),
        PopupMode::History => (console.history_rows().len().max(1), LIST_ROWS),
        PopupMode::Messages => (console.log().len().max(1), MESSAGE_ROWS),
    };

    let height = (rows.min(cap as usize) as u16 + 2).min(canvas.height);
    if height < 3 {
        return None;
    }
    let width = console.popup_width().min(canvas.width);
    Some(Rect::new(bar.x, bar.y - height, width, height).intersection(canvas))
}

/// First list row shown when `visible` rows fit and `selected` must stay in view.
fn list_offset(selected: Option<usize>, visible: usize) -> usize {
    selected.map_or(0, |index| (index + 1).saturating_sub(visible))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    HistoryButton,
    MessagesButton,
    Chip(usize),
    Input,
    PopupRow(usize),
    Popup,
    Bar,
    Outside,
}

pub fn hit_test(layout: &ConsoleLayout, console: &Console, column: u16, row: u16) -> Hit {
    let position = Position::new(column, row);

    if let Some(popup) = layout.popup.filter(|popup| popup.contains(position)) {
        let first_row = popup.y + 1;
        let visible = popup.height.saturating_sub(2) as usize;
        if row < first_row || row >= first_row + visible as u16 {
            return Hit::Popup;
        }
        let (selected, len) = match console.popup_mode() {
            PopupMode::Autocomplete => (console.candidates().selected(), console.candidates().len()),
            PopupMode::History => (
                console.history_rows().selected(),
                console.history_rows().len(),
            ),
            PopupMode::Closed | PopupMode::Messages => return Hit::Popup,
        };
        let index = list_offset(selected, visible) + (row - first_row) as usize;
        return if index < len {
            Hit::PopupRow(index)
        } else {
            Hit::Popup
        };
    }

    if layout.history_button.contains(position) {
        return Hit::HistoryButton;
    }
    if layout.messages_button.contains(position) {
        return Hit::MessagesButton;
    }
    if layout.input.contains(position) {
        let input = console.input();
        let offset = input.scroll_offset(layout.input.width as usize);
        let line_column = (column - layout.input.x) as usize + offset;
        return match input.chip_at(line_column) {
            Some(index) => Hit::Chip(index),
            None => Hit::Input,
        };
    }
    if layout.bar.contains(position) {
        return Hit::Bar;
    }
    Hit::Outside
}

pub fn draw_ui(frame: &mut Frame, console: &Console) {
    let theme = theme::current();
    let layout = layout(frame.area(), console);

    draw_canvas(frame, console, layout.canvas, theme);
    draw_bar(frame, console, &layout, theme);
    if let Some(area) = layout.popup {
        draw_popup(frame, console, area, theme);
    }
    draw_hint_bar(frame, console, layout.hint, theme);
}

fn draw_canvas(frame: &mut Frame, console: &Console, area: Rect, theme: &Theme) {
    if area.height == 0 {
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(format!(" cmdcon [{}] ", console.locale()));
    frame.render_widget(block, area);
}

fn draw_bar(frame: &mut Frame, console: &Console, layout: &ConsoleLayout, theme: &Theme) {
    if layout.bar.height < BAR_HEIGHT {
        return;
    }
    frame.render_widget(Clear, layout.bar);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.accent)),
        layout.bar,
    );

    frame.render_widget(
        Paragraph::new(Span::styled(
            ">",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        layout.glyph,
    );
    frame.render_widget(
        Paragraph::new(button_span("▾", console.popup_mode() == PopupMode::History, theme)),
        layout.history_button,
    );
    frame.render_widget(
        Paragraph::new(button_span("▴", console.popup_mode() == PopupMode::Messages, theme)),
        layout.messages_button,
    );

    let input = console.input();
    let width = layout.input.width as usize;
    if is_blank(input) {
        frame.render_widget(
            Paragraph::new(Span::styled(
                console.localize(KEY_PLACEHOLDER),
                Style::default().fg(theme.muted),
            )),
            layout.input,
        );
    } else {
        let offset = input.scroll_offset(width);
        frame.render_widget(
            Paragraph::new(input_line(input, offset, width, theme)),
            layout.input,
        );
    }

    if width > 0 {
        let column = input.cursor_column() - input.scroll_offset(width);
        frame.set_cursor_position((layout.input.x + column as u16, layout.input.y));
    }
}

fn button_span(symbol: &'static str, active: bool, theme: &Theme) -> Span<'static> {
    let style = if active {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Span::styled(symbol, style)
}

fn is_blank(input: &InputState) -> bool {
    input.cursor_column() == 0 && input.is_empty() && input.chips().next().is_none()
}

/// The visible slice of the input line, `offset` columns scrolled in.
fn input_line(input: &InputState, offset: usize, width: usize, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    let mut skip = offset;
    let mut remaining = width;

    for segment in input.segments() {
        let (text, style) = match segment {
            Segment::Text(text) => (text.clone(), Style::default().fg(Color::White)),
            Segment::Chip(chip) => (
                format!("[{}]", chip.label),
                Style::default().fg(theme.chip).add_modifier(Modifier::BOLD),
            ),
        };
        let count = text.chars().count();
        let visible: String = text.chars().skip(skip).take(remaining).collect();
        skip = skip.saturating_sub(count);
        remaining -= visible.chars().count();
        if !visible.is_empty() {
            spans.push(Span::styled(visible, style));
        }
    }

    Line::from(spans)
}

fn draw_popup(frame: &mut Frame, console: &Console, area: Rect, theme: &Theme) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));

    match console.popup_mode() {
        PopupMode::Closed => {}
        PopupMode::Autocomplete => {
            let labels = console
                .candidates()
                .items()
                .iter()
                .map(|candidate| candidate.display_label.clone())
                .collect();
            draw_pick_list(frame, area, block, labels, console.candidates().selected(), theme);
        }
        PopupMode::History => {
            let block = block.title(console.localize(KEY_SHOW_HISTORY));
            let rows = console.history_rows();
            if rows.is_empty() {
                let empty = Paragraph::new(console.localize(KEY_NO_HISTORY))
                    .style(Style::default().fg(theme.muted))
                    .alignment(Alignment::Left)
                    .block(block);
                frame.render_widget(empty, area);
            } else {
                draw_pick_list(frame, area, block, rows.items().to_vec(), rows.selected(), theme);
            }
        }
        PopupMode::Messages => {
            let block = block.title(console.localize(KEY_SHOW_MESSAGES));
            let log = console.log();
            let visible = area.height.saturating_sub(2) as usize;
            let start = log.window_start(visible);
            let items: Vec<ListItem<'_>> = log
                .lines()
                .iter()
                .skip(start)
                .take(visible)
                .map(|line| render_log_line(line, theme))
                .collect();
            frame.render_widget(List::new(items).block(block), area);
        }
    }
}

fn draw_pick_list(
    frame: &mut Frame,
    area: Rect,
    block: Block<'_>,
    labels: Vec<String>,
    selected: Option<usize>,
    theme: &Theme,
) {
    let visible = area.height.saturating_sub(2) as usize;
    let offset = list_offset(selected, visible);
    let items: Vec<ListItem<'_>> = labels
        .into_iter()
        .skip(offset)
        .take(visible)
        .map(|label| {
            ListItem::new(Line::from(Span::styled(
                label,
                Style::default().fg(Color::White),
            )))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(selected.map(|index| index - offset));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(theme.selection)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_log_line(line: &LogLine, theme: &Theme) -> ListItem<'static> {
    match line.kind {
        LogKind::Info => {
            let style = Style::default().fg(Color::Gray);
            ListItem::new(Line::from(vec![
                Span::styled("• ".to_string(), style),
                Span::styled(line.text.clone(), style),
            ]))
        }
        LogKind::Error => {
            let prefix_style = Style::default().fg(theme.muted);
            let style = Style::default().fg(theme.error);
            ListItem::new(Line::from(vec![
                Span::styled("! ".to_string(), prefix_style),
                Span::styled(line.text.clone(), style),
            ]))
        }
        LogKind::HistoryEcho => {
            let style = Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
            ListItem::new(Line::from(Span::styled(line.text.clone(), style)))
        }
    }
}

fn draw_hint_bar(frame: &mut Frame, console: &Console, area: Rect, theme: &Theme) {
    let hint = Paragraph::new(format!("  {}", console.localize(KEY_HINT)))
        .style(Style::default().fg(theme.muted))
        .alignment(Alignment::Left);
    frame.render_widget(hint, area);
}
