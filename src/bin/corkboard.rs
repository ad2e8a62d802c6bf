//! The corkboard terminal client
//!
//! A single screen: a clock, the composer on top, the task list below and
//! notices at the bottom. The task list redraws on a short tick, so the
//! clock and the per-task countdowns keep moving while the UI waits for
//! keystrokes. Closing the UI (esc) tears the tick down with it.

use std::io;
use std::time::{Duration, Instant};

use chrono::{Local, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use corkboard::client::RestClient;
use corkboard::dates;
use corkboard::settings;
use corkboard::store::feedback::{feedback_channel, FeedbackReceiver, StoreEvent};
use corkboard::view;
use corkboard::{Composer, Priority, TaskId, TaskStore};

/// How long the UI waits for a key before redrawing clock and countdowns
const TICK: Duration = Duration::from_millis(250);
/// How long a toast stays on screen
const TOAST_LIFETIME: Duration = Duration::from_secs(4);

/// Which part of the screen receives keystrokes
#[derive(Clone, Copy, PartialEq)]
enum Focus {
    Title,
    Description,
    Priority,
    Deadline,
    Tasks,
}

fn next_focus(focus: Focus) -> Focus {
    match focus {
        Focus::Title => Focus::Description,
        Focus::Description => Focus::Priority,
        Focus::Priority => Focus::Deadline,
        Focus::Deadline => Focus::Tasks,
        Focus::Tasks => Focus::Title,
    }
}

struct App {
    store: TaskStore<RestClient>,
    composer: Composer,
    feedback: FeedbackReceiver,
    focus: Focus,
    /// Cursor position in the task list, in display order
    selected: usize,
    /// The text being typed in the date picker
    date_input: String,
    toast: Option<(String, Instant)>,
    /// Tasks struck through before the refetch confirms them
    struck: Vec<TaskId>,
}

impl App {
    fn new(store: TaskStore<RestClient>, feedback: FeedbackReceiver) -> Self {
        Self {
            store,
            composer: Composer::new(),
            feedback,
            focus: Focus::Title,
            selected: 0,
            date_input: String::new(),
            toast: None,
            struck: Vec::new(),
        }
    }

    /// Apply whatever the store reported since the last tick
    fn absorb_feedback(&mut self) {
        while let Ok(event) = self.feedback.try_recv() {
            match event {
                StoreEvent::Warned(warning) => self.show_toast(warning.to_string()),
                StoreEvent::Completed(id) => self.struck.push(id),
                // A fresh list carries its own completion flags
                StoreEvent::Refreshed { .. } => self.struck.clear(),
                // The persistent banner is rendered from the store state
                StoreEvent::Failed { .. } => {}
            }
        }
    }

    fn show_toast(&mut self, message: String) {
        self.toast = Some((message, Instant::now()));
    }

    fn expire_toast(&mut self) {
        if let Some((_, born)) = &self.toast {
            if born.elapsed() > TOAST_LIFETIME {
                self.toast = None;
            }
        }
    }

    fn is_struck(&self, id: TaskId) -> bool {
        self.struck.contains(&id)
    }

    /// The id under the cursor, in display order
    fn selected_task_id(&self) -> Option<TaskId> {
        view::sorted_for_display(self.store.tasks())
            .get(self.selected)
            .map(|task| task.id())
    }

    fn clamp_selection(&mut self) {
        let count = self.store.tasks().len();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let client = RestClient::from_url(settings::SERVER_URL.clone());
    let (sender, receiver) = feedback_channel();
    let mut store = TaskStore::new_with_feedback(client, sender);
    // A failure here lands in the banner, the UI starts either way
    store.fetch_all().await;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, receiver);
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("{:?}", err);
    }
    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.absorb_feedback();
        app.expire_toast();
        app.clamp_selection();
        terminal.draw(|f| draw(f, app))?;

        if event::poll(TICK)? == false {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(app, key).await == Flow::Quit {
                return Ok(());
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

async fn handle_key(app: &mut App, key: KeyEvent) -> Flow {
    // The date picker captures every key while it is open
    if app.composer.calendar_open() {
        on_picker_key(app, key.code);
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Esc => return Flow::Quit,
        KeyCode::Tab => {
            app.focus = next_focus(app.focus);
            return Flow::Continue;
        }
        _ => {}
    }

    match app.focus {
        Focus::Tasks => on_tasks_key(app, key.code).await,
        _ => on_composer_key(app, key.code).await,
    }
    Flow::Continue
}

/// Keys for the composer rows (title, description, priority, deadline)
async fn on_composer_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => match app.focus {
            Focus::Deadline => open_picker(app),
            _ => submit(app).await,
        },
        KeyCode::Backspace => match app.focus {
            Focus::Title => {
                app.composer.title_mut().pop();
            }
            Focus::Description => {
                app.composer.description_mut().pop();
            }
            _ => {}
        },
        KeyCode::Left => {
            if app.focus == Focus::Priority {
                app.composer.set_priority(Priority::High);
            }
        }
        KeyCode::Right => {
            if app.focus == Focus::Priority {
                app.composer.set_priority(Priority::Low);
            }
        }
        KeyCode::Char(c) => match app.focus {
            Focus::Title => app.composer.title_mut().push(c),
            Focus::Description => app.composer.description_mut().push(c),
            Focus::Priority => {
                if c == ' ' {
                    let flipped = match app.composer.priority() {
                        Priority::High => Priority::Low,
                        Priority::Low => Priority::High,
                    };
                    app.composer.set_priority(flipped);
                }
            }
            Focus::Deadline => {
                if c == ' ' {
                    open_picker(app);
                }
            }
            Focus::Tasks => {}
        },
        _ => {}
    }
}

/// Keys for the task list
async fn on_tasks_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up => {
            app.selected = app.selected.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.selected + 1 < app.store.tasks().len() {
                app.selected += 1;
            }
        }
        KeyCode::Char(' ') => {
            if let Some(id) = app.selected_task_id() {
                app.store.toggle_completed(id).await;
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_task_id() {
                app.store.delete(id).await;
            }
        }
        KeyCode::Char('r') => {
            app.store.fetch_all().await;
        }
        KeyCode::Char('x') => {
            app.store.clear_error();
        }
        _ => {}
    }
}

/// Keys while the date picker is open
fn on_picker_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.composer.close_calendar();
            app.date_input.clear();
        }
        KeyCode::Enter => {
            let raw = std::mem::take(&mut app.date_input);
            if let Err(warning) = app.composer.set_due_date(&raw) {
                app.show_toast(warning.to_string());
            }
            app.composer.close_calendar();
        }
        KeyCode::Char(c) => app.date_input.push(c),
        KeyCode::Backspace => {
            app.date_input.pop();
        }
        _ => {}
    }
}

fn open_picker(app: &mut App) {
    // Pre-fill with the current deadline, in a shape the parser accepts back
    app.date_input = dates::format_display(app.composer.due_date());
    app.composer.open_calendar();
}

async fn submit(app: &mut App) {
    let draft = app.composer.draft();
    if app.store.create(&draft).await {
        app.composer.clear();
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(2),
            Constraint::Length(6),
            Constraint::Min(5),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_composer(f, app, chunks[1]);
    draw_tasks(f, app, chunks[2]);
    draw_notices(f, app, chunks[3]);
    draw_help(f, chunks[4]);

    if app.composer.calendar_open() {
        draw_picker(f, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let now = Local::now();
    let lines = vec![
        Line::from(Span::styled(
            "Hi! What do you have planned?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{}  {}", now.format("%a %b %d %Y"), now.format("%H:%M:%S"))),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_composer(f: &mut Frame, app: &App, area: Rect) {
    let focused = |row: Focus| {
        if app.focus == row {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        }
    };
    let rank_style = |priority: Priority, shown: Priority| {
        let base = match shown {
            Priority::High => Style::default().fg(Color::Red),
            Priority::Low => Style::default().fg(Color::Yellow),
        };
        if priority == shown {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base
        }
    };

    let priority = app.composer.priority();
    let lines = vec![
        Line::from(vec![
            Span::styled("Title: ", focused(Focus::Title)),
            Span::raw(app.composer.title().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Description: ", focused(Focus::Description)),
            Span::raw(app.composer.description().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Priority: ", focused(Focus::Priority)),
            Span::styled(" High ", rank_style(priority, Priority::High)),
            Span::raw(" "),
            Span::styled(" Low ", rank_style(priority, Priority::Low)),
        ]),
        Line::from(vec![
            Span::styled("Deadline: ", focused(Focus::Deadline)),
            Span::raw(dates::format_display(app.composer.due_date())),
            Span::styled("  (enter opens the picker)", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let block = Block::default().title("Create a New Task").borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let now = Utc::now();
    let tasks = view::sorted_for_display(app.store.tasks());

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let struck = task.completed() || app.is_struck(task.id());
            let mut title_style = Style::default().add_modifier(Modifier::BOLD);
            let mut body_style = Style::default().fg(Color::DarkGray);
            if struck {
                title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
                body_style = body_style.add_modifier(Modifier::CROSSED_OUT);
            }

            let checkbox = if task.completed() { "[x] " } else { "[ ] " };
            let rank_color = if task.priority().is_high() { Color::Red } else { Color::Yellow };

            let mut first = vec![
                Span::raw(checkbox),
                Span::styled("● ", Style::default().fg(rank_color)),
                Span::styled(task.title().to_string(), title_style),
            ];
            if let Some(due_date) = task.due_date() {
                let time_left = view::countdown_label(due_date, &now);
                if time_left.is_empty() == false {
                    let color = if time_left == "Expired" { Color::Red } else { Color::Green };
                    first.push(Span::raw("  "));
                    first.push(Span::styled(time_left, Style::default().fg(color)));
                }
            }

            let mut lines = vec![Line::from(first)];
            let mut second = vec![Span::raw("      ")];
            if task.description().is_empty() == false {
                second.push(Span::styled(task.description().to_string(), body_style));
                second.push(Span::raw("  "));
            }
            if let Some(due_date) = task.due_date() {
                second.push(Span::styled(
                    dates::format_display(due_date),
                    Style::default().fg(Color::Blue),
                ));
            }
            if second.len() > 1 {
                lines.push(Line::from(second));
            }

            ListItem::new(lines)
        })
        .collect();

    let block = Block::default()
        .title(format!("Tasks ({})", tasks.len()))
        .borders(Borders::ALL)
        .border_style(if app.focus == Focus::Tasks {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    if app.focus == Focus::Tasks && tasks.is_empty() == false {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_notices(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    if let Some((toast, _)) = &app.toast {
        lines.push(Line::from(Span::styled(
            format!(" {} ", toast),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )));
    }
    if let Some(error) = app.store.error() {
        lines.push(Line::from(Span::styled(
            format!(" {} ", error),
            Style::default().fg(Color::White).bg(Color::Red),
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help = "tab: next field | enter: create | space: toggle | d: delete | r: refresh | x: dismiss error | esc: quit";
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray))),
        area,
    );
}

fn draw_picker(f: &mut Frame, app: &App) {
    let area = centered_rect(44, 4, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(app.date_input.as_str()),
        Line::from(Span::styled(
            "dd/mm/yyyy hh:mm - enter: set, esc: keep",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let block = Block::default()
        .title("Deadline")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - width) / 2,
        y: outer.y + (outer.height - height) / 2,
        width,
        height,
    }
}
