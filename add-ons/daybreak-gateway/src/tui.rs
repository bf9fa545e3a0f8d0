//! Terminal dashboard: widget grid plus the chat panel.
//!
//! Launch with `--dashboard` (feature `tui-dashboard`). The render loop is
//! single-threaded; network calls run on the tokio runtime and settle back
//! through an mpsc channel drained once per tick, so all mutable state
//! (transcript, session handle, snapshots) is touched only here.
//!
//! Keys: type + Enter to send, Ctrl+L to clear the session, Tab to flip the
//! commute direction, Esc to quit.

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use daybreak_agent::{preload_dashboard, AgentClient, DashboardPreload};
use daybreak_core::{
    BriefingData, ChatReply, ChatSession, CommuteDirection, CommuteOptionsData, CoreConfig, Role,
    ShuttleScheduleData, Submission,
};

/// Results flowing back from the tokio runtime into the render loop.
enum AppEvent {
    Preload(DashboardPreload),
    Briefing(BriefingData),
    Commute {
        direction: CommuteDirection,
        options: Result<CommuteOptionsData, String>,
        shuttle: Result<ShuttleScheduleData, String>,
    },
    ChatSettled {
        epoch: u64,
        result: Result<ChatReply, String>,
    },
}

struct DashboardApp {
    app_name: String,
    user_name: String,
    agent: Arc<AgentClient>,
    handle: tokio::runtime::Handle,
    tx: mpsc::Sender<AppEvent>,
    rx: mpsc::Receiver<AppEvent>,
    session: ChatSession,
    input: String,
    preload: Option<DashboardPreload>,
    briefing: Option<BriefingData>,
    direction: CommuteDirection,
    commute: Option<CommuteOptionsData>,
    commute_error: Option<String>,
    shuttle: Option<ShuttleScheduleData>,
}

impl DashboardApp {
    fn new(config: &CoreConfig, agent: Arc<AgentClient>, handle: tokio::runtime::Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        let app = Self {
            app_name: config.app_name.clone(),
            user_name: config.user_name.clone(),
            agent,
            handle,
            tx,
            rx,
            session: ChatSession::with_greeting(
                "Good morning! I've gathered your daily briefing. Ask me anything about your \
                 routine, weather, schedule, or markets. Type /help for shortcuts.",
            ),
            input: String::new(),
            preload: None,
            briefing: None,
            direction: CommuteDirection::ToWork,
            commute: None,
            commute_error: None,
            shuttle: None,
        };
        app.spawn_initial_fetches();
        app
    }

    fn spawn_initial_fetches(&self) {
        let agent = Arc::clone(&self.agent);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let preload = preload_dashboard(agent.as_ref()).await;
            let _ = tx.send(AppEvent::Preload(preload));
        });
        let agent = Arc::clone(&self.agent);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let briefing = agent.get_briefing().await;
            let _ = tx.send(AppEvent::Briefing(briefing));
        });
        self.request_commute();
    }

    fn request_commute(&self) {
        let direction = self.direction;
        let agent = Arc::clone(&self.agent);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let (origin, destination) = direction.shuttle_route();
            let options = agent
                .fetch_commute_options(direction)
                .await
                .map_err(|e| e.to_string());
            let shuttle = agent
                .fetch_shuttle_schedule(origin, destination)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::Commute {
                direction,
                options,
                shuttle,
            });
        });
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                AppEvent::Preload(preload) => self.preload = Some(preload),
                AppEvent::Briefing(briefing) => self.briefing = Some(briefing),
                AppEvent::Commute {
                    direction,
                    options,
                    shuttle,
                } => {
                    // Direction flipped while the fetch was in flight: stale.
                    if direction != self.direction {
                        continue;
                    }
                    match options {
                        Ok(data) => {
                            self.commute = Some(data);
                            self.commute_error = None;
                        }
                        Err(detail) => {
                            tracing::warn!(target: "daybreak::tui", error = %detail, "commute fetch failed");
                            self.commute = None;
                            self.commute_error = Some("Failed to load commute data".to_string());
                        }
                    }
                    self.shuttle = shuttle.ok();
                }
                AppEvent::ChatSettled { epoch, result } => self.session.complete(epoch, result),
            }
        }
    }

    fn submit_input(&mut self) {
        let line = std::mem::take(&mut self.input);
        match self.session.submit(&line) {
            Submission::Dispatch { outgoing, epoch } => {
                let agent = Arc::clone(&self.agent);
                let tx = self.tx.clone();
                self.handle.spawn(async move {
                    let result = agent
                        .send_chat(&outgoing)
                        .await
                        .map_err(|e| e.detail());
                    let _ = tx.send(AppEvent::ChatSettled { epoch, result });
                });
            }
            // Keep what the user typed while the previous send settles.
            Submission::Busy => self.input = line,
            Submission::Help | Submission::Rejected => {}
        }
    }

    fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
        self.commute = None;
        self.commute_error = None;
        self.shuttle = None;
        self.request_commute();
    }
}

/// Run the TUI dashboard until the user quits with Esc.
pub fn run_dashboard(
    config: Arc<CoreConfig>,
    agent: Arc<AgentClient>,
    handle: tokio::runtime::Handle,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = DashboardApp::new(&config, agent, handle);
    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: DashboardApp,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(250);

    loop {
        app.drain_events();
        terminal.draw(|f| ui(f, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Enter => app.submit_input(),
                    KeyCode::Tab => app.toggle_direction(),
                    KeyCode::Backspace => {
                        app.input.pop();
                    }
                    KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.session.clear();
                    }
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.input.push(c);
                    }
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

/// Greeting for the header, by local hour.
fn greeting_for_hour(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 17 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

fn ui(f: &mut Frame, app: &DashboardApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),  // Header: greeting + clock + briefing
            Constraint::Length(9),  // Widget row
            Constraint::Length(9),  // Commute row
            Constraint::Min(8),     // Chat transcript
            Constraint::Length(3),  // Input
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_widget_row(f, chunks[1], app);
    render_commute_row(f, chunks[2], app);
    render_transcript(f, chunks[3], app);
    render_input(f, chunks[4], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &DashboardApp) {
    use chrono::Timelike;
    let now = chrono::Local::now();
    let greeting = greeting_for_hour(now.hour());
    let briefing_line = app
        .briefing
        .as_ref()
        .map(|b| b.briefing.clone())
        .unwrap_or_else(|| "Gathering your briefing...".to_string());

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("🌅 {}", app.app_name),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{}, {}!", greeting, app.user_name),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                now.format("%H:%M:%S").to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                now.format("%A, %B %e, %Y").to_string(),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(Span::styled(briefing_line, Style::default().fg(Color::Gray))),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

fn render_widget_row(f: &mut Frame, area: Rect, app: &DashboardApp) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_weather(f, columns[0], app);
    render_markets(f, columns[1], app);
    render_calendar(f, columns[2], app);
    render_tasks(f, columns[3], app);
}

/// Lines for a source that has no data yet: spinner text or its error.
fn placeholder_lines(error: Option<&str>) -> Vec<Line<'static>> {
    match error {
        Some(e) => vec![Line::from(Span::styled(
            e.to_string(),
            Style::default().fg(Color::Red),
        ))],
        None => vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Gray),
        ))],
    }
}

fn render_weather(f: &mut Frame, area: Rect, app: &DashboardApp) {
    let source = app.preload.as_ref().map(|p| &p.weather);
    let lines = match source.and_then(|s| s.data.as_ref()) {
        Some(weather) => {
            let report = &weather.data;
            vec![
                Line::from(vec![
                    Span::styled(
                        format!("{}°F", report.current_temp),
                        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(report.condition.clone(), Style::default().fg(Color::White)),
                ]),
                Line::from(Span::styled(
                    format!(
                        "High: {}°F • Low: {}°F • Rain: {}%",
                        report.temp_hi, report.temp_lo, report.precip_chance
                    ),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    report.location.clone(),
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        }
        None => placeholder_lines(source.and_then(|s| s.error.as_deref())),
    };
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("🌤️ Weather"));
    f.render_widget(widget, area);
}

fn render_markets(f: &mut Frame, area: Rect, app: &DashboardApp) {
    let source = app.preload.as_ref().map(|p| &p.financial);
    match source.and_then(|s| s.data.as_ref()) {
        Some(financial) => {
            let items: Vec<ListItem> = financial
                .data
                .data
                .iter()
                .map(|quote| {
                    let up = quote.change_percent >= 0.0;
                    let color = if up { Color::Green } else { Color::Red };
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:<5}", quote.symbol),
                            Style::default().fg(Color::White),
                        ),
                        Span::styled(
                            format!("{:>10.2}", quote.price),
                            Style::default().fg(Color::White),
                        ),
                        Span::styled(
                            format!(" {}{:.1}%", if up { "+" } else { "" }, quote.change_percent),
                            Style::default().fg(color),
                        ),
                    ]))
                })
                .collect();
            let list =
                List::new(items).block(Block::default().borders(Borders::ALL).title("💰 Markets"));
            f.render_widget(list, area);
        }
        None => {
            let widget = Paragraph::new(placeholder_lines(source.and_then(|s| s.error.as_deref())))
                .block(Block::default().borders(Borders::ALL).title("💰 Markets"));
            f.render_widget(widget, area);
        }
    }
}

fn render_calendar(f: &mut Frame, area: Rect, app: &DashboardApp) {
    let source = app.preload.as_ref().map(|p| &p.calendar);
    match source.and_then(|s| s.data.as_ref()) {
        Some(calendar) => {
            let items: Vec<ListItem> = calendar
                .data
                .events
                .iter()
                .map(|event| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:<9}", event.time),
                            Style::default().fg(Color::Gray),
                        ),
                        Span::styled(event.title.clone(), Style::default().fg(Color::White)),
                    ]))
                })
                .collect();
            let title = format!("📅 Today ({} events)", calendar.data.total_events);
            let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(list, area);
        }
        None => {
            let widget = Paragraph::new(placeholder_lines(source.and_then(|s| s.error.as_deref())))
                .block(Block::default().borders(Borders::ALL).title("📅 Today"));
            f.render_widget(widget, area);
        }
    }
}

fn render_tasks(f: &mut Frame, area: Rect, app: &DashboardApp) {
    let source = app.preload.as_ref().map(|p| &p.todos);
    match source.and_then(|s| s.data.as_ref()) {
        Some(todos) => {
            let items: Vec<ListItem> = todos
                .data
                .items
                .iter()
                .map(|item| {
                    let marker = if item.completed { "☑" } else { "☐" };
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("{} ", marker)),
                        Span::styled(item.text.clone(), Style::default().fg(Color::White)),
                    ]))
                })
                .collect();
            let title = format!("✅ Tasks ({} pending)", todos.data.total_pending);
            let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(list, area);
        }
        None => {
            let widget = Paragraph::new(placeholder_lines(source.and_then(|s| s.error.as_deref())))
                .block(Block::default().borders(Borders::ALL).title("✅ Tasks"));
            f.render_widget(widget, area);
        }
    }
}

fn render_commute_row(f: &mut Frame, area: Rect, app: &DashboardApp) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let direction_label = match app.direction {
        CommuteDirection::ToWork => "To Work",
        CommuteDirection::FromWork => "From Work",
    };
    let title = format!("🚗 Commute: {} (Tab to flip)", direction_label);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(error) = &app.commute_error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(commute) = &app.commute {
        if let Some(recommendation) = &commute.data.recommendation {
            lines.push(Line::from(vec![
                Span::styled("💡 ", Style::default().fg(Color::Yellow)),
                Span::styled(recommendation.clone(), Style::default().fg(Color::Yellow)),
            ]));
        }
        if let Some(driving) = &commute.data.driving {
            lines.push(Line::from(Span::styled(
                format!(
                    "🚗 {} min • {} mi • {} • depart {} arrive {}",
                    driving.duration_minutes,
                    driving.distance_miles,
                    driving.traffic_status,
                    driving.departure_time,
                    driving.arrival_time
                ),
                Style::default().fg(Color::White),
            )));
        }
        if let Some(transit) = &commute.data.transit {
            lines.push(Line::from(Span::styled(
                format!(
                    "🚆 {} min total (train {} + shuttle {} + walk {} + transfer {})",
                    transit.total_duration_minutes,
                    transit.caltrain_duration_minutes,
                    transit.shuttle_duration_minutes,
                    transit.walking_duration_minutes,
                    transit.transfer_time_minutes
                ),
                Style::default().fg(Color::White),
            )));
            for train in transit.next_departures.iter().take(2) {
                let delay = if train.delay_minutes > 0 {
                    format!(" (+{} min)", train.delay_minutes)
                } else {
                    String::new()
                };
                lines.push(Line::from(Span::styled(
                    format!(
                        "   Train {}: {} → {}{}",
                        train.train_number, train.departure_time, train.arrival_time, delay
                    ),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
    } else {
        lines = placeholder_lines(None);
    }
    let commute_widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(commute_widget, columns[0]);

    let mut shuttle_lines: Vec<Line> = Vec::new();
    if let Some(shuttle) = &app.shuttle {
        shuttle_lines.push(Line::from(Span::styled(
            format!(
                "{} min ride • every {} min",
                shuttle.data.duration_minutes, shuttle.data.frequency_minutes
            ),
            Style::default().fg(Color::White),
        )));
        shuttle_lines.push(Line::from(Span::styled(
            shuttle.data.service_hours.clone(),
            Style::default().fg(Color::Gray),
        )));
        if shuttle.data.next_departures.is_empty() {
            shuttle_lines.push(Line::from(Span::styled(
                "No more departures today",
                Style::default().fg(Color::Gray),
            )));
        } else {
            for departure in shuttle.data.next_departures.iter().take(3) {
                shuttle_lines.push(Line::from(Span::styled(
                    format!("   {}", departure.departure_time),
                    Style::default().fg(Color::White),
                )));
            }
        }
    } else {
        shuttle_lines = placeholder_lines(None);
    }
    let shuttle_widget = Paragraph::new(shuttle_lines)
        .block(Block::default().borders(Borders::ALL).title("🚌 Shuttle"));
    f.render_widget(shuttle_widget, columns[1]);
}

fn render_transcript(f: &mut Frame, area: Rect, app: &DashboardApp) {
    let mut lines: Vec<Line> = Vec::new();
    for turn in app.session.turns() {
        let (label, color) = match turn.role {
            Role::User => ("👤 You: ", Color::Blue),
            Role::Assistant => ("🤖 Assistant: ", Color::Magenta),
        };
        for (i, text_line) in turn.text.lines().enumerate() {
            if i == 0 {
                lines.push(Line::from(vec![
                    Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::raw(text_line.to_string()),
                ]));
            } else {
                lines.push(Line::from(Span::raw(format!("    {}", text_line))));
            }
        }
    }
    // Keep the tail visible; the transcript itself is unbounded.
    let visible = area.height.saturating_sub(2) as usize;
    if lines.len() > visible {
        lines = lines.split_off(lines.len() - visible);
    }
    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("🤖 AI Assistant"));
    f.render_widget(transcript, area);
}

fn render_input(f: &mut Frame, area: Rect, app: &DashboardApp) {
    let title = if app.session.is_pending() {
        "Message (waiting for assistant...)"
    } else {
        "Message (Enter to send • /help • Ctrl+L clears session • Esc quits)"
    };
    let style = if app.session.is_pending() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let input = Paragraph::new(Span::styled(app.input.clone(), style))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);
}
