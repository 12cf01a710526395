use std::{
    io,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Sparkline, Wrap},
    Frame, Terminal,
};

use crate::app::App;
use crate::constants::{SPARK_RESOLUTION, TICK_RATE_MS, TITLE, VERSION};
use crate::util::{format_stats, scale_for_sparkline};
use crate::window::RollingWindow;

/// Where the refresh loop gets terminal input from.
pub trait EventSource {
    /// Wait at most `timeout` for the next event.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

pub fn is_quit(event: &Event) -> bool {
    match event {
        Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. }) => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        },
        _ => false,
    }
}

pub fn run(window: &RollingWindow, interrupted: &AtomicBool) -> io::Result<()> {
    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e);
        }
    };

    let mut app = App::new(window.capacity());
    app.on_tick(window);
    let res = run_app_loop(
        &mut terminal,
        app,
        window,
        &mut CrosstermEvents,
        Duration::from_millis(TICK_RATE_MS),
        interrupted,
    );

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Redraw, then wait for whichever comes first: a terminal event or the next
/// tick. Returns on a quit key or once `interrupted` is raised.
pub fn run_app_loop<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    mut app: App,
    window: &RollingWindow,
    events: &mut E,
    tick_rate: Duration,
    interrupted: &AtomicBool,
) -> io::Result<()> {
    loop {
        if interrupted.load(Ordering::Relaxed) {
            return Ok(());
        }

        terminal.draw(|f| draw(f, &app))?;

        let timeout = tick_rate.checked_sub(app.last_tick.elapsed()).unwrap_or(Duration::ZERO);
        if let Some(event) = events.poll_event(timeout)? {
            if is_quit(&event) {
                return Ok(());
            }
        }
        if app.last_tick.elapsed() >= tick_rate {
            app.on_tick(window);
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Dump panel
            Constraint::Min(3),    // Sparkline
            Constraint::Length(1), // Status bar
        ])
        .split(f.size());

    // ============= Dump panel ============
    let refreshed = app
        .refreshed_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let dump_text = vec![
        Line::from(app.dump.as_str()),
        Line::from(vec![
            Span::styled(format_stats(&app.stats), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  @ {}", refreshed), Style::default().fg(Color::DarkGray)),
        ]),
    ];
    let dump = Paragraph::new(dump_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Dump ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(dump, chunks[0]);

    // ============= Sparkline ============
    let spark_block = Block::default()
        .title(format!(" Sparkline [{}] ", app.samples.len()))
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    if app.has_data {
        let data = scale_for_sparkline(&app.samples);
        let sparkline = Sparkline::default()
            .block(spark_block)
            .data(&data)
            .max(SPARK_RESOLUTION)
            .style(Style::default().fg(Color::Red));
        f.render_widget(sparkline, chunks[1]);
    } else {
        let waiting = Paragraph::new("waiting for data from stdin")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(spark_block);
        f.render_widget(waiting, chunks[1]);
    }

    // ============ Status bar ============
    let status = Line::from(vec![
        Span::styled(format!(" {} ", TITLE), Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD)),
        Span::raw(" | Press 'q' to quit | "),
        Span::styled(VERSION, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(status).style(Style::default().bg(Color::Rgb(20, 20, 20))), chunks[2]);
}
