//! Council TUI Dashboard
//! =====================
//!
//! Terminal front end for an interactive run: an opinion heatmap (one row
//! per step, one column per member), the mean trajectory, and the live status
//! label. Uses Ratatui for rendering and Crossbeam for snapshot delivery.
//!
//! Enable with the `dashboard` feature flag.
//!
//! Keys: `s` start/resume (or run again once finished), `p` pause, `q` quit.

use std::io;
use std::time::Duration;

use crossbeam::channel::{Receiver, Sender};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame, Terminal,
};

use council_core::{LiveStatus, Outcome, RunState, SessionSnapshot};
use council_env::{ControlSender, ControlSignal};
use tracing::warn;

use crate::sink::PresentationSink;

// =============================================================================
// SINK (runner side)
// =============================================================================

/// Forwards snapshots from the stepping loop to the dashboard thread.
pub struct DashboardSink {
    tx: Sender<SessionSnapshot>,
}

impl DashboardSink {
    pub fn new(tx: Sender<SessionSnapshot>) -> Self {
        Self { tx }
    }
}

impl PresentationSink for DashboardSink {
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot) {
        // The dashboard may already be gone; the run carries on regardless.
        let _ = self.tx.send(snapshot.clone());
    }

    fn on_state_change(&mut self, snapshot: &SessionSnapshot) {
        self.on_snapshot(snapshot);
    }
}

// =============================================================================
// COUNCIL DASHBOARD
// =============================================================================

/// TUI Dashboard for an interactive council run.
pub struct CouncilDashboard {
    rx: Receiver<SessionSnapshot>,
    control: ControlSender,
    latest: Option<SessionSnapshot>,
    frame_count: usize,
}

impl CouncilDashboard {
    /// Create a new dashboard with the snapshot receiver and a control sender.
    pub fn new(rx: Receiver<SessionSnapshot>, control: ControlSender) -> Self {
        Self {
            rx,
            control,
            latest: None,
            frame_count: 0,
        }
    }

    /// Seeds the dashboard with the session's initial state.
    pub fn with_initial(mut self, snapshot: SessionSnapshot) -> Self {
        self.latest = Some(snapshot);
        self
    }

    /// Run the TUI main loop (blocks until 'q' pressed)
    pub fn run(&mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        loop {
            // Non-blocking receive of snapshots
            while let Ok(snapshot) = self.rx.try_recv() {
                self.latest = Some(snapshot);
            }

            terminal.draw(|f| self.ui(f))?;
            self.frame_count += 1;

            // Handle input (non-blocking with 50ms timeout)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key.code {
                        KeyCode::Char('s') => self.send(ControlSignal::Start),
                        KeyCode::Char('p') => self.send(ControlSignal::Pause),
                        KeyCode::Char('q') | KeyCode::Esc => {
                            self.send(ControlSignal::Shutdown);
                            break;
                        }
                        _ => {}
                    }
                }
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn send(&mut self, signal: ControlSignal) {
        if let Err(e) = self.control.send(signal) {
            warn!("Dashboard signal not delivered: {}", e);
        }
    }

    /// Render the UI
    fn ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(6),    // Heatmap
                Constraint::Length(6), // Trajectory
                Constraint::Length(3), // Status
                Constraint::Length(1), // Footer
            ])
            .split(f.area());

        let Some(snap) = self.latest.as_ref() else {
            let waiting = Paragraph::new("Waiting for session...")
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(waiting, chunks[1]);
            return;
        };

        // === HEADER ===
        let (state_text, state_color) = match (snap.is_complete(), snap.state) {
            (true, _) => ("DONE", Color::Cyan),
            (false, RunState::Running) => ("RUNNING", Color::Green),
            (false, RunState::Paused) => ("PAUSED", Color::Yellow),
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled("Paradoxical Council", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  |  "),
            Span::styled(state_text, Style::default().fg(state_color).add_modifier(Modifier::BOLD)),
            Span::raw("  |  "),
            Span::raw(format!("Step {}/{}", snap.step, snap.step_count)),
            Span::raw("  |  "),
            Span::raw(format!("Frame: {}", self.frame_count)),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(header, chunks[0]);

        // === HEATMAP ===
        // Newest step at the bottom; only the rows that fit are shown.
        let visible = chunks[1].height.saturating_sub(2) as usize;
        let skip = snap.rows.len().saturating_sub(visible);
        let lines: Vec<Line> = snap
            .rows
            .iter()
            .skip(skip)
            .map(|row| {
                Line::from(
                    row.iter()
                        .map(|&v| Span::styled("██", Style::default().fg(opinion_color(v))))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        let heatmap = Paragraph::new(lines).block(
            Block::default()
                .title("Member opinions over time (blue = NO, red = YES)")
                .borders(Borders::ALL),
        );
        f.render_widget(heatmap, chunks[1]);

        // === TRAJECTORY SPARKLINE ===
        let trajectory: Vec<u64> = snap.means.iter().map(|m| (m * 100.0).round() as u64).collect();
        let sparkline = Sparkline::default()
            .block(Block::default().title("Average YES fraction").borders(Borders::ALL))
            .data(&trajectory)
            .max(100)
            .style(Style::default().fg(Color::White));
        f.render_widget(sparkline, chunks[2]);

        // === STATUS ===
        let status = match (snap.outcome, snap.live_status) {
            (Some(outcome), _) => {
                let color = match outcome {
                    Outcome::ConsensusYes => Color::Red,
                    Outcome::ConsensusNo => Color::Blue,
                    Outcome::OscillatingOrChaotic => Color::Yellow,
                };
                Span::styled(
                    format!(
                        "Final average opinion {:.2} | Outcome: {}",
                        snap.current_mean().unwrap_or_default(),
                        outcome
                    ),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )
            }
            (None, Some(live)) => {
                let color = match live {
                    LiveStatus::MajorityYes => Color::Red,
                    LiveStatus::MajorityNo => Color::Blue,
                    LiveStatus::DebateInProgress => Color::Gray,
                };
                Span::styled(
                    format!("{} | mean {:.3}", live, snap.current_mean().unwrap_or_default()),
                    Style::default().fg(color),
                )
            }
            (None, None) => Span::raw("Press 's' to start"),
        };
        let status = Paragraph::new(Line::from(status))
            .block(Block::default().title("Status").borders(Borders::ALL));
        f.render_widget(status, chunks[3]);

        // === FOOTER ===
        let keys = if snap.is_complete() {
            "s: run again  q: quit"
        } else {
            "s: start/resume  p: pause  q: quit"
        };
        let footer = Paragraph::new(keys)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(footer, chunks[4]);
    }
}

/// Coolwarm-style ramp: 0 is blue, 1 is red.
fn opinion_color(value: f64) -> Color {
    let v = value.clamp(0.0, 1.0);
    let r = (60.0 + 195.0 * v) as u8;
    let b = (60.0 + 195.0 * (1.0 - v)) as u8;
    Color::Rgb(r, 70, b)
}

// =============================================================================
// TESTS
// =============================================================================
