use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info, warn};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::{io, time::Duration};
use textwrap::wrap;
use tui_input::{backend::crossterm::EventHandler, Input};

use chatverse::models::{ContactStatus, Message};
use chatverse::pages::{Page, Router, BRAND, FEATURES, TAGLINE};
use chatverse::MockChatSession;

// Export types needed by main module
pub use ratatui::backend::CrosstermBackend;
pub use ratatui::Terminal;

/// What the main loop should do after a key press
#[derive(Debug, PartialEq)]
pub enum UiAction {
    Quit,
}

pub struct ChatUI {
    router: Router,
    input: Input,
    active_tab: Tab,
    current_contact_index: usize,
    help_dialog: bool,
    reply_notification: Option<ReplyNotification>,
}

// Shown when a reply lands while the chat screen is not open
struct ReplyNotification {
    author: String,
    timestamp: chrono::DateTime<chrono::Utc>, // For auto-dismiss
}

enum Tab {
    Messages,
    Contacts,
}

impl ChatUI {
    pub fn new(session: &MockChatSession) -> Self {
        let selected = session.selected_contact_id();
        let current_contact_index = session
            .contacts()
            .iter()
            .position(|c| c.id == selected)
            .unwrap_or(0);

        ChatUI {
            router: Router::default(),
            input: Input::default(),
            active_tab: Tab::Messages,
            current_contact_index,
            help_dialog: false,
            reply_notification: None,
        }
    }

    pub fn current_page(&self) -> Page {
        self.router.current()
    }

    pub fn show_reply_notification(&mut self, message: &Message) {
        debug!("UI: Showing reply notification for {}", message.author);
        self.reply_notification = Some(ReplyNotification {
            author: message.author.clone(),
            timestamp: chrono::Utc::now(),
        });
    }

    /// Dismiss the reply notification once it has been visible for `timeout_secs`
    pub fn clean_reply_notifications(&mut self, timeout_secs: i64) {
        if let Some(notification) = &self.reply_notification {
            if (chrono::Utc::now() - notification.timestamp).num_seconds() > timeout_secs {
                self.reply_notification = None;
            }
        }
    }

    pub fn handle_input(&mut self, session: &MockChatSession) -> Result<Option<UiAction>> {
        if !event::poll(Duration::from_millis(10))? {
            return Ok(None);
        }
        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => return Ok(None),
        };

        // Any key press closes the help dialog
        if self.help_dialog {
            self.help_dialog = false;
            return Ok(None);
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(UiAction::Quit));
        }

        match self.router.current() {
            Page::Landing => Ok(self.handle_landing_key(key)),
            Page::Login | Page::Register => {
                self.handle_placeholder_key(key);
                Ok(None)
            }
            Page::Chat => {
                self.handle_chat_key(key, session);
                Ok(None)
            }
        }
    }

    fn handle_landing_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Some(UiAction::Quit),
            KeyCode::Char('l') => self.router.navigate(Page::Login),
            KeyCode::Char('s') => self.router.navigate(Page::Register),
            KeyCode::Enter | KeyCode::Char('c') => self.router.navigate(Page::Chat),
            _ => {}
        }
        None
    }

    fn handle_placeholder_key(&mut self, key: KeyEvent) {
        match (self.router.current(), key.code) {
            (_, KeyCode::Esc) => {
                self.router.back();
            }
            (Page::Login, KeyCode::Char('s')) => self.router.navigate(Page::Register),
            (Page::Register, KeyCode::Char('l')) => self.router.navigate(Page::Login),
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent, session: &MockChatSession) {
        match key.code {
            KeyCode::Esc => {
                self.router.back();
            }
            KeyCode::Tab => {
                self.active_tab = match self.active_tab {
                    Tab::Messages => Tab::Contacts,
                    Tab::Contacts => Tab::Messages,
                };
            }
            KeyCode::Char('h') | KeyCode::Char('H') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.help_dialog = true;
            }
            KeyCode::Enter => {
                if let Tab::Messages = self.active_tab {
                    if let Some(id) = session.submit_draft() {
                        debug!("UI: Sent message {}", id);
                        self.input = Input::default();
                    }
                }
            }
            KeyCode::Up | KeyCode::Down => {
                if let Tab::Contacts = self.active_tab {
                    let count = session.contacts().len();
                    if count == 0 {
                        return;
                    }
                    self.current_contact_index = if key.code == KeyCode::Up {
                        (self.current_contact_index + count - 1) % count
                    } else {
                        (self.current_contact_index + 1) % count
                    };
                    let contact_id = session.contacts()[self.current_contact_index].id.clone();
                    if let Err(e) = session.select_contact(&contact_id) {
                        warn!("UI: Could not select contact {}: {}", contact_id, e);
                    }
                }
            }
            _ => {
                if let Tab::Messages = self.active_tab {
                    self.input.handle_event(&Event::Key(key));
                    session.set_draft(self.input.value());
                }
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, session: &MockChatSession) {
        let size = frame.size();

        match self.router.current() {
            Page::Landing => draw_landing(frame, size),
            Page::Login | Page::Register => draw_placeholder(frame, self.router.current(), size),
            Page::Chat => self.draw_chat(frame, session, size),
        }

        if self.help_dialog {
            draw_help_dialog(frame, size);
        }

        if let Some(notification) = &self.reply_notification {
            if self.router.current() != Page::Chat {
                draw_reply_notification(frame, notification, size);
            }
        }
    }

    fn draw_chat(&self, frame: &mut Frame, session: &MockChatSession, size: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25), // Contacts panel
                Constraint::Percentage(75), // Chat panel
            ])
            .split(size);

        let chat_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Selected contact header
                Constraint::Min(5),    // Messages area
                Constraint::Length(3), // Input box
                Constraint::Length(1), // Help line
            ])
            .split(chunks[1]);

        let contacts: Vec<ListItem> = session
            .contacts()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let marker = if i == self.current_contact_index { "> " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled("● ", Style::default().fg(status_color(c.status))),
                    Span::raw(c.name.clone()),
                    Span::styled(format!(" ({})", c.status), Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();

        let contacts_list = List::new(contacts).block(
            Block::default()
                .title("Chats (Tab to focus)")
                .borders(Borders::ALL)
                .border_style(match self.active_tab {
                    Tab::Contacts => Style::default().fg(Color::Yellow),
                    _ => Style::default(),
                }),
        );
        frame.render_widget(contacts_list, chunks[0]);

        // Header with the selected contact
        let header = match session.selected_contact() {
            Some(contact) => Line::from(vec![
                Span::styled("● ", Style::default().fg(status_color(contact.status))),
                Span::styled(contact.name, Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", contact.status), Style::default().fg(Color::Gray)),
            ]),
            None => Line::from("No contact selected"),
        };
        let header_widget = Paragraph::new(header).block(Block::default().borders(Borders::ALL));
        frame.render_widget(header_widget, chat_chunks[0]);

        draw_messages(frame, session, chat_chunks[1]);

        let input_block = Block::default()
            .title("Type a message...")
            .borders(Borders::ALL)
            .border_style(match self.active_tab {
                Tab::Messages => Style::default().fg(Color::Yellow),
                _ => Style::default(),
            });
        let input_widget = Paragraph::new(self.input.value())
            .block(input_block)
            .style(Style::default());
        frame.render_widget(input_widget, chat_chunks[2]);

        // Send is disabled while the draft is blank
        let send_style = if self.input.value().trim().is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green)
        };
        let help_spans = vec![
            Span::styled("ESC back | TAB switch | ", Style::default().fg(Color::Gray)),
            Span::styled("Enter send", send_style),
            Span::styled(" | Ctrl+H help | Ctrl+C quit", Style::default().fg(Color::Gray)),
        ];
        frame.render_widget(Paragraph::new(Line::from(help_spans)), chat_chunks[3]);

        if let Tab::Messages = self.active_tab {
            frame.set_cursor(
                chat_chunks[2].x + self.input.cursor() as u16 + 1,
                chat_chunks[2].y + 1,
            );
        }
    }
}

fn status_color(status: ContactStatus) -> Color {
    match status {
        ContactStatus::Online => Color::Green,
        ContactStatus::Away => Color::Yellow,
        ContactStatus::Offline => Color::Gray,
    }
}

fn draw_messages(f: &mut Frame, session: &MockChatSession, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Messages
            Constraint::Length(1), // Typing indicator
        ])
        .split(area);

    let wrap_width = area.width.saturating_sub(2).max(1) as usize; // Account for borders

    let items: Vec<ListItem> = session
        .messages()
        .iter()
        .flat_map(|m| {
            let full_content = format!("[{}] {}: {}", m.time_label(), m.author, m.text);
            let style = if m.is_own() {
                Style::default().fg(Color::Blue)
            } else {
                Style::default()
            };

            let wrapped_lines: Vec<String> = wrap(&full_content, wrap_width)
                .into_iter()
                .map(|l| l.into_owned())
                .collect();

            wrapped_lines
                .into_iter()
                .map(move |line| ListItem::new(Text::from(line)).style(style))
                .collect::<Vec<_>>()
        })
        .collect();

    // Keep the newest message in view
    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(items.len() - 1));
    }

    let messages_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Messages"))
        .highlight_style(Style::default());
    f.render_stateful_widget(messages_list, chunks[0], &mut list_state);

    if session.is_awaiting_reply() {
        let who = session
            .selected_contact()
            .map(|c| c.name)
            .unwrap_or_else(|| "Someone".to_string());
        let typing = Paragraph::new(format!(" {} is typing...", who))
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC));
        f.render_widget(typing, chunks[1]);
    }
}

fn draw_landing(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Hero
            Constraint::Length(6), // Feature cards
            Constraint::Length(1), // Help line
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            BRAND,
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::styled("    [L] Login  [S] Sign Up", Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let hero = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("Welcome to "),
            Span::styled(
                BRAND,
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(TAGLINE),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Start Chatting",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(hero, chunks[1]);

    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[2]);
    for (feature, card_area) in FEATURES.iter().zip(card_areas.iter()) {
        let card = Paragraph::new(feature.description)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(feature.title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            );
        f.render_widget(card, *card_area);
    }

    let help = Paragraph::new("Enter chat | L login | S sign up | Q quit")
        .style(Style::default().fg(Color::Gray));
    f.render_widget(help, chunks[3]);
}

fn draw_placeholder(f: &mut Frame, page: Page, area: Rect) {
    let popup_area = centered_rect(50, 9, area);

    let popup_block = Block::default()
        .title(page.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let switch_hint = match page {
        Page::Login => "Don't have an account? Press [S] to sign up",
        _ => "Already have an account? Press [L] to log in",
    };
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(format!("{} is coming soon.", page.title())),
        Line::from("Accounts are not implemented in this demo."),
        Line::from(""),
        Line::from(switch_hint),
        Line::from("Press [ESC] to go back"),
    ])
    .alignment(Alignment::Center)
    .block(popup_block);

    f.render_widget(Clear, popup_area);
    f.render_widget(content, popup_area);
}

fn draw_help_dialog(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 16, area);

    let popup_block = Block::default()
        .title("Keyboard Shortcuts")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, popup_area);
    f.render_widget(popup_block, popup_area);

    let inner_area = popup_area.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });

    let shortcuts = vec![
        ("General", ""),
        ("ESC", "Back to the previous screen"),
        ("Ctrl+C", "Quit application"),
        ("Tab", "Switch between Messages and Chats"),
        ("", ""),
        ("Chats", ""),
        ("↑/↓", "Select contact (when Chats is focused)"),
        ("", ""),
        ("Messages", ""),
        ("Enter", "Send message"),
        ("Ctrl+H", "Show this help dialog"),
        ("", ""),
        ("Press any key to close this dialog", ""),
    ];

    let items: Vec<ListItem> = shortcuts
        .iter()
        .map(|(key, desc)| {
            if desc.is_empty() {
                if key.is_empty() {
                    ListItem::new("")
                } else {
                    ListItem::new(Text::styled(
                        key.to_string(),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ))
                }
            } else {
                let line = Line::from(vec![
                    Span::styled(format!("{:<10}", key), Style::default().fg(Color::Green)),
                    Span::raw(desc.to_string()),
                ]);
                ListItem::new(line)
            }
        })
        .collect();

    f.render_widget(List::new(items), inner_area);
}

fn draw_reply_notification(f: &mut Frame, notification: &ReplyNotification, area: Rect) {
    // Top-right corner with some margin
    let popup_width = 40.min(area.width.saturating_sub(4));
    let popup_height = 4.min(area.height.saturating_sub(4));
    let popup_x = area.width.saturating_sub(popup_width + 2);
    let popup_area = Rect::new(popup_x, 2, popup_width, popup_height);

    let content = Paragraph::new(format!("New message from {}", notification.author))
        .style(Style::default().fg(Color::Green))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("New Message")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );

    f.render_widget(Clear, popup_area);
    f.render_widget(content, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    info!("Terminal UI initialized");
    Ok(terminal)
}

pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
