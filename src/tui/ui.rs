//! UI rendering using ratatui
//!
//! Supports multiple screens:
//! - Splash: title and rules
//! - AlreadyPlayed: today's stored results and the next-puzzle countdown
//! - Game: header with timer, then a body for the current session phase

use crate::app::{
    format_clock, format_next_puzzle, share_text, time_until_next_puzzle, AppCoordinator,
    BonusState, GameResults, Phase, Screen, SentenceRound, Urgency,
};
use crate::game::bonus::{UnscrambleRound, MAX_SENTENCE_PUZZLES};
use crate::game::{Cell, Grid, GRID_SIZE};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, app: &AppCoordinator) {
    match &app.screen {
        Screen::Splash => render_splash(frame, app),
        Screen::AlreadyPlayed(results) => render_already_played(frame, results),
        Screen::Game => render_game(frame, app),
    }
}

/// Render the title screen
fn render_splash(frame: &mut Frame, app: &AppCoordinator) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Length(2), // Title
            Constraint::Length(1), // Date
            Constraint::Length(1), // Spacer
            Constraint::Length(5), // Rules
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Prompt
            Constraint::Length(1), // Notice
            Constraint::Min(0),
        ])
        .margin(2)
        .split(frame.area());

    let title = Paragraph::new("BOGGLE SCRAMBLE")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[1]);

    let date = Paragraph::new(format!("Puzzle for {}", app.today))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    frame.render_widget(date, layout[2]);

    let config = app.session.config();
    let rules = Paragraph::new(vec![
        Line::from("Type letters or use arrows + space to trace adjacent cells."),
        Line::from("Enter submits. Words need 3+ letters; each letter is a point."),
        Line::from(format!(
            "You have {} to find as many words as you can.",
            format_clock(config.round_duration)
        )),
        Line::from("Then a bonus round decides which words you keep."),
        Line::from("One play per day. Same grid for everyone."),
    ])
    .style(Style::default().fg(Color::White))
    .alignment(Alignment::Center);
    frame.render_widget(rules, layout[4]);

    let prompt = Paragraph::new("Press ENTER to start, ESC to quit")
        .style(Style::default().fg(Color::Green).bold())
        .alignment(Alignment::Center);
    frame.render_widget(prompt, layout[6]);

    render_notice(frame, layout[7], app);
}

/// Render the read-only view of today's finished play
fn render_already_played(frame: &mut Frame, results: &GameResults) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(8),    // Summary
            Constraint::Length(1), // Next puzzle
            Constraint::Length(1), // Hint
        ])
        .margin(2)
        .split(frame.area());

    let title = Paragraph::new("You've already played today!")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    render_summary(frame, layout[1], results);

    let until = time_until_next_puzzle(chrono::Local::now().naive_local());
    let next = Paragraph::new(format_next_puzzle(until))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    frame.render_widget(next, layout[2]);

    render_hint(frame, layout[3], "Press Q or ESC to quit");
}

/// Render the in-game screen
fn render_game(frame: &mut Frame, app: &AppCoordinator) {
    let area = frame.area();

    // Main layout: header + content + feedback line
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header with date, timer
            Constraint::Min(0),    // Phase content
            Constraint::Length(2), // Feedback, notice
        ])
        .split(area);

    render_header(frame, layout[0], app);

    match app.session.phase() {
        Phase::Idle => render_hint(frame, layout[1], "Press ENTER to start"),
        Phase::MainRound => render_main_round(frame, layout[1], app),
        Phase::MainRoundEnded => render_round_ended(frame, layout[1], app),
        Phase::BonusIntro => render_bonus_intro(frame, layout[1], app),
        Phase::BonusActive => match app.session.bonus() {
            BonusState::Unscramble(round) => render_unscramble(frame, layout[1], app, round),
            BonusState::Sentence(round) => render_sentence(frame, layout[1], round),
            BonusState::NotStarted => {}
        },
        Phase::Results => render_results(frame, layout[1], app),
    }

    let footer = Paragraph::new(footer_lines(&app.session.feedback, app.notice.as_deref()))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

/// Feedback from the last action, then any standing notice on its own line
fn footer_lines(feedback: &str, notice: Option<&str>) -> Vec<Line<'static>> {
    let (text, color) = format_feedback(feedback);
    let mut lines = vec![Line::from(text).style(Style::default().fg(color))];
    if let Some(notice) = notice {
        lines.push(Line::from(notice.to_string()).style(Style::default().fg(Color::Yellow)));
    }
    lines
}

/// Render the header: logo, date, score, timer
fn render_header(frame: &mut Frame, area: Rect, app: &AppCoordinator) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(18), // Logo
            Constraint::Min(20),    // Date and score
            Constraint::Length(10), // Timer
        ])
        .split(inner);

    let logo = Paragraph::new("BOGGLE SCRAMBLE")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(logo, header_layout[0]);

    let date = app
        .session
        .date()
        .map(|d| d.to_string())
        .unwrap_or_default();
    let status = Paragraph::new(format!("{}   Score: {}", date, app.session.ledger().score()))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    frame.render_widget(status, header_layout[1]);

    if let Some(countdown) = app.session.countdown() {
        let timer = Paragraph::new(format_clock(countdown.remaining))
            .style(Style::default().fg(urgency_color(countdown.urgency())).bold())
            .alignment(Alignment::Right);
        frame.render_widget(timer, header_layout[2]);
    }
}

/// Grid on the left, current word and found words on the right
fn render_main_round(frame: &mut Frame, area: Rect, app: &AppCoordinator) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(4 * GRID_SIZE as u16 + 4), // Grid
            Constraint::Min(20),                          // Words
        ])
        .split(area);

    if let Some(grid) = app.session.grid() {
        let lines = grid_lines(grid, app.session.selection().cells(), Some(app.cursor));
        let board = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(board, columns[0]);
    }

    let side = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Current word
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Found words
        ])
        .split(columns[1]);

    let input = Paragraph::new(format!("> {}_", app.session.current_word()))
        .style(Style::default().fg(Color::White).bold());
    frame.render_widget(input, side[0]);

    frame.render_widget(found_words_list(app), side[2]);
}

/// Rows of ` X ` cells: selected cells green, the cursor reversed, vowels cyan
fn grid_lines(grid: &Grid, selected: &[Cell], cursor: Option<Cell>) -> Vec<Line<'static>> {
    (0..GRID_SIZE)
        .map(|row| {
            let spans: Vec<Span> = (0..GRID_SIZE)
                .map(|col| {
                    let cell = Cell::new(row, col);
                    let letter = grid.letter(cell).unwrap_or(' ');
                    let mut style = if selected.contains(&cell) {
                        Style::default().fg(Color::Black).bg(Color::Green).bold()
                    } else if Grid::is_vowel(letter) {
                        Style::default().fg(Color::Cyan).bold()
                    } else {
                        Style::default().fg(Color::White).bold()
                    };
                    if cursor == Some(cell) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(format!(" {} ", letter), style)
                })
                .flat_map(|span| [span, Span::raw(" ")])
                .collect();
            Line::from(spans)
        })
        .flat_map(|line| [line, Line::from("")])
        .collect()
}

/// Found words grouped by length, longest first
fn found_words_list(app: &AppCoordinator) -> List<'static> {
    let items: Vec<ListItem> = app
        .session
        .ledger()
        .words_by_length()
        .map(|(length, words)| {
            let words: Vec<&str> = words.iter().map(String::as_str).collect();
            ListItem::new(format!("{} letters: {}", length, words.join(", ")))
        })
        .collect();

    List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!("Words ({})", app.session.ledger().total_found())),
    )
}

/// Render the end-of-round summary
fn render_round_ended(frame: &mut Frame, area: Rect, app: &AppCoordinator) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(1), // Score
            Constraint::Length(1), // Words
            Constraint::Length(1), // Rejected
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Instructions
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new("TIME'S UP!")
        .style(Style::default().fg(Color::Red).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let ledger = app.session.ledger();
    let score = Paragraph::new(format!("Score: {}", ledger.score()))
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(score, layout[1]);

    let words = Paragraph::new(format!("Words Found: {}", ledger.total_found()))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    frame.render_widget(words, layout[2]);

    let rejected = Paragraph::new(format!("Not words: {}", ledger.rejected().len()))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(rejected, layout[3]);

    render_hint(frame, layout[5], "Press ENTER for the bonus round");
}

/// Render the bonus rules while the intro counts down
fn render_bonus_intro(frame: &mut Frame, area: Rect, app: &AppCoordinator) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Rules
            Constraint::Length(1), // Countdown
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new("BONUS ROUND")
        .style(Style::default().fg(Color::Magenta).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let rules = Paragraph::new(app.session.feedback.clone())
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(rules, layout[1]);

    let countdown = Paragraph::new(format!(
        "Starting in {}... (ENTER to begin now)",
        app.session.time_remaining()
    ))
    .style(Style::default().fg(Color::Yellow))
    .alignment(Alignment::Center);
    frame.render_widget(countdown, layout[2]);
}

/// Scrambled words on the left, the typed guess below
fn render_unscramble(frame: &mut Frame, area: Rect, app: &AppCoordinator, round: &UnscrambleRound) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(3),    // Items
            Constraint::Length(1), // Guess
        ])
        .split(area);

    let items: Vec<ListItem> = round
        .items()
        .iter()
        .map(|item| {
            if item.solved {
                ListItem::new(format!("{}  ->  {}", item.scrambled, item.original))
                    .style(Style::default().fg(Color::Green))
            } else {
                ListItem::new(item.scrambled.clone()).style(Style::default().fg(Color::White).bold())
            }
        })
        .collect();
    let solved = round.items().iter().filter(|i| i.solved).count();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!("Unscramble ({}/{})", solved, round.items().len())),
    );
    frame.render_widget(list, layout[0]);

    let guess = Paragraph::new(format!("> {}_", app.guess))
        .style(Style::default().fg(Color::White).bold());
    frame.render_widget(guess, layout[1]);
}

/// Current sentence puzzle with numbered options
fn render_sentence(frame: &mut Frame, area: Rect, round: &SentenceRound) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Prompt
            Constraint::Min(3),    // Options
        ])
        .split(area);

    let Some(puzzle) = &round.current else {
        return;
    };

    let prompt = Paragraph::new(format!(
        "Puzzle {} of {}: which sentence uses \"{}\"?",
        round.presented, MAX_SENTENCE_PUZZLES, puzzle.word
    ))
    .style(Style::default().fg(Color::Magenta).bold())
    .alignment(Alignment::Center);
    frame.render_widget(prompt, layout[0]);

    let options: Vec<ListItem> = puzzle
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| ListItem::new(format!("{}. {}", i + 1, option)))
        .collect();
    let list = List::new(options).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Press 1-3"),
    );
    frame.render_widget(list, layout[1]);
}

/// Render the final results
fn render_results(frame: &mut Frame, area: Rect, app: &AppCoordinator) {
    let Some(results) = app.session.results() else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(8),    // Summary or share text
            Constraint::Length(1), // Hint
        ])
        .split(area);

    let title = Paragraph::new("RESULTS")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    if app.show_share {
        let share = Paragraph::new(share_text(results))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title("Share"),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(share, layout[1]);
    } else {
        render_summary(frame, layout[1], results);
    }

    let hint = if app.session.config().debug {
        "S: share text   P: play again   Q: quit"
    } else {
        "S: share text   Q: quit"
    };
    render_hint(frame, layout[2], hint);
}

/// Score breakdown shared by the results and already-played screens
fn render_summary(frame: &mut Frame, area: Rect, results: &GameResults) {
    let mut lines = vec![
        Line::from(format!("Final Score: {}", results.final_score()))
            .style(Style::default().fg(Color::Yellow).bold()),
        Line::from(format!(
            "Words found: {}   Words kept: {}",
            results.words_found, results.words_kept
        )),
    ];
    if results.bonus_score > 0 || !results.answers.is_empty() {
        lines.push(Line::from(format!(
            "Bonus: {} ({} of {} correct)",
            results.bonus_score,
            results.correct_answers(),
            results.answers.len()
        )));
    }
    if let Some(word) = &results.rejected_sample {
        lines.push(Line::from(format!("Not a word: {}", word)).style(Style::default().fg(Color::Red)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Top words:").style(Style::default().fg(Color::Cyan)));
    if results.top_words.is_empty() {
        lines.push(Line::from("  No words found"));
    }
    for word in &results.top_words {
        lines.push(Line::from(format!("  {} ({} letters)", word, word.chars().count())));
    }
    if !results.persisted {
        lines.push(Line::from(""));
        lines.push(Line::from("Results were not saved.").style(Style::default().fg(Color::DarkGray)));
    }

    let summary = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(summary, area);
}

fn render_notice(frame: &mut Frame, area: Rect, app: &AppCoordinator) {
    if let Some(notice) = &app.notice {
        let notice = Paragraph::new(notice.clone())
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        frame.render_widget(notice, area);
    }
}

fn render_hint(frame: &mut Frame, area: Rect, hint: &str) {
    let hint = Paragraph::new(hint.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, area);
}

fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Calm => Color::Green,
        Urgency::Warning => Color::Yellow,
        Urgency::Critical => Color::Red,
    }
}

/// Format feedback with appropriate color
fn format_feedback(feedback: &str) -> (String, Color) {
    if feedback.is_empty() {
        return (String::new(), Color::White);
    }

    let color = if feedback.starts_with("OK") || feedback.starts_with("Correct") {
        Color::Green
    } else if feedback.starts_with("NOPE")
        || feedback.starts_with("Words must")
        || feedback.starts_with("Error")
        || feedback.starts_with("TIME'S UP")
    {
        Color::Red
    } else if feedback.starts_with("Already found")
        || feedback.starts_with("Not ")
        || feedback.starts_with("Time's up")
    {
        Color::Yellow
    } else {
        Color::White
    };

    (feedback.to_string(), color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_colors() {
        assert_eq!(format_feedback("OK +3 (CAT)").1, Color::Green);
        assert_eq!(format_feedback("NOPE: TAC").1, Color::Red);
        assert_eq!(format_feedback("Already found CAT").1, Color::Yellow);
        assert_eq!(format_feedback("").0, "");
    }

    #[test]
    fn test_notice_shown_alongside_feedback() {
        let lines = footer_lines("Correct! +10", Some("Error loading dictionary."));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "Correct! +10");
        assert_eq!(lines[0].style.fg, Some(Color::Green));
        assert_eq!(lines[1].to_string(), "Error loading dictionary.");

        assert_eq!(footer_lines("", None).len(), 1);
    }

    #[test]
    fn test_urgency_colors() {
        assert_eq!(urgency_color(Urgency::Calm), Color::Green);
        assert_eq!(urgency_color(Urgency::Critical), Color::Red);
    }

    #[test]
    fn test_grid_lines_mark_selection() {
        let grid = Grid::from_rows(&["CATXX", "OXXXX", "GXXXX", "XXXXX", "XXXXX"]).unwrap();
        let lines = grid_lines(&grid, &[Cell::new(0, 0)], None);
        // A blank line follows each row
        assert_eq!(lines.len(), GRID_SIZE * 2);
        let first = &lines[0].spans[0];
        assert_eq!(first.content, " C ");
        assert_eq!(first.style.bg, Some(Color::Green));
        assert_eq!(lines[0].spans[2].content, " A ");
        assert_eq!(lines[0].spans[2].style.fg, Some(Color::Cyan));
    }
}
