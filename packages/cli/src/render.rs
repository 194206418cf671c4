//! Terminal rendering for cards and listings

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Duration, Local, Utc};
use recall_algo::{Grade, MemoryState};

use crate::deck::Card;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Colors only on a real terminal, and never when `NO_COLOR` is set
pub fn color_enabled(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
}

#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: bool,
}

impl Style {
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{}", Color::RESET)
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(Color::BOLD, text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(Color::DIM, text)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(Color::RED, text)
    }

    pub fn ok(&self, text: &str) -> String {
        self.paint(Color::GREEN, text)
    }

    pub fn accent(&self, text: &str) -> String {
        self.paint(Color::CYAN, text)
    }
}

/// Box-drawn table in the style of `+---+` ASCII grids.
///
/// Cells may contain newlines; each line gets its own row inside the cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    for row in rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            for line in cell.lines() {
                widths[i] = widths[i].max(line.chars().count());
            }
        }
    }

    let separator = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let format_line = |cells: &[&str]| {
        let mut line = String::from("|");
        for (i, width) in widths.iter().enumerate() {
            let cell = cells.get(i).copied().unwrap_or("");
            let pad = width - cell.chars().count();
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad + 1));
            line.push('|');
        }
        line
    };

    let mut out = Vec::new();
    out.push(separator.clone());
    out.push(format_line(headers));
    out.push(separator.clone());

    for row in rows {
        let split: Vec<Vec<&str>> = (0..columns)
            .map(|i| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let lines: Vec<&str> = cell.lines().collect();
                if lines.is_empty() {
                    vec![""]
                } else {
                    lines
                }
            })
            .collect();
        let height = split.iter().map(Vec::len).max().unwrap_or(1);

        for line_no in 0..height {
            let cells: Vec<&str> = split
                .iter()
                .map(|lines| lines.get(line_no).copied().unwrap_or(""))
                .collect();
            out.push(format_line(&cells));
        }
    }

    out.push(separator);
    out.join("\n")
}

pub fn render_front<W: Write>(out: &mut W, card: &Card, style: Style) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} {}", style.dim("Flashcard:"), style.bold(card.front()))
}

pub fn render_back<W: Write>(out: &mut W, card: &Card) -> io::Result<()> {
    let rows: Vec<Vec<String>> = card
        .back()
        .iter()
        .map(|field| vec![field.label.clone(), field.value.clone()])
        .collect();
    writeln!(out, "{}", render_table(&["Field", "Value"], &rows))
}

/// Front and back together, for lookups that do not grade
pub fn render_card<W: Write>(out: &mut W, card: &Card, style: Style) -> io::Result<()> {
    render_front(out, card, style)?;
    render_back(out, card)
}

/// Grade menu with the interval each answer would schedule
pub fn render_grade_menu<W: Write>(
    out: &mut W,
    preview: &[(Grade, Duration); 4],
    style: Style,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Evaluate your recall difficulty:")?;
    for (grade, interval) in preview {
        let label = match grade {
            Grade::Again => "Again (failed to recall)",
            Grade::Hard => "Hard",
            Grade::Good => "Medium (Good)",
            Grade::Easy => "Easy",
        };
        writeln!(
            out,
            "{}: {} {}",
            *grade as u8,
            label,
            style.dim(&format!("[{}]", format_interval(*interval)))
        )?;
    }
    Ok(())
}

/// Compact human interval: `now`, `10m`, `5h`, `3d`
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.num_seconds();
    if secs <= 0 {
        "now".to_string()
    } else if secs < 3_600 {
        format!("{}m", (secs + 59) / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3_600)
    } else {
        format!("{}d", secs / 86_400)
    }
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Row cells for the listing table: interval, repetitions, ease, due
pub fn state_cells(state: Option<&MemoryState>) -> [String; 4] {
    match state {
        Some(state) => [
            format_interval(state.interval),
            state.repetition_count.to_string(),
            format!("{:.2}", state.ease_factor),
            format_timestamp(state.due_at),
        ],
        None => ["-".to_string(), "-".to_string(), "-".to_string(), "-".to_string()],
    }
}
