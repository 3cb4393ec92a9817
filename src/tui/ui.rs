//! UI rendering for the debugger.
//!
//! The register panel renders each byte as a row of LEDs, the way the
//! value would show on the breadboard.

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::asm::disasm::disassemble_cell;
use crate::cpu::control::LINE_NAMES;
use super::app::DebuggerApp;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &DebuggerApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(frame.area());

    // Left side: registers, control lines, status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(chunks[0]);

    draw_registers(frame, left_chunks[0], app);
    draw_control_lines(frame, left_chunks[1], app);
    draw_status(frame, left_chunks[2], app);

    // Right side: RAM and help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(18), Constraint::Length(4)])
        .split(chunks[1]);

    draw_ram(frame, right_chunks[0], app);
    draw_help(frame, right_chunks[1]);
}

/// A row of eight LEDs for one byte, most significant bit first.
fn led_spans(value: u8) -> Vec<Span<'static>> {
    (0..8)
        .rev()
        .map(|bit| {
            if value >> bit & 1 == 1 {
                Span::styled("●", Style::default().fg(Color::Red))
            } else {
                Span::styled("○", Style::default().fg(Color::DarkGray))
            }
        })
        .collect()
}

fn register_line(label: &str, value: u8, note: String) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("{label:>5}: "))];
    spans.extend(led_spans(value));
    spans.push(Span::raw(format!(" ({value})")));
    if !note.is_empty() {
        spans.push(Span::styled(
            format!("  {note}"),
            Style::default().fg(Color::Cyan),
        ));
    }
    Line::from(spans)
}

/// Draw the register file as LED rows.
fn draw_registers(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let regs = app.machine.regs;
    let ram_at_addr = app.machine.mem.read(regs.addr);

    let content = vec![
        register_line("BUS", regs.bus, String::new()),
        register_line("PC", regs.pc, String::new()),
        register_line("ADDR", regs.addr, String::new()),
        register_line("RAM", ram_at_addr, String::new()),
        register_line("IR", regs.ir, disassemble_cell(regs.ir)),
        register_line("A", regs.a, String::new()),
        register_line("B", regs.b, String::new()),
        register_line("OUT", regs.out, String::new()),
        Line::from(vec![
            Span::raw("Pulses: "),
            Span::styled(
                format!("{}", app.machine.cycles),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("   State: "),
            if app.machine.is_halted() {
                Span::styled("Halted", Style::default().fg(Color::Red))
            } else {
                Span::styled("Running", Style::default().fg(Color::Green))
            },
        ]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .title(" Registers ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    frame.render_widget(paragraph, area);
}

/// Draw the control lines of the last applied word.
fn draw_control_lines(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let word = app.machine.last_word();

    let spans: Vec<Span> = LINE_NAMES
        .iter()
        .flat_map(|(line, name)| {
            let style = if word.contains(*line) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(*name, style), Span::raw(" ")]
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Control lines ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    frame.render_widget(paragraph, area);
}

/// Draw all 16 RAM cells with disassembly.
fn draw_ram(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let regs = app.machine.regs;

    let items: Vec<ListItem> = app
        .machine
        .mem
        .cells()
        .iter()
        .enumerate()
        .map(|(addr, value)| {
            let is_pc = addr as u8 == regs.pc;
            let is_addr = addr as u8 == regs.addr;
            let prefix = if is_pc { "▶" } else { " " };

            let mut spans = vec![Span::raw(format!("{prefix} {addr:>2}: "))];
            spans.extend(led_spans(*value));
            spans.push(Span::raw(format!("  {:<8} ({})", disassemble_cell(*value), value)));

            let style = if is_pc {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if is_addr {
                Style::default().fg(Color::Cyan)
            } else if *value != 0 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" RAM ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );

    frame.render_widget(list, area);
}

/// Draw the status bar.
fn draw_status(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let status = Paragraph::new(app.status.clone())
        .style(Style::default().fg(Color::White))
        .block(Block::default().title(" Status ").borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw the help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("s/space: Pulse clock  r: Run  p: Pause"),
        Line::from("x: Reset  q: Quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().title(" Help ").borders(Borders::ALL));

    frame.render_widget(help, area);
}
