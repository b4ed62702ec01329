//! Display and output formatting utilities

use crate::automaton::{Catalog, FrameSink, Snapshot, ALIVE, DEAD};
use itertools::Itertools;
use log::debug;
use serde::Serialize;
use std::io::{self, Stdout, Write};

/// Format frames and catalogs for the terminal
pub struct FrameFormatter;

impl FrameFormatter {
    /// Render the grid: alive `█`, decaying `▒`, dead `·`
    pub fn format_grid(snapshot: &Snapshot<'_>) -> String {
        let mut output = String::with_capacity(snapshot.states().len() * 3 + snapshot.height());
        for y in 0..snapshot.height() {
            for x in 0..snapshot.width() {
                output.push(match snapshot.get(x, y) {
                    DEAD => '·',
                    ALIVE => '█',
                    _ => '▒',
                });
            }
            output.push('\n');
        }
        output
    }

    /// One-line summary of the frame
    pub fn format_status(snapshot: &Snapshot<'_>) -> String {
        let mut status = format!(
            "[{}] {} | generation {} | alive {}",
            snapshot.rule_index,
            snapshot.rule_set,
            snapshot.generation,
            snapshot.alive_count()
        );
        if snapshot.rule_set.has_decay() {
            status.push_str(&format!(" | decaying {}", snapshot.decaying_count()));
        }
        status
    }

    /// Table of every catalog entry
    pub fn format_catalog(catalog: &Catalog, current: Option<usize>) -> String {
        let mut output = String::new();
        output.push_str(" #  | Name             | Notation         | Lifetime | Seeder\n");
        output.push_str("----|------------------|------------------|----------|------------------------------\n");

        let rows = Self::catalog_rows(catalog)
            .into_iter()
            .map(|row| {
                let marker = if current == Some(row.index) { '*' } else { ' ' };
                format!(
                    "{}{:2} | {:16} | {:16} | {:8} | {}",
                    marker, row.index, row.name, row.notation, row.lifetime, row.seeder
                )
            })
            .join("\n");
        output.push_str(&rows);
        output.push('\n');
        output
    }

    pub fn catalog_rows(catalog: &Catalog) -> Vec<CatalogRow> {
        catalog
            .iter()
            .enumerate()
            .map(|(index, entry)| CatalogRow {
                index,
                name: entry.rule_set.name().to_string(),
                notation: entry.rule_set.notation(),
                lifetime: entry.rule_set.lifetime(),
                seeder: entry.seeder.to_string(),
            })
            .collect()
    }

    /// Catalog as pretty-printed JSON
    pub fn catalog_json(catalog: &Catalog) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self::catalog_rows(catalog))
    }
}

/// Summary of one catalog entry for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRow {
    pub index: usize,
    pub name: String,
    pub notation: String,
    pub lifetime: u8,
    pub seeder: String,
}

/// Frame sink that draws each frame to a terminal writer
pub struct TerminalSink<W: Write = Stdout> {
    out: W,
    enabled: bool,
    clear_screen: bool,
    show_status: bool,
    frames: u64,
}

impl TerminalSink<Stdout> {
    /// Draw to standard output
    pub fn stdout(enabled: bool, clear_screen: bool, show_status: bool) -> Self {
        Self::new(io::stdout(), enabled, clear_screen, show_status)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, enabled: bool, clear_screen: bool, show_status: bool) -> Self {
        Self {
            out,
            enabled,
            clear_screen,
            show_status,
            frames: 0,
        }
    }

    /// Frames received so far, drawn or not
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn frame(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        self.frames += 1;
        if !self.enabled {
            debug!("{}", FrameFormatter::format_status(snapshot));
            return Ok(());
        }

        let mut text = String::new();
        if self.clear_screen {
            // Home the cursor and clear below it
            text.push_str("\x1b[H\x1b[J");
        }
        text.push_str(&FrameFormatter::format_grid(snapshot));
        if self.show_status {
            text.push_str(&ColorOutput::info(&FrameFormatter::format_status(snapshot)));
            text.push('\n');
        }
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{Catalog, Engine};

    fn engine() -> Engine {
        Engine::with_seed(3, 2, Catalog::builtin(), 0).unwrap()
    }

    #[test]
    fn test_grid_formatting() {
        let mut engine = engine();
        engine.grid_mut().clear();
        engine.grid_mut().set(0, 0, 1).unwrap();
        engine.grid_mut().set(2, 1, 3).unwrap();

        let text = FrameFormatter::format_grid(&engine.snapshot());
        assert_eq!(text, "█··\n··▒\n");
    }

    #[test]
    fn test_status_line() {
        let mut engine = engine();
        let status = FrameFormatter::format_status(&engine.snapshot());
        assert!(status.starts_with("[0] B3S23 | generation 0"));
        assert!(!status.contains("decaying"));

        engine.select_rule_set(6).unwrap();
        let status = FrameFormatter::format_status(&engine.snapshot());
        assert!(status.contains("B234S2G5"));
        assert!(status.contains("decaying 0"));
    }

    #[test]
    fn test_catalog_listing() {
        let catalog = Catalog::builtin();
        let table = FrameFormatter::format_catalog(&catalog, Some(4));
        assert_eq!(table.lines().count(), 9);
        assert!(table.contains("* 4 | B2S0345G10"));
        assert!(table.contains("bounded-solid-block(2x2)"));

        let rows = FrameFormatter::catalog_rows(&catalog);
        assert_eq!(rows[5].lifetime, 48);
        assert_eq!(rows[1].seeder, "single-seed");

        let json = FrameFormatter::catalog_json(&catalog).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[3]["notation"], "B35678S5678");
    }

    /// Writer whose reader has gone away
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_disabled_sink_counts_frames() {
        let mut engine = engine();
        let mut sink = TerminalSink::new(ClosedPipe, false, false, false);
        engine.tick_into(&mut sink).unwrap();
        engine.tick_into(&mut sink).unwrap();
        assert_eq!(sink.frames(), 2);
    }

    #[test]
    fn test_sink_draws_grid() {
        let mut engine = engine();
        engine.grid_mut().clear();
        engine.grid_mut().set(1, 0, 1).unwrap();

        let mut sink = TerminalSink::new(Vec::new(), true, false, false);
        sink.frame(&engine.snapshot()).unwrap();
        assert_eq!(String::from_utf8(sink.out).unwrap(), "·█·\n···\n");
    }

    #[test]
    fn test_sink_reports_write_failure() {
        let mut engine = engine();
        let mut sink = TerminalSink::new(ClosedPipe, true, true, true);
        let err = engine.tick_into(&mut sink).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Yellow);
        // Should either be colored or plain text
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
