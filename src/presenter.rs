//! Rendering primitives the dispatcher's views are drawn with.

use crate::error::Result;
use crate::view::{Bar, Notice, NoticeLevel, View};
use polars::prelude::DataFrame;
use std::io::Write;

/// Width, in characters, of the longest bar in a text chart.
const CHART_WIDTH: usize = 40;

pub trait Presenter {
    fn render_table(&mut self, title: &str, frame: &DataFrame) -> Result<()>;
    fn render_message(&mut self, text: &str) -> Result<()>;
    fn render_chart(&mut self, title: &str, bars: &[Bar]) -> Result<()>;
    fn render_warning(&mut self, text: &str) -> Result<()>;

    /// Loader status lines. Errors and warnings go through the warning
    /// primitive unless a presenter has something better.
    fn render_notice(&mut self, notice: &Notice) -> Result<()> {
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Info => self.render_message(&notice.text),
            NoticeLevel::Warning | NoticeLevel::Error => self.render_warning(&notice.text),
        }
    }
}

/// Draw a view with whichever presenter is in use.
pub fn present(view: &View, presenter: &mut dyn Presenter) -> Result<()> {
    match view {
        View::Table { title, frame } => presenter.render_table(title, frame),
        View::Message { text } => presenter.render_message(text),
        View::Chart { title, bars } => presenter.render_chart(title, bars),
        View::Warning { text } => presenter.render_warning(text),
    }
}

/// Plain-text presenter for terminals.
pub struct ConsolePresenter<W: Write> {
    out: W,
}

impl ConsolePresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn render_table(&mut self, title: &str, frame: &DataFrame) -> Result<()> {
        writeln!(self.out, "\n=== {} ===", title)?;
        if frame.height() == 0 {
            writeln!(self.out, "(no rows)")?;
        } else {
            writeln!(self.out, "{}", frame)?;
        }
        Ok(())
    }

    fn render_message(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn render_chart(&mut self, title: &str, bars: &[Bar]) -> Result<()> {
        writeln!(self.out, "\n=== {} ===", title)?;
        for line in chart_lines(bars) {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn render_warning(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "[WARN] {}", text)?;
        Ok(())
    }

    fn render_notice(&mut self, notice: &Notice) -> Result<()> {
        let tag = match notice.level {
            NoticeLevel::Success => "[OK]",
            NoticeLevel::Info => "[INFO]",
            NoticeLevel::Warning => "[WARN]",
            NoticeLevel::Error => "[ERROR]",
        };
        writeln!(self.out, "{} {}", tag, notice.text)?;
        Ok(())
    }
}

/// Horizontal text bars, scaled so the largest value spans `CHART_WIDTH`.
pub fn chart_lines(bars: &[Bar]) -> Vec<String> {
    if bars.is_empty() {
        return vec!["(no data)".to_string()];
    }

    let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    let max_value = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    let integral = bars.iter().all(|b| b.value.fract() == 0.0);

    bars.iter()
        .map(|bar| {
            let len = if max_value > 0.0 {
                ((bar.value / max_value) * CHART_WIDTH as f64).round() as usize
            } else {
                0
            };
            let value = if integral {
                format!("{:.0}", bar.value)
            } else {
                format!("{:.2}", bar.value)
            };
            format!(
                "{:<width$} | {} {}",
                bar.label,
                "#".repeat(len),
                value,
                width = label_width
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn render(view: &View) -> String {
        let mut presenter = ConsolePresenter::new(Vec::new());
        present(view, &mut presenter).unwrap();
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn test_chart_lines_scale_to_largest() {
        let lines = chart_lines(&[
            Bar { label: "No".into(), value: 10.0 },
            Bar { label: "Yes".into(), value: 5.0 },
        ]);
        assert_eq!(lines[0], format!("No  | {} 10", "#".repeat(40)));
        assert_eq!(lines[1], format!("Yes | {} 5", "#".repeat(20)));
    }

    #[test]
    fn test_chart_lines_fractional_values() {
        let lines = chart_lines(&[Bar { label: "Mailed check".into(), value: 0.0 }, Bar { label: "Credit card".into(), value: 0.25 }]);
        assert!(lines[0].ends_with("|  0.00"));
        assert!(lines[1].ends_with("0.25"));
    }

    #[test]
    fn test_render_views() {
        assert_eq!(render(&View::message("Total: 3")), "Total: 3\n");
        assert_eq!(render(&View::warning("nope")), "[WARN] nope\n");

        let frame = df!["a" => [1i64]].unwrap();
        let out = render(&View::table("Rows", frame));
        assert!(out.starts_with("\n=== Rows ===\n"));

        let empty = df!["a" => Vec::<i64>::new()].unwrap();
        assert!(render(&View::table("Rows", empty)).contains("(no rows)"));
    }

    #[test]
    fn test_console_notice_tags() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter.render_notice(&Notice::success("Loaded")).unwrap();
        presenter.render_notice(&Notice::error("Broken")).unwrap();
        let out = String::from_utf8(presenter.into_inner()).unwrap();
        assert_eq!(out, "[OK] Loaded\n[ERROR] Broken\n");
    }
}
