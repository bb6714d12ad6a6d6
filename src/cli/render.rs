//! Terminal rendering of series.

use crate::domain::{Episode, Series};

/// Widest title shown in list tables
const TITLE_WIDTH: usize = 50;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn render_episode(number: usize, ep: &Episode) -> String {
    format!(
        "  Episódio {number}\n  {}\n  \"{}\"\n    Narrativa: {}\n    Cena:      {}\n    Lição:     {}\n",
        ep.title, ep.hook, ep.narrative, ep.key_scene, ep.modern_lesson
    )
}

/// Card view of a series: header, then one block per episode
pub fn render_series(series: &Series) -> String {
    let mut out = format!("═══ {} ═══\n{}\n", series.title, series.description);
    for (i, ep) in series.episodes.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_episode(i + 1, ep));
    }
    out
}

/// Table of generated series, numbered from 1, newest first
pub fn render_table(series: &[Series]) -> String {
    let mut out = format!(
        "{:<4} {:<width$} {:>8}\n",
        "#",
        "TITLE",
        "EPISODES",
        width = TITLE_WIDTH
    );
    out.push_str(&"-".repeat(TITLE_WIDTH + 14));
    out.push('\n');

    for (i, s) in series.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<width$} {:>8}\n",
            i + 1,
            truncate(&s.title, TITLE_WIDTH),
            s.episodes.len(),
            width = TITLE_WIDTH
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builtin_seed;

    #[test]
    fn test_render_series_shows_every_episode() {
        let seed = builtin_seed().unwrap();
        let text = render_series(&seed);

        assert!(text.starts_with("═══ OS 10 DESASTRES QUE MOLDARAM O DINHEIRO ═══\n"));
        assert!(text.contains("  Episódio 10\n  2020 - COVID CRASH\n"));
        assert!(text.contains("\"Como bulbos de tulipa valeram 10 anos de salário?\""));
        assert_eq!(text.matches("    Lição:").count(), 10);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let title = "Ã".repeat(60);
        let short = truncate(&title, 10);
        assert_eq!(short.chars().count(), 10);
        assert!(short.ends_with("..."));
        assert_eq!(truncate("curto", 10), "curto");
    }

    #[test]
    fn test_render_table_numbers_from_one() {
        let table = render_table(&[Series::new("A", ""), Series::new("B", "")]);
        let rows: Vec<&str> = table.lines().skip(2).collect();
        assert!(rows[0].starts_with("1 "));
        assert!(rows[1].starts_with("2 "));
    }
}
