//! Plain-text transcripts of series.
//!
//! Output is a pure function of the input: identical series always render
//! to byte-identical text.

use crate::domain::{Episode, Series};

/// Line placed before every episode in a single-series transcript
pub const EPISODE_SEPARATOR: &str = "------------------------------------------";

/// Line placed between series in a bulk transcript
pub const SERIES_SEPARATOR: &str = "==========================================";

fn header(series: &Series) -> String {
    format!(
        "SÉRIE: {}\nDESCRIÇÃO: {}\n\n",
        series.title, series.description
    )
}

fn full_episode(number: usize, ep: &Episode) -> String {
    format!(
        "{EPISODE_SEPARATOR}\n\
         EPISÓDIO {number}: {}\n\
         GANCHO: {}\n\
         NARRATIVA: {}\n\
         CENA-CHAVE: {}\n\
         LIÇÃO MODERNA: {}",
        ep.title, ep.hook, ep.narrative, ep.key_scene, ep.modern_lesson
    )
}

fn short_episode(number: usize, ep: &Episode) -> String {
    format!(
        "EPISÓDIO {number}: {}\nGANCHO: {}\nNARRATIVA: {}\nLIÇÃO: {}",
        ep.title, ep.hook, ep.narrative, ep.modern_lesson
    )
}

/// Full transcript of one series, every episode field included
pub fn format_series(series: &Series) -> String {
    let episodes = series
        .episodes
        .iter()
        .enumerate()
        .map(|(i, ep)| full_episode(i + 1, ep))
        .collect::<Vec<_>>()
        .join("\n\n");

    header(series) + &episodes
}

/// Combined transcript of many series; key scenes are left out
pub fn format_bulk(series: &[Series]) -> String {
    series
        .iter()
        .map(|s| {
            let episodes = s
                .episodes
                .iter()
                .enumerate()
                .map(|(i, ep)| short_episode(i + 1, ep))
                .collect::<Vec<_>>()
                .join("\n\n");
            header(s) + &episodes
        })
        .collect::<Vec<_>>()
        .join(&format!("\n\n{SERIES_SEPARATOR}\n\n"))
}
