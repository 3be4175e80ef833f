use std::collections::{HashMap, HashSet};

use crate::error::{LinkageError, Result};

/// Word counts over distinct names, remembering first-seen word order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencyTable {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl WordFrequencyTable {
    pub fn get(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// (word, count) pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order.iter().map(|w| (w.as_str(), self.counts[w]))
    }

    fn add(&mut self, word: &str) {
        match self.counts.get_mut(word) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(word.to_string(), 1);
                self.order.push(word.to_string());
            }
        }
    }
}

/// Count words across the distinct names. A name that occurs on many rows
/// contributes its words once.
pub fn word_frequencies<'a, I>(names: I) -> WordFrequencyTable
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut table = WordFrequencyTable::default();
    for name in names {
        if !seen.insert(name) {
            continue;
        }
        for word in name.split_whitespace() {
            table.add(word);
        }
    }
    table
}

/// Percentile with linear interpolation between closest ranks
pub fn percentile(values: &[usize], pct: f64) -> Result<Option<f64>> {
    if !(0.0..=100.0).contains(&pct) {
        return Err(LinkageError::InvalidPercentile(pct));
    }
    if values.is_empty() {
        return Ok(None);
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let low = sorted[lower] as f64;
    let high = sorted[upper] as f64;
    Ok(Some(low + (high - low) * (rank - lower as f64)))
}

/// Words whose count is strictly above the `pct` percentile of all word
/// counts, in first-seen order
pub fn most_common_words<'a, I>(names: I, pct: f64) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let frequencies = word_frequencies(names);
    let counts: Vec<usize> = frequencies.iter().map(|(_, c)| c).collect();

    let threshold = match percentile(&counts, pct)? {
        Some(threshold) => threshold,
        None => return Ok(Vec::new()),
    };

    Ok(frequencies
        .iter()
        .filter(|(_, count)| *count as f64 > threshold)
        .map(|(word, _)| word.to_string())
        .collect())
}
