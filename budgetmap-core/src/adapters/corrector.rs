//! Edit-distance category corrector

use crate::ports::{CategoryCorrector, Correction};

/// Snaps near-misses onto known categories and tidies unknown ones
///
/// "groceries" and "Grocerys" both become "Groceries"; an unknown
/// "home  office" becomes "Home Office".
#[derive(Debug, Clone, Copy)]
pub struct EditDistanceCorrector {
    max_distance: usize,
}

impl Default for EditDistanceCorrector {
    fn default() -> Self {
        Self { max_distance: 2 }
    }
}

impl EditDistanceCorrector {
    pub fn new(max_distance: usize) -> Self {
        Self { max_distance }
    }

    /// Allowed distance for a name: short names only tolerate one edit
    fn threshold(&self, name: &str) -> usize {
        match name.chars().count() {
            0..=3 => 0,
            4..=6 => self.max_distance.min(1),
            _ => self.max_distance,
        }
    }
}

impl CategoryCorrector for EditDistanceCorrector {
    fn correct(&self, input: &str, known: &[String]) -> Correction {
        let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
        let lowered = collapsed.to_lowercase();

        if let Some(exact) = known.iter().find(|k| k.to_lowercase() == lowered) {
            return Correction {
                changed: exact != input,
                value: exact.clone(),
            };
        }

        let nearest = known
            .iter()
            .map(|k| (levenshtein(&k.to_lowercase(), &lowered), k))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, category)) = nearest {
            if distance <= self.threshold(&collapsed) {
                return Correction {
                    changed: true,
                    value: category.clone(),
                };
            }
        }

        let value = title_case(&collapsed);
        Correction {
            changed: value != input,
            value,
        }
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}
