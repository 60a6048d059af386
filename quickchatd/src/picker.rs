use quickchat_common::RenderError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use tracing::warn;

/// How many times a reshuffle retries before accepting a permutation that
/// starts with the previous bag's last item.
const RESHUFFLE_ATTEMPTS: usize = 30;

/// Shuffle state for one category: the current permutation and a cursor.
///
/// The cursor stays in `[0, order.len()]`; reaching the end means the bag is
/// exhausted and must be reshuffled before the next pick.
struct ShuffleBag {
    order: Vec<String>,
    cursor: usize,
}

/// Picks random variations from categories without immediate repetition.
///
/// Each category's items are shuffled and dealt out one by one; when the bag
/// runs out it is reshuffled, avoiding (best-effort) the last dealt item as
/// the new first so repeats don't straddle the bag boundary.
pub struct VariationPicker {
    variations: HashMap<String, Vec<String>>,
    bags: HashMap<String, ShuffleBag>,
    rng: StdRng,
}

impl VariationPicker {
    /// Create a picker using randomness from the operating system
    pub fn new(variations: HashMap<String, Vec<String>>) -> Self {
        Self::with_rng(variations, StdRng::from_entropy())
    }

    /// Create a picker with a fixed seed (useful for deterministic tests)
    pub fn from_seed(variations: HashMap<String, Vec<String>>, seed: u64) -> Self {
        Self::with_rng(variations, StdRng::seed_from_u64(seed))
    }

    fn with_rng(variations: HashMap<String, Vec<String>>, rng: StdRng) -> Self {
        let mut picker = Self {
            variations,
            bags: HashMap::new(),
            rng,
        };
        let keys: Vec<String> = picker.variations.keys().cloned().collect();
        for key in keys {
            picker.reshuffle(&key, None);
        }
        picker
    }

    /// Resolve a template key to the canonical category name.
    ///
    /// Tries an exact match, then underscore/space swapped, then a
    /// case-insensitive match over all three spellings.
    fn normalize_key(&self, key: &str) -> Result<String, RenderError> {
        let key = key.trim();
        if self.variations.contains_key(key) {
            return Ok(key.to_string());
        }

        let spaced = key.replace('_', " ");
        if self.variations.contains_key(&spaced) {
            return Ok(spaced);
        }

        let underscored = key.replace(' ', "_");
        if self.variations.contains_key(&underscored) {
            return Ok(underscored);
        }

        let candidates = [key.to_lowercase(), spaced.to_lowercase(), underscored.to_lowercase()];
        for existing in self.variations.keys() {
            if candidates.contains(&existing.to_lowercase()) {
                return Ok(existing.clone());
            }
        }

        Err(RenderError::UnknownCategory(key.to_string()))
    }

    /// Deal a new permutation for a category, retrying a bounded number of
    /// times so `avoid_first` doesn't land at the front.
    fn reshuffle(&mut self, key: &str, avoid_first: Option<&str>) {
        let items = match self.variations.get(key) {
            Some(items) => items.clone(),
            None => return,
        };

        if items.is_empty() {
            self.bags.insert(key.to_string(), ShuffleBag { order: Vec::new(), cursor: 0 });
            return;
        }

        let mut order = items;
        for _ in 0..RESHUFFLE_ATTEMPTS {
            order.shuffle(&mut self.rng);
            match avoid_first {
                Some(avoid) if order[0] == avoid => continue,
                _ => break,
            }
        }

        self.bags.insert(key.to_string(), ShuffleBag { order, cursor: 0 });
    }

    /// Pick the next item from a category.
    ///
    /// Every item is dealt exactly once per bag cycle; consecutive picks
    /// never repeat unless the category has fewer than 2 items.
    pub fn pick(&mut self, key: &str) -> Result<String, RenderError> {
        let key = self.normalize_key(key)?;

        let len = self.variations[&key].len();
        if len == 0 {
            return Ok(String::new());
        }
        if len < 3 {
            warn!("variation list \"{}\" has fewer than 3 items; repeats are likely", key);
        }

        let exhausted = self
            .bags
            .get(&key)
            .map_or(true, |bag| bag.cursor >= bag.order.len());
        if exhausted {
            let last = self
                .bags
                .get(&key)
                .and_then(|bag| bag.order.last().cloned());
            self.reshuffle(&key, last.as_deref());
        }

        let bag = self.bags.get_mut(&key).expect("bag exists after reshuffle");
        let item = bag.order[bag.cursor].clone();
        bag.cursor += 1;
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn table(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_full_bag_deals_every_item_once() {
        let items = ["a", "b", "c", "d", "e"];
        let mut picker = VariationPicker::from_seed(table(&[("greeting", &items)]), 7);

        let mut seen = HashSet::new();
        for _ in 0..items.len() {
            seen.insert(picker.pick("greeting").unwrap());
        }
        assert_eq!(seen.len(), items.len());
    }

    #[test]
    fn test_no_back_to_back_repeats() {
        let mut picker =
            VariationPicker::from_seed(table(&[("pair", &["one", "two", "three"])]), 3);

        let mut previous = picker.pick("pair").unwrap();
        // Walk across many bag boundaries
        for _ in 0..300 {
            let next = picker.pick("pair").unwrap();
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_empty_category_returns_empty_string() {
        let mut picker = VariationPicker::from_seed(table(&[("void", &[])]), 1);
        assert_eq!(picker.pick("void").unwrap(), "");
    }

    #[test]
    fn test_single_item_category_repeats() {
        let mut picker = VariationPicker::from_seed(table(&[("solo", &["only"])]), 1);
        assert_eq!(picker.pick("solo").unwrap(), "only");
        assert_eq!(picker.pick("solo").unwrap(), "only");
    }

    #[test]
    fn test_unknown_category() {
        let mut picker = VariationPicker::from_seed(table(&[("known", &["x"])]), 1);
        let err = picker.pick("mystery").unwrap_err();
        assert_eq!(err, RenderError::UnknownCategory("mystery".to_string()));
    }

    #[test]
    fn test_key_normalization() {
        let mut picker = VariationPicker::from_seed(
            table(&[("cat fact", &["fax"]), ("I Got It", &["mine"])]),
            1,
        );

        // underscore/space equivalence
        assert_eq!(picker.pick("cat_fact").unwrap(), "fax");
        // case-insensitive fallback
        assert_eq!(picker.pick("i got it").unwrap(), "mine");
        assert_eq!(picker.pick("I_GOT_IT").unwrap(), "mine");
        // surrounding whitespace
        assert_eq!(picker.pick("  cat fact  ").unwrap(), "fax");
    }
}
