/// Level records and the ordered registry that owns them.
///
/// ## Invariants
///   - exactly one record per `LetterId`, stored in letter order
///   - the first letter is always unlocked once `ensure_first_unlocked` ran
///   - `progress` stays in [0, 1]; `complete` never lowers it
///   - `unlocked` never goes from true back to false

use super::letter::{LetterId, LETTER_COUNT};

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LevelRecord {
    pub id: LetterId,
    pub progress: f32,
    pub unlocked: bool,
}

impl LevelRecord {
    pub fn locked(id: LetterId) -> Self {
        LevelRecord { id, progress: 0.0, unlocked: false }
    }

    pub fn is_completed(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Clamp a stored progress value into [0, 1]. NaN counts as no progress.
pub fn sanitize_progress(p: f32) -> f32 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Result of completing a level.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct WinOutcome {
    /// Progress went from below 1.0 to 1.0 on this call.
    pub completed_now: bool,
    /// The following letter, if this call unlocked it.
    pub unlocked_next: Option<LetterId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LevelRegistry {
    records: Vec<LevelRecord>,
}

impl LevelRegistry {
    /// Fresh registry: every letter locked, nothing completed.
    pub fn new() -> Self {
        LevelRegistry {
            records: LetterId::all().map(LevelRecord::locked).collect(),
        }
    }

    /// Build a complete registry out of whatever records were stored.
    ///
    /// Missing letters get default records, duplicates keep the first
    /// occurrence. Returns the registry and whether anything had to be
    /// repaired.
    pub fn from_records(stored: Vec<LevelRecord>) -> (Self, bool) {
        let mut slots: Vec<Option<LevelRecord>> = vec![None; LETTER_COUNT];
        let mut repaired = false;

        for mut rec in stored {
            let slot = &mut slots[rec.id.index()];
            if slot.is_some() {
                repaired = true;
                continue;
            }
            let clean = sanitize_progress(rec.progress);
            if clean != rec.progress {
                repaired = true;
                rec.progress = clean;
            }
            *slot = Some(rec);
        }

        let records = slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.unwrap_or_else(|| {
                    repaired = true;
                    // from_index cannot fail for i < LETTER_COUNT
                    LevelRecord::locked(LetterId::from_index(i).unwrap_or(LetterId::first()))
                })
            })
            .collect();

        (LevelRegistry { records }, repaired)
    }

    /// Force the first record open. Returns true if it was locked.
    pub fn ensure_first_unlocked(&mut self) -> bool {
        match self.records.first_mut() {
            Some(first) if !first.unlocked => {
                first.unlocked = true;
                true
            }
            _ => false,
        }
    }

    /// Mark the level at `index` completed and open the next one.
    ///
    /// Only position `index + 1` can be unlocked by this call; nothing
    /// further down the line is touched.
    pub fn complete(&mut self, index: usize) -> WinOutcome {
        let mut outcome = WinOutcome::default();
        let Some(rec) = self.records.get_mut(index) else {
            return outcome;
        };
        if rec.progress < 1.0 {
            rec.progress = 1.0;
            outcome.completed_now = true;
        }
        if let Some(next) = self.records.get_mut(index + 1) {
            if !next.unlocked {
                next.unlocked = true;
                outcome.unlocked_next = Some(next.id);
            }
        }
        outcome
    }

    #[inline]
    pub fn get(&self, id: LetterId) -> &LevelRecord {
        &self.records[id.index()]
    }

    pub fn at(&self, index: usize) -> Option<&LevelRecord> {
        self.records.get(index)
    }

    pub fn is_unlocked(&self, id: LetterId) -> bool {
        self.get(id).unlocked
    }

    pub fn completed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_completed()).count()
    }

    pub fn completion_fraction(&self) -> f32 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.completed_count() as f32 / self.records.len() as f32
    }

    pub fn all_completed(&self) -> bool {
        self.records.iter().all(|r| r.is_completed())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(i: usize) -> LetterId {
        LetterId::from_index(i).unwrap()
    }

    #[test]
    fn new_registry_is_complete_and_locked() {
        let reg = LevelRegistry::new();
        assert_eq!(reg.len(), LETTER_COUNT);
        assert!(reg.iter().all(|r| !r.unlocked && r.progress == 0.0));
        for (i, r) in reg.iter().enumerate() {
            assert_eq!(r.id.index(), i);
        }
    }

    #[test]
    fn from_records_fills_gaps_and_orders() {
        let stored = vec![
            LevelRecord { id: letter(5), progress: 1.0, unlocked: true },
            LevelRecord { id: letter(0), progress: 0.5, unlocked: true },
        ];
        let (reg, repaired) = LevelRegistry::from_records(stored);
        assert!(repaired);
        assert_eq!(reg.len(), LETTER_COUNT);
        assert_eq!(reg.at(0).unwrap().progress, 0.5);
        assert!(reg.at(5).unwrap().is_completed());
        assert!(!reg.at(1).unwrap().unlocked);
    }

    #[test]
    fn from_records_keeps_first_duplicate() {
        let mut stored: Vec<LevelRecord> = LetterId::all().map(LevelRecord::locked).collect();
        stored.push(LevelRecord { id: letter(0), progress: 1.0, unlocked: true });
        let (reg, repaired) = LevelRegistry::from_records(stored);
        assert!(repaired);
        assert_eq!(reg.at(0).unwrap().progress, 0.0);
    }

    #[test]
    fn complete_set_needs_no_repair() {
        let stored: Vec<LevelRecord> = LetterId::all().map(LevelRecord::locked).collect();
        let (_, repaired) = LevelRegistry::from_records(stored);
        assert!(!repaired);
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        let mut stored: Vec<LevelRecord> = LetterId::all().map(LevelRecord::locked).collect();
        stored[2].progress = 7.0;
        stored[3].progress = f32::NAN;
        let (reg, repaired) = LevelRegistry::from_records(stored);
        assert!(repaired);
        assert_eq!(reg.at(2).unwrap().progress, 1.0);
        assert_eq!(reg.at(3).unwrap().progress, 0.0);
    }

    #[test]
    fn ensure_first_unlocked_is_idempotent() {
        let mut reg = LevelRegistry::new();
        assert!(reg.ensure_first_unlocked());
        let once = reg.clone();
        assert!(!reg.ensure_first_unlocked());
        assert_eq!(reg, once);
    }

    #[test]
    fn complete_unlocks_only_the_next_level() {
        let mut reg = LevelRegistry::new();
        reg.ensure_first_unlocked();
        let out = reg.complete(0);
        assert!(out.completed_now);
        assert_eq!(out.unlocked_next, Some(letter(1)));
        assert!(reg.at(1).unwrap().unlocked);
        assert!(reg.iter().skip(2).all(|r| !r.unlocked));
    }

    #[test]
    fn complete_twice_reports_nothing_new() {
        let mut reg = LevelRegistry::new();
        reg.complete(3);
        let again = reg.complete(3);
        assert_eq!(again, WinOutcome::default());
    }

    #[test]
    fn complete_last_level_has_no_next() {
        let mut reg = LevelRegistry::new();
        let out = reg.complete(LETTER_COUNT - 1);
        assert!(out.completed_now);
        assert_eq!(out.unlocked_next, None);
    }

    #[test]
    fn complete_out_of_range_is_ignored() {
        let mut reg = LevelRegistry::new();
        let before = reg.clone();
        assert_eq!(reg.complete(LETTER_COUNT + 3), WinOutcome::default());
        assert_eq!(reg, before);
    }

    #[test]
    fn completion_fraction_counts_finished_levels() {
        let mut reg = LevelRegistry::new();
        assert_eq!(reg.completion_fraction(), 0.0);
        for i in 0..LETTER_COUNT {
            reg.complete(i);
        }
        assert!(reg.all_completed());
        assert_eq!(reg.completion_fraction(), 1.0);
    }
}
