use crate::entries::repo::FoodEntry;

/// Static daily targets; configuration for percentage display only, never
/// persisted.
#[derive(Debug, Clone, Copy)]
pub struct NutritionGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Default for NutritionGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 200.0,
            fats: 65.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Percent of each goal reached, capped at 100 for display.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GoalProgress {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// In-memory state for one day's log: the entry list plus the loading/error
/// flags. Uninitialized (no identity) means this container is never built;
/// `loading` and `error` cover the remaining states.
#[derive(Debug, Clone)]
pub struct DayLog {
    pub date: String,
    pub entries: Vec<FoodEntry>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DayLog {
    pub fn new(date: String) -> Self {
        Self {
            date,
            entries: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn totals(&self) -> MacroTotals {
        totals(&self.entries)
    }
}

pub fn totals(entries: &[FoodEntry]) -> MacroTotals {
    entries.iter().fold(MacroTotals::default(), |acc, e| {
        MacroTotals {
            calories: acc.calories + e.calories,
            protein: acc.protein + e.protein,
            carbs: acc.carbs + e.carbs,
            fats: acc.fats + e.fats,
        }
    })
}

impl MacroTotals {
    pub fn progress(&self, goals: &NutritionGoals) -> GoalProgress {
        GoalProgress {
            calories: pct(self.calories, goals.calories),
            protein: pct(self.protein, goals.protein),
            carbs: pct(self.carbs, goals.carbs),
            fats: pct(self.fats, goals.fats),
        }
    }
}

fn pct(total: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    (total / goal * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::MacroEstimate;

    fn entry(calories: f64, protein: f64, carbs: f64, fats: f64) -> FoodEntry {
        FoodEntry::new(
            "u1",
            "test food",
            "2026-08-07".into(),
            MacroEstimate {
                calories,
                protein,
                carbs,
                fats,
            },
        )
    }

    #[test]
    fn totals_of_an_empty_log_are_zero() {
        assert_eq!(totals(&[]), MacroTotals::default());
    }

    #[test]
    fn totals_sum_every_entry() {
        let entries = vec![entry(95.0, 0.5, 25.0, 0.3), entry(250.0, 12.0, 30.0, 8.0)];
        let sum = totals(&entries);
        assert_eq!(sum.calories, 345.0);
        assert_eq!(sum.protein, 12.5);
        assert_eq!(sum.carbs, 55.0);
        assert_eq!(sum.fats, 8.3);
    }

    #[test]
    fn progress_is_capped_at_100() {
        let goals = NutritionGoals::default();
        let sum = totals(&[entry(5000.0, 20.0, 500.0, 10.0)]);
        let progress = sum.progress(&goals);
        assert_eq!(progress.calories, 100.0);
        assert_eq!(progress.carbs, 100.0);
        assert!((progress.protein - (20.0 / 150.0 * 100.0)).abs() < 1e-9);
        assert!((progress.fats - (10.0 / 65.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn nonpositive_goal_reads_as_zero_progress() {
        let goals = NutritionGoals {
            calories: 0.0,
            ..NutritionGoals::default()
        };
        let progress = totals(&[entry(100.0, 0.0, 0.0, 0.0)]).progress(&goals);
        assert_eq!(progress.calories, 0.0);
    }
}
