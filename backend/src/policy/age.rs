//! Age-based Policy
//!
//! Lists the oldest case (by recomputed age in days) first. Equivalent to
//! FIFO when ages increase strictly with filing order, but the age is
//! recomputed explicitly on every call — it is never cached across days.

use super::SchedulingPolicy;
use crate::models::Case;
use chrono::NaiveDate;

/// Age policy: oldest case first, age recomputed each call
pub struct AgePolicy;

impl SchedulingPolicy for AgePolicy {
    fn name(&self) -> &'static str {
        "age"
    }

    fn prioritize<'a>(&self, mut cases: Vec<&'a Case>, today: NaiveDate) -> Vec<&'a Case> {
        // Descending age; stable, so equal ages keep input order
        cases.sort_by(|a, b| b.age_days(today).cmp(&a.age_days(today)));
        cases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn case(id: &str, filed: NaiveDate) -> Case {
        Case::new(id.to_string(), "OS".to_string(), filed, "evidence".to_string())
    }

    #[test]
    fn test_oldest_age_first() {
        let young = case("OS-000001", date(2023, 9, 1));
        let old = case("OS-000002", date(2020, 9, 1));

        let ordered = AgePolicy.prioritize(vec![&young, &old], date(2024, 1, 8));
        assert_eq!(ordered[0].id(), "OS-000002");
    }

    #[test]
    fn test_agrees_with_fifo_on_distinct_dates() {
        use crate::policy::FifoPolicy;

        let a = case("OS-000001", date(2023, 5, 1));
        let b = case("OS-000002", date(2021, 5, 1));
        let c = case("OS-000003", date(2022, 5, 1));
        let today = date(2024, 1, 8);

        let by_age: Vec<&str> = AgePolicy
            .prioritize(vec![&a, &b, &c], today)
            .iter()
            .map(|c| c.id())
            .collect();
        let by_fifo: Vec<&str> = FifoPolicy
            .prioritize(vec![&a, &b, &c], today)
            .iter()
            .map(|c| c.id())
            .collect();

        assert_eq!(by_age, by_fifo);
    }

    #[test]
    fn test_same_age_keeps_input_order() {
        let filed = date(2022, 5, 2);
        let a = case("OS-000001", filed);
        let b = case("OS-000002", filed);

        let ordered = AgePolicy.prioritize(vec![&b, &a], date(2024, 1, 8));
        assert_eq!(ordered[0].id(), "OS-000002");
    }
}
