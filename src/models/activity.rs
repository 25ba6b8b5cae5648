use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

impl Activity {
    pub fn date(&self) -> NaiveDate {
        self.occurs_at.date_naive()
    }
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub trip_id: Uuid,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

/// All activities of a trip that fall on one calendar day.
#[derive(Debug, Clone)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub activities: Vec<Activity>,
}

/// Groups activities by calendar date, ignoring time of day.
///
/// Days are emitted in the order their first activity is encountered and
/// each day appears exactly once; activities keep their input order.
pub fn group_by_date(activities: Vec<Activity>) -> Vec<ActivityDay> {
    let mut days: Vec<ActivityDay> = Vec::new();
    for activity in activities {
        let date = activity.date();
        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.activities.push(activity),
            None => days.push(ActivityDay {
                date,
                activities: vec![activity],
            }),
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn activity(title: &str, day: u32, hour: u32) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            trip_id: Uuid::nil(),
            title: title.into(),
            occurs_at: Utc.with_ymd_and_hms(2025, 1, day, hour, 30, 0).unwrap(),
        }
    }

    #[test]
    fn groups_by_calendar_day_regardless_of_time() {
        let input = vec![
            activity("beach", 10, 9),
            activity("museum", 11, 14),
            activity("dinner", 10, 21),
        ];
        let days = group_by_date(input.clone());

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        let titles: Vec<_> = days[0].activities.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["beach", "dinner"]);
        assert_eq!(days[1].activities.len(), 1);
        assert_eq!(days[1].activities[0].title, "museum");

        let mut grouped: Vec<Uuid> = days
            .iter()
            .flat_map(|day| day.activities.iter().map(|a| a.id))
            .collect();
        let mut original: Vec<Uuid> = input.iter().map(|a| a.id).collect();
        grouped.sort();
        original.sort();
        assert_eq!(grouped, original);
    }

    #[test]
    fn empty_input_yields_no_days() {
        assert!(group_by_date(Vec::new()).is_empty());
    }
}
