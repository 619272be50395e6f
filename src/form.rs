//! Edit-trip form state
//!
//! `FormState` is the screen-local working copy of a trip. It is seeded from
//! the trip handed to the edit screen and turned back into a `TripUpdate`
//! on submit. Nothing here talks to the network.

use chrono::NaiveDate;

use crate::currency;
use crate::destinations::Destinations;
use crate::models::{TRIP_NAME_MAX, Trip, TripUpdate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Upper-case the first character and keep the rest untouched
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse the date part of a stored trip date ("2024-01-01" or a full ISO timestamp)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
}

/// Long-form date label, e.g. "Mon Jan 01 2024"
fn date_label(value: &str) -> String {
    parse_date(value)
        .map(|d| d.format("%a %b %d %Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub name: String,
    pub destinations: Destinations,
    pub start_date: String,
    pub end_date: String,
    /// Fund goal as displayed, e.g. "$ 1,500"
    pub fund_goal: String,
    pub show_start_calendar: bool,
    pub show_end_calendar: bool,
}

impl FormState {
    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            name: trip.name.chars().take(TRIP_NAME_MAX).collect(),
            destinations: Destinations::from_vec(trip.destinations.clone()),
            start_date: trip.start_date.clone(),
            end_date: trip.end_date.clone(),
            fund_goal: currency::format(&trip.fund_goal.to_string()),
            show_start_calendar: false,
            show_end_calendar: false,
        }
    }

    /// Set the trip name. Input longer than the cap is rejected outright.
    pub fn set_name(&mut self, text: &str) -> bool {
        let capitalized = capitalize_first(text);
        if capitalized.chars().count() > TRIP_NAME_MAX {
            return false;
        }
        self.name = capitalized;
        true
    }

    pub fn chars_left(&self) -> usize {
        TRIP_NAME_MAX.saturating_sub(self.name.chars().count())
    }

    pub fn set_fund_goal(&mut self, raw: &str) {
        self.fund_goal = currency::format(raw);
    }

    pub fn set_destinations(&mut self, destinations: Destinations) {
        self.destinations = destinations;
    }

    pub fn open_start_picker(&mut self) {
        self.show_start_calendar = true;
        self.show_end_calendar = false;
    }

    pub fn close_pickers(&mut self) {
        self.show_start_calendar = false;
        self.show_end_calendar = false;
    }

    /// Pick the start date and move straight on to the end date picker
    pub fn pick_start_date(&mut self, day: NaiveDate) {
        self.start_date = day.format(DATE_FORMAT).to_string();
        if parse_date(&self.end_date).is_some_and(|end| end < day) {
            self.end_date.clear();
        }
        self.show_start_calendar = false;
        self.show_end_calendar = true;
    }

    /// Pick the end date. Days before the start date are floored to it.
    pub fn pick_end_date(&mut self, day: NaiveDate) {
        let day = match self.min_end_date() {
            Some(min) if day < min => min,
            _ => day,
        };
        self.end_date = day.format(DATE_FORMAT).to_string();
        self.show_end_calendar = false;
    }

    pub fn min_end_date(&self) -> Option<NaiveDate> {
        parse_date(&self.start_date)
    }

    pub fn period_label(&self) -> String {
        if self.start_date.is_empty() && self.end_date.is_empty() {
            return "Trip Period".to_string();
        }
        format!(
            "{} - {}",
            date_label(&self.start_date),
            date_label(&self.end_date)
        )
    }

    pub fn to_update(&self, owner: &str) -> TripUpdate {
        TripUpdate {
            trip_name: self.name.clone(),
            trip_starting_time: self.start_date.clone(),
            trip_ending_time: self.end_date.clone(),
            owner: owner.to_string(),
            fund_goals: currency::unformat(&self.fund_goal),
            destinations: self.destinations.as_slice().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trip() -> Trip {
        Trip {
            id: "t1".into(),
            name: "Paris Trip".into(),
            destinations: vec!["Paris".into(), "Lyon".into()],
            start_date: "2024-01-01".into(),
            end_date: "2024-01-10".into(),
            fund_goal: 12500,
            owner_id: "u1".into(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("paris"), "Paris");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("éze village"), "Éze village");
        assert_eq!(capitalize_first("1st stop"), "1st stop");
    }

    #[test]
    fn test_from_trip_formats_fund_goal() {
        let form = FormState::from_trip(&sample_trip());
        assert_eq!(form.name, "Paris Trip");
        assert_eq!(form.fund_goal, "$ 12,500");
        assert_eq!(form.destinations.len(), 2);
        assert_eq!(form.chars_left(), 15);
        assert!(!form.show_start_calendar && !form.show_end_calendar);
    }

    #[test]
    fn test_from_trip_truncates_long_name() {
        let mut trip = sample_trip();
        trip.name = "A".repeat(40);
        let form = FormState::from_trip(&trip);
        assert_eq!(form.name.chars().count(), TRIP_NAME_MAX);
        assert_eq!(form.chars_left(), 0);
    }

    #[test]
    fn test_set_name_caps_length() {
        let mut form = FormState::default();
        assert!(form.set_name("summer in the alps"));
        assert_eq!(form.name, "Summer in the alps");
        assert_eq!(form.chars_left(), TRIP_NAME_MAX - 18);

        let too_long = "x".repeat(TRIP_NAME_MAX + 1);
        assert!(!form.set_name(&too_long));
        assert_eq!(form.name, "Summer in the alps");

        let exact = "y".repeat(TRIP_NAME_MAX);
        assert!(form.set_name(&exact));
        assert_eq!(form.chars_left(), 0);
    }

    #[test]
    fn test_chars_left_counts_chars_not_bytes() {
        let mut form = FormState::default();
        form.set_name("Zürich");
        assert_eq!(form.chars_left(), TRIP_NAME_MAX - 6);
    }

    #[test]
    fn test_set_fund_goal_reformats() {
        let mut form = FormState::default();
        form.set_fund_goal("$ 1,0005");
        assert_eq!(form.fund_goal, "$ 10,005");
        form.set_fund_goal("$ ");
        assert_eq!(form.fund_goal, "");
    }

    #[test]
    fn test_pick_start_opens_end_picker() {
        let mut form = FormState::default();
        form.open_start_picker();
        form.pick_start_date(day("2024-03-01"));

        assert_eq!(form.start_date, "2024-03-01");
        assert!(!form.show_start_calendar);
        assert!(form.show_end_calendar);

        form.pick_end_date(day("2024-03-05"));
        assert_eq!(form.end_date, "2024-03-05");
        assert!(!form.show_end_calendar);
    }

    #[test]
    fn test_end_date_never_before_start() {
        let mut form = FormState::from_trip(&sample_trip());
        form.pick_start_date(day("2024-02-01"));
        assert_eq!(form.end_date, "");

        form.pick_end_date(day("2024-01-15"));
        assert_eq!(form.end_date, "2024-02-01");
    }

    #[test]
    fn test_period_label() {
        let form = FormState::default();
        assert_eq!(form.period_label(), "Trip Period");

        let form = FormState::from_trip(&sample_trip());
        assert_eq!(form.period_label(), "Mon Jan 01 2024 - Wed Jan 10 2024");
    }

    #[test]
    fn test_parse_date_accepts_timestamps() {
        assert_eq!(
            parse_date("2024-01-01T00:00:00.000Z"),
            Some(day("2024-01-01"))
        );
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_to_update_unformats_fund_goal() {
        let mut form = FormState::from_trip(&sample_trip());
        form.set_fund_goal("500");
        let update = form.to_update("u1");

        assert_eq!(update.fund_goals, 500);
        assert_eq!(update.owner, "u1");
        assert_eq!(update.destinations, vec!["Paris", "Lyon"]);
    }
}
