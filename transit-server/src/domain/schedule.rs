//! Timetabled schedules.
//!
//! A schedule belongs to one route and at most one of its sub-routes. It
//! keeps a copy of the sub-route's name taken when the schedule was last
//! written. Renaming the sub-route later does not update existing
//! schedules; readers that need the current name join against the route.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::{DepartureTime, DomainError, Route, RouteId, ScheduleId, SubRouteId, Weekday};

/// Kind of service day a schedule covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    #[default]
    Normal,
    #[serde(alias = "festivo")]
    Holiday,
    #[serde(alias = "especial")]
    Special,
}

/// A set of departures valid on given weekdays for a route or sub-route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: ScheduleId,
    pub route_id: RouteId,
    pub sub_route_id: Option<SubRouteId>,
    /// Name of the sub-route when the schedule was last written.
    pub sub_route_name: Option<String>,
    pub days: BTreeSet<Weekday>,
    pub departures: Vec<DepartureTime>,
    #[serde(default)]
    pub kind: ScheduleKind,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Everything needed to write a schedule except its id and the cached
/// sub-route name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDraft {
    pub route_id: RouteId,
    #[serde(default)]
    pub sub_route_id: Option<SubRouteId>,
    pub days: BTreeSet<Weekday>,
    #[serde(default)]
    pub departures: Vec<DepartureTime>,
    #[serde(default)]
    pub kind: ScheduleKind,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A partial update. Absent fields are left unchanged.
///
/// For the nullable fields, an explicit `null` clears the value while an
/// absent key keeps it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePatch {
    pub route_id: Option<RouteId>,
    #[serde(default, deserialize_with = "present")]
    pub sub_route_id: Option<Option<SubRouteId>>,
    pub days: Option<BTreeSet<Weekday>>,
    pub departures: Option<Vec<DepartureTime>>,
    pub kind: Option<ScheduleKind>,
    #[serde(default, deserialize_with = "present")]
    pub valid_from: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub valid_to: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

/// Distinguishes a key given as `null` from a missing key.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Schedule {
    /// Build a schedule for `route` from a draft.
    ///
    /// Validates the draft against the route's current sub-routes and
    /// captures the sub-route's name. A sub-route is required exactly when
    /// the route has any.
    pub fn from_draft(
        id: ScheduleId,
        draft: ScheduleDraft,
        route: &Route,
    ) -> Result<Self, DomainError> {
        if draft.days.is_empty() {
            return Err(DomainError::NoWeekdays);
        }

        if let (Some(from), Some(to)) = (draft.valid_from, draft.valid_to)
            && to < from
        {
            return Err(DomainError::InvertedValidity);
        }

        let sub_route_name = match &draft.sub_route_id {
            Some(sub_route_id) => {
                let sub_route =
                    route
                        .sub_route(sub_route_id)
                        .ok_or_else(|| DomainError::UnknownSubRoute {
                            route: route.id.clone(),
                            sub_route: sub_route_id.clone(),
                        })?;
                Some(sub_route.name.clone())
            }
            None if !route.sub_routes.is_empty() => {
                return Err(DomainError::SubRouteRequired(route.id.clone()));
            }
            None => None,
        };

        Ok(Self {
            id,
            route_id: route.id.clone(),
            sub_route_id: draft.sub_route_id,
            sub_route_name,
            days: draft.days,
            departures: draft.departures,
            kind: draft.kind,
            valid_from: draft.valid_from,
            valid_to: draft.valid_to,
            notes: draft.notes,
        })
    }

    /// The draft this schedule would be rebuilt from.
    pub fn to_draft(&self) -> ScheduleDraft {
        ScheduleDraft {
            route_id: self.route_id.clone(),
            sub_route_id: self.sub_route_id.clone(),
            days: self.days.clone(),
            departures: self.departures.clone(),
            kind: self.kind,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            notes: self.notes.clone(),
        }
    }

    /// True if the schedule applies on `day`.
    pub fn runs_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    /// Earliest listed departure.
    pub fn first_departure(&self) -> Option<DepartureTime> {
        self.departures.iter().min().copied()
    }

    /// Ordering used when listing a route's schedules: first weekday, then
    /// first departure.
    pub fn listing_key(&self) -> (Option<Weekday>, Option<DepartureTime>) {
        (self.days.first().copied(), self.first_departure())
    }
}

impl SchedulePatch {
    /// Overlay this patch on a draft.
    ///
    /// Moving a schedule to another route without naming a sub-route clears
    /// the old sub-route, since sub-route ids are only meaningful within
    /// their route.
    pub fn apply(self, mut draft: ScheduleDraft) -> ScheduleDraft {
        if let Some(route_id) = self.route_id {
            if route_id != draft.route_id && self.sub_route_id.is_none() {
                draft.sub_route_id = None;
            }
            draft.route_id = route_id;
        }
        if let Some(sub_route_id) = self.sub_route_id {
            draft.sub_route_id = sub_route_id;
        }
        if let Some(days) = self.days {
            draft.days = days;
        }
        if let Some(departures) = self.departures {
            draft.departures = departures;
        }
        if let Some(kind) = self.kind {
            draft.kind = kind;
        }
        if let Some(valid_from) = self.valid_from {
            draft.valid_from = valid_from;
        }
        if let Some(valid_to) = self.valid_to {
            draft.valid_to = valid_to;
        }
        if let Some(notes) = self.notes {
            draft.notes = notes;
        }
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, SubRoute};

    fn route_with_sub_routes() -> Route {
        Route::new(
            RouteId::parse("R1").unwrap(),
            "Ruta 1",
            vec![],
            vec![
                SubRoute {
                    id: SubRouteId::parse("out").unwrap(),
                    name: "Centro".to_string(),
                    description: None,
                    direction: Direction::Outbound,
                },
                SubRoute {
                    id: SubRouteId::parse("back").unwrap(),
                    name: "Terminal".to_string(),
                    description: Some("Regreso".to_string()),
                    direction: Direction::Return,
                },
            ],
        )
        .unwrap()
    }

    fn draft(sub_route: Option<&str>) -> ScheduleDraft {
        ScheduleDraft {
            route_id: RouteId::parse("R1").unwrap(),
            sub_route_id: sub_route.map(|s| SubRouteId::parse(s).unwrap()),
            days: [Weekday::Monday, Weekday::Friday].into_iter().collect(),
            departures: vec![
                DepartureTime::parse_hhmm("06:00").unwrap(),
                DepartureTime::parse_hhmm("05:30").unwrap(),
            ],
            kind: ScheduleKind::Normal,
            valid_from: None,
            valid_to: None,
            notes: None,
        }
    }

    fn id() -> ScheduleId {
        ScheduleId::parse("S1").unwrap()
    }

    #[test]
    fn captures_sub_route_name() {
        let route = route_with_sub_routes();
        let schedule = Schedule::from_draft(id(), draft(Some("back")), &route).unwrap();
        assert_eq!(schedule.sub_route_name.as_deref(), Some("Terminal"));
        assert_eq!(schedule.route_id, route.id);
    }

    #[test]
    fn unknown_sub_route_rejected() {
        let route = route_with_sub_routes();
        let err = Schedule::from_draft(id(), draft(Some("sideways")), &route).unwrap_err();
        assert!(matches!(err, DomainError::UnknownSubRoute { .. }));
    }

    #[test]
    fn sub_route_required_when_route_has_some() {
        let route = route_with_sub_routes();
        let err = Schedule::from_draft(id(), draft(None), &route).unwrap_err();
        assert_eq!(err, DomainError::SubRouteRequired(route.id.clone()));
    }

    #[test]
    fn no_sub_route_on_plain_route() {
        let route = Route::new(RouteId::parse("R1").unwrap(), "Ruta 1", vec![], vec![]).unwrap();
        let schedule = Schedule::from_draft(id(), draft(None), &route).unwrap();
        assert!(schedule.sub_route_id.is_none());
        assert!(schedule.sub_route_name.is_none());
    }

    #[test]
    fn empty_days_rejected() {
        let route = route_with_sub_routes();
        let mut d = draft(Some("out"));
        d.days.clear();
        assert_eq!(
            Schedule::from_draft(id(), d, &route).unwrap_err(),
            DomainError::NoWeekdays
        );
    }

    #[test]
    fn inverted_validity_rejected() {
        let route = route_with_sub_routes();
        let mut d = draft(Some("out"));
        d.valid_from = NaiveDate::from_ymd_opt(2024, 6, 1);
        d.valid_to = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(
            Schedule::from_draft(id(), d, &route).unwrap_err(),
            DomainError::InvertedValidity
        );
    }

    #[test]
    fn departures_keep_given_order() {
        let route = route_with_sub_routes();
        let schedule = Schedule::from_draft(id(), draft(Some("out")), &route).unwrap();
        let times: Vec<_> = schedule.departures.iter().map(|t| t.to_string()).collect();
        assert_eq!(times, vec!["06:00", "05:30"]);
        assert_eq!(schedule.first_departure().unwrap().to_string(), "05:30");
    }

    #[test]
    fn runs_on_and_listing_key() {
        let route = route_with_sub_routes();
        let schedule = Schedule::from_draft(id(), draft(Some("out")), &route).unwrap();
        assert!(schedule.runs_on(Weekday::Friday));
        assert!(!schedule.runs_on(Weekday::Sunday));
        let (day, first) = schedule.listing_key();
        assert_eq!(day, Some(Weekday::Monday));
        assert_eq!(first.unwrap().to_string(), "05:30");
    }

    #[test]
    fn patch_recomputes_name_on_rebuild() {
        let mut route = route_with_sub_routes();
        let schedule = Schedule::from_draft(id(), draft(Some("out")), &route).unwrap();

        // Renaming the sub-route leaves the stored copy stale...
        route.sub_routes[0].name = "Centro Histórico".to_string();
        assert_eq!(schedule.sub_route_name.as_deref(), Some("Centro"));

        // ...until the schedule is written again.
        let patch = SchedulePatch {
            notes: Some(Some("refreshed".to_string())),
            ..Default::default()
        };
        let rebuilt =
            Schedule::from_draft(schedule.id.clone(), patch.apply(schedule.to_draft()), &route)
                .unwrap();
        assert_eq!(rebuilt.sub_route_name.as_deref(), Some("Centro Histórico"));
        assert_eq!(rebuilt.notes.as_deref(), Some("refreshed"));
    }

    #[test]
    fn patch_null_clears_and_absent_keeps() {
        let mut base = draft(Some("out"));
        base.notes = Some("keep me".to_string());
        base.valid_to = NaiveDate::from_ymd_opt(2024, 12, 31);

        let patch: SchedulePatch =
            serde_json::from_str(r#"{"validTo": null, "kind": "festivo"}"#).unwrap();
        let patched = patch.apply(base);

        assert_eq!(patched.valid_to, None);
        assert_eq!(patched.notes.as_deref(), Some("keep me"));
        assert_eq!(patched.kind, ScheduleKind::Holiday);
        assert_eq!(patched.sub_route_id.unwrap().as_str(), "out");
    }

    #[test]
    fn patch_moving_route_drops_old_sub_route() {
        let patch = SchedulePatch {
            route_id: Some(RouteId::parse("R2").unwrap()),
            ..Default::default()
        };
        let patched = patch.apply(draft(Some("out")));
        assert_eq!(patched.route_id.as_str(), "R2");
        assert!(patched.sub_route_id.is_none());
    }

    #[test]
    fn deserializes_stored_document() {
        let json = r#"{
            "id": "S7",
            "routeId": "R1",
            "subRouteId": "out",
            "subRouteName": "Centro",
            "days": ["Lunes", "Martes"],
            "departures": ["05:00", "05:20"],
            "kind": "especial",
            "validFrom": "2024-01-01"
        }"#;
        let schedule: Schedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.kind, ScheduleKind::Special);
        assert_eq!(schedule.days.len(), 2);
        assert_eq!(schedule.valid_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert!(schedule.valid_to.is_none());
        assert!(schedule.notes.is_none());
    }
}
